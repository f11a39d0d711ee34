use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// The four-symbol edit alphabet of the base-level alignment primitive.
/// Softclips are a counting classification of edge insertion runs and have
/// no symbol of their own.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum CigarOperation {
    Eq,
    X,
    Insertion,
    Deletion,
}

impl CigarOperation {
    pub fn consumes_query(self) -> bool {
        matches!(
            self,
            CigarOperation::Eq | CigarOperation::X | CigarOperation::Insertion
        )
    }

    pub fn consumes_target(self) -> bool {
        matches!(
            self,
            CigarOperation::Eq | CigarOperation::X | CigarOperation::Deletion
        )
    }

    fn from_char(ch: char) -> Result<Self, ()> {
        Ok(match ch {
            '=' => CigarOperation::Eq,
            'X' => CigarOperation::X,
            'I' => CigarOperation::Insertion,
            'D' => CigarOperation::Deletion,
            _ => return Err(()),
        })
    }
}

impl Display for CigarOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let ch = match self {
            CigarOperation::Eq => '=',
            CigarOperation::X => 'X',
            CigarOperation::Insertion => 'I',
            CigarOperation::Deletion => 'D',
        };
        write!(f, "{}", ch)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpLen {
    op: CigarOperation,
    len: usize,
}

#[derive(Default, Clone, PartialEq, Eq)]
pub struct Cigar {
    ops: Vec<OpLen>,
}

impl Cigar {
    pub fn new() -> Self {
        Cigar { ops: vec![] }
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn push(&mut self, op: CigarOperation, len: usize) {
        if len == 0 {
            return;
        }
        if self.ops.is_empty() || self.ops.last().unwrap().op != op {
            self.ops.push(OpLen { op, len });
        } else {
            self.ops.last_mut().unwrap().len += len;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (CigarOperation, usize)> + '_ {
        self.ops.iter().map(|op_len| (op_len.op, op_len.len))
    }

    /// Number of edited columns (X, I and D)
    pub fn edit_distance(&self) -> usize {
        let mut dist = 0;
        for op_len in &self.ops {
            match op_len.op {
                CigarOperation::X | CigarOperation::Insertion | CigarOperation::Deletion => {
                    dist += op_len.len;
                }
                CigarOperation::Eq => {}
            }
        }
        dist
    }
}

impl Display for Cigar {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for op_len in &self.ops {
            write!(f, "{}{}", op_len.len, op_len.op)?;
        }
        Ok(())
    }
}

impl Debug for Cigar {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl FromStr for Cigar {
    type Err = ();

    /// parses ([0-9]*[=XID])*
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut cigar = Cigar::new();
        let mut number = None;
        for ch in s.chars() {
            match ch {
                ' ' => {}
                ch if ch.is_ascii_digit() => {
                    let val = ch as usize - '0' as usize;
                    if let Some(n) = number {
                        number = Some(n * 10 + val)
                    } else {
                        number = Some(val)
                    }
                }
                ch => {
                    if let Ok(op) = CigarOperation::from_char(ch) {
                        cigar.push(op, number.unwrap_or(1));
                        number = None;
                    } else {
                        return Err(());
                    }
                }
            }
        }
        Ok(cigar)
    }
}

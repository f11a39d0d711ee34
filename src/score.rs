use bio::alignment::AlignmentOperation;
use thiserror::Error;

use crate::cigar::{Cigar, CigarOperation};
use crate::segment::SegmentAlignment;

#[derive(Error, Debug)]
pub enum ScoreError {
    #[error("edit script contains an operation outside the =/X/I/D alphabet")]
    MalformedScript,
}

/// Run-length-encoded edit string and aggregated counts over the kept
/// sub-range of a segment's edit script.
#[derive(Debug, Default)]
pub struct ScoredAlignment {
    pub cigar: Cigar,
    pub matches: u64,
    pub mismatches: u64,
    pub insertions: u64,
    pub deletions: u64,
    pub softclips: u64,
    pub ref_aligned_length: u64,
    pub q_aligned_length: u64,
    pub skipped_target_start: usize,
    pub kept_target_length: usize,
}

impl ScoredAlignment {
    /// Total aligned columns: both sequences' aligned lengths minus the
    /// softclipped part counted on the query side.
    pub fn total_columns(&self) -> u64 {
        self.ref_aligned_length + self.q_aligned_length - self.softclips
    }

    /// Fraction of aligned columns that are exact matches; mismatches count
    /// against both sequences, indels against one.
    pub fn identity(&self) -> f64 {
        let total = self.total_columns() as f64;
        (total
            - 2.0 * self.mismatches as f64
            - self.insertions as f64
            - self.deletions as f64)
            / total
    }
}

fn edit_op(op: AlignmentOperation) -> Result<CigarOperation, ScoreError> {
    match op {
        AlignmentOperation::Match => Ok(CigarOperation::Eq),
        AlignmentOperation::Subst => Ok(CigarOperation::X),
        AlignmentOperation::Ins => Ok(CigarOperation::Insertion),
        AlignmentOperation::Del => Ok(CigarOperation::Deletion),
        _ => Err(ScoreError::MalformedScript),
    }
}

fn apply_run(scored: &mut ScoredAlignment, op: CigarOperation, len: u64, trailing: bool) {
    match op {
        CigarOperation::Insertion => {
            // Insertion runs at either end of the kept range are unaligned
            // sequence, not gaps
            if trailing || scored.cigar.is_empty() {
                scored.softclips += len;
            } else {
                scored.insertions += len;
            }
            scored.q_aligned_length += len;
        }
        CigarOperation::Eq => {
            scored.matches += len;
            scored.q_aligned_length += len;
            scored.ref_aligned_length += len;
        }
        CigarOperation::X => {
            scored.mismatches += len;
            scored.q_aligned_length += len;
            scored.ref_aligned_length += len;
        }
        CigarOperation::Deletion => {
            scored.deletions += len;
            scored.ref_aligned_length += len;
        }
    }
    scored.cigar.push(op, len as usize);
}

/// Walk the raw edit script, discard `skip_query_start` query bases from the
/// front, keep `keep_query_length` query bases (zero keeps everything to the
/// end), and run-length-encode the kept range with aggregated counts.
pub fn score_segment(alignment: &SegmentAlignment) -> Result<ScoredAlignment, ScoreError> {
    let ops = &alignment.ops;
    let mut scored = ScoredAlignment::default();

    let mut index = 0;
    let mut seen_query = 0;
    while index < ops.len() && seen_query < alignment.skip_query_start {
        let op = edit_op(ops[index])?;
        if op.consumes_query() {
            seen_query += 1;
        }
        if op.consumes_target() {
            scored.skipped_target_start += 1;
        }
        index += 1;
    }
    let start_index = index;

    let mut seen_query = 0;
    while index < ops.len() && seen_query < alignment.keep_query_length {
        let op = edit_op(ops[index])?;
        if op.consumes_query() {
            seen_query += 1;
        }
        if op.consumes_target() {
            scored.kept_target_length += 1;
        }
        index += 1;
    }
    let mut end_index = index;
    if end_index == start_index {
        end_index = ops.len();
    }

    let mut run_op: Option<CigarOperation> = None;
    let mut run_len = 0u64;
    for position in start_index..=end_index {
        let op = if position < end_index {
            Some(edit_op(ops[position])?)
        } else {
            None
        };
        if op.is_some() && op == run_op {
            run_len += 1;
            continue;
        }
        if let Some(previous) = run_op {
            apply_run(&mut scored, previous, run_len, position == end_index);
        }
        run_op = op;
        run_len = 1;
    }

    Ok(scored)
}

/// Phred-scaled estimate of the error fraction `1 - identity`, rounded and
/// clamped to [0, 255]; exact identity maps to 255.
pub fn phred_scaled_error(identity: f64) -> u8 {
    if identity >= 1.0 {
        return 255;
    }
    let p = -10.0 * (1.0 - identity).log10();
    p.clamp(0.0, 255.0).round() as u8
}

#[cfg(test)]
mod test {
    use super::{phred_scaled_error, score_segment, ScoredAlignment};
    use crate::cigar::{Cigar, CigarOperation};
    use crate::segment::SegmentAlignment;
    use bio::alignment::AlignmentOperation::{self, Del, Ins, Match, Subst, Xclip};

    fn segment(ops: Vec<AlignmentOperation>, skip: usize, keep: usize) -> SegmentAlignment {
        let edit_distance = ops.iter().filter(|&&op| op != Match).count() as u32;
        SegmentAlignment {
            j: 0,
            i: 0,
            ops,
            edit_distance,
            start_location: 0,
            skip_query_start: skip,
            keep_query_length: keep,
        }
    }

    /// Re-count an emitted edit string with the same softclip
    /// classification the construction uses
    fn tally(cigar: &Cigar) -> (u64, u64, u64, u64, u64) {
        let runs: Vec<_> = cigar.iter().collect();
        let (mut ma, mut mm, mut ins, mut del, mut sc) = (0, 0, 0, 0, 0);
        for (index, &(op, len)) in runs.iter().enumerate() {
            let len = len as u64;
            match op {
                CigarOperation::Eq => ma += len,
                CigarOperation::X => mm += len,
                CigarOperation::Deletion => del += len,
                CigarOperation::Insertion => {
                    if index == 0 || index + 1 == runs.len() {
                        sc += len;
                    } else {
                        ins += len;
                    }
                }
            }
        }
        (ma, mm, ins, del, sc)
    }

    fn assert_round_trip(scored: &ScoredAlignment) {
        assert_eq!(
            tally(&scored.cigar),
            (
                scored.matches,
                scored.mismatches,
                scored.insertions,
                scored.deletions,
                scored.softclips
            )
        );
    }

    #[test]
    fn untrimmed_perfect_segment() {
        let scored = score_segment(&segment(vec![Match; 16], 0, 0)).unwrap();
        assert_eq!(scored.cigar.to_string(), "16=");
        assert_eq!(scored.matches, 16);
        assert_eq!(scored.q_aligned_length, 16);
        assert_eq!(scored.ref_aligned_length, 16);
        assert_eq!(scored.identity(), 1.0);
        assert_round_trip(&scored);
    }

    #[test]
    fn one_mismatch_at_the_midpoint() {
        let mut ops = vec![Match; 16];
        ops[8] = Subst;
        let scored = score_segment(&segment(ops, 0, 0)).unwrap();
        assert_eq!(scored.cigar.to_string(), "8=1X7=");
        assert_eq!(scored.matches, 15);
        assert_eq!(scored.mismatches, 1);
        assert_eq!(scored.total_columns(), 32);
        assert_eq!(scored.identity(), 30.0 / 32.0);
        assert_round_trip(&scored);
    }

    #[test]
    fn skip_and_keep_restrict_the_script() {
        let scored = score_segment(&segment(vec![Match; 16], 4, 8)).unwrap();
        assert_eq!(scored.cigar.to_string(), "8=");
        assert_eq!(scored.skipped_target_start, 4);
        assert_eq!(scored.kept_target_length, 8);
        assert_eq!(scored.q_aligned_length, 8);
        assert_round_trip(&scored);
    }

    #[test]
    fn zero_keep_means_keep_to_the_end() {
        let scored = score_segment(&segment(vec![Match; 16], 4, 0)).unwrap();
        assert_eq!(scored.cigar.to_string(), "12=");
        assert_eq!(scored.skipped_target_start, 4);
        // The keep walk never ran
        assert_eq!(scored.kept_target_length, 0);
    }

    #[test]
    fn skip_counts_insertions_against_the_query_only() {
        let mut ops = vec![Ins, Ins];
        ops.extend(vec![Match; 6]);
        let scored = score_segment(&segment(ops, 4, 0)).unwrap();
        // Two inserted query bases and two matches consumed by the skip
        assert_eq!(scored.skipped_target_start, 2);
        assert_eq!(scored.cigar.to_string(), "4=");
    }

    #[test]
    fn edge_insertions_are_softclips() {
        let mut ops = vec![Ins, Ins];
        ops.extend(vec![Match; 4]);
        let scored = score_segment(&segment(ops, 0, 0)).unwrap();
        assert_eq!(scored.cigar.to_string(), "2I4=");
        assert_eq!(scored.softclips, 2);
        assert_eq!(scored.insertions, 0);
        // Softclips drop out of the aligned columns entirely
        assert_eq!(scored.total_columns(), 8);
        assert_eq!(scored.identity(), 1.0);
        assert_round_trip(&scored);
    }

    #[test]
    fn interior_insertions_are_real_insertions() {
        let ops = vec![Match, Match, Ins, Match, Match];
        let scored = score_segment(&segment(ops, 0, 0)).unwrap();
        assert_eq!(scored.cigar.to_string(), "2=1I2=");
        assert_eq!(scored.insertions, 1);
        assert_eq!(scored.softclips, 0);
        assert_round_trip(&scored);
    }

    #[test]
    fn deletions_consume_the_target() {
        let ops = vec![Match, Match, Del, Del, Match, Match];
        let scored = score_segment(&segment(ops, 0, 0)).unwrap();
        assert_eq!(scored.cigar.to_string(), "2=2D2=");
        assert_eq!(scored.deletions, 2);
        assert_eq!(scored.ref_aligned_length, 6);
        assert_eq!(scored.q_aligned_length, 4);
        assert_eq!(scored.identity(), (10.0 - 2.0) / 10.0);
        assert_round_trip(&scored);
    }

    #[test]
    fn clip_operations_are_malformed() {
        let ops = vec![Match, Xclip(3), Match];
        assert!(score_segment(&segment(ops, 0, 0)).is_err());
    }

    #[test]
    fn identity_stays_in_unit_interval() {
        let ops = vec![Subst, Subst, Del, Ins, Subst];
        let scored = score_segment(&segment(ops, 0, 0)).unwrap();
        assert!(scored.identity() >= 0.0);
        assert!(scored.identity() <= 1.0);
    }

    #[test]
    fn phred_bounds() {
        assert_eq!(phred_scaled_error(1.0), 255);
        assert_eq!(phred_scaled_error(0.9375), 12);
        assert_eq!(phred_scaled_error(0.0), 0);
        assert_eq!(phred_scaled_error(1.0 - 1e-40), 255);
    }
}

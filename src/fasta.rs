use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FastaError {
    #[error("IO")]
    Io(#[from] io::Error),

    #[error("FASTA file cannot be parsed: {0}")]
    Fasta(String),
}

#[derive(Debug)]
pub struct RefSequence {
    pub name: String,
    pub sequence: Vec<u8>,
}

/// Open a file, transparently decompressing gzip
pub fn xopen<P: AsRef<Path>>(path: P) -> io::Result<Box<dyn Read>> {
    let file = File::open(&path)?;
    if path.as_ref().extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(MultiGzDecoder::new(file)))
    } else {
        Ok(Box::new(file))
    }
}

pub fn read_fasta<R: BufRead>(reader: &mut R) -> Result<Vec<RefSequence>, FastaError> {
    let mut records = Vec::<RefSequence>::new();
    let mut name = String::new();
    let mut sequence = Vec::new();
    let mut has_record = false;
    for line in reader.lines() {
        let line = line?;
        let line = line.as_bytes();
        if line.is_empty() {
            continue;
        }
        if line[0] == b'>' {
            if has_record {
                records.push(RefSequence { name, sequence });
            }
            name = String::from_utf8(line[1..].to_vec())
                .map_err(|_| FastaError::Fasta("record name is not valid UTF-8".to_string()))?;
            if let Some(i) = name.find(|c: char| c.is_ascii_whitespace()) {
                name = name[..i].to_string();
            }
            sequence = Vec::new();
            has_record = true;
        } else {
            if !has_record {
                return Err(FastaError::Fasta(
                    "sequence data before the first header".to_string(),
                ));
            }
            sequence.extend(line.iter().map(|&c| c.to_ascii_uppercase()));
        }
    }
    if has_record {
        records.push(RefSequence { name, sequence });
    }

    Ok(records)
}

pub fn read_fasta_file(path: &str) -> Result<Vec<RefSequence>, FastaError> {
    let mut reader = BufReader::new(xopen(path)?);
    read_fasta(&mut reader)
}

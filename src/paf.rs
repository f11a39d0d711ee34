use std::fmt::Display;

use crate::cigar::Cigar;
use crate::score::{phred_scaled_error, ScoredAlignment};
use crate::segment::SegmentAlignment;

/* PAF columns (see https://github.com/lh3/miniasm/blob/master/PAF.md):
 * 1 query name
 * 2 query length
 * 3 query start (0-based)
 * 4 query end
 * 5 relative strand (+ or -)
 * 6 target name
 * 7 target length
 * 8 target start
 * 9 target end
 * 10 no. of matches
 * 11 alignment block length
 * 12 mapping quality (here: phred-scaled error estimate)
 * followed by id/ma/mm/ni/nd/ns/ed/al/se tags and the cg edit string
 */

/// Names and total lengths of the pair being aligned; every record carries
/// them for output self-description.
#[derive(Debug)]
pub struct PairMetadata {
    pub query_name: String,
    pub query_length: u64,
    pub target_name: String,
    pub target_length: u64,
}

#[derive(Debug)]
pub struct PafRecord {
    pub query_name: String,
    pub query_length: u64,
    pub query_start: u64,
    pub query_end: u64,
    pub target_name: String,
    pub target_length: u64,
    pub target_start: u64,
    pub target_end: u64,
    pub n_matches: u64,
    pub block_length: u64,
    pub mapping_quality: u8,
    pub identity: f64,
    pub mismatches: u64,
    pub insertions: u64,
    pub deletions: u64,
    pub softclips: u64,
    pub edit_distance: u32,
    pub alignment_length: usize,
    pub error_rate: f64,
    pub cigar: Cigar,
}

impl PafRecord {
    pub fn from_segment(
        alignment: &SegmentAlignment,
        scored: ScoredAlignment,
        metadata: &PairMetadata,
    ) -> PafRecord {
        let identity = scored.identity();
        let query_start = (alignment.j + alignment.skip_query_start) as u64;
        let target_start =
            (alignment.i + alignment.start_location + scored.skipped_target_start) as u64;
        PafRecord {
            query_name: metadata.query_name.clone(),
            query_length: metadata.query_length,
            query_start,
            query_end: query_start + scored.q_aligned_length,
            target_name: metadata.target_name.clone(),
            target_length: metadata.target_length,
            target_start,
            target_end: target_start + scored.ref_aligned_length,
            n_matches: scored.matches,
            block_length: scored.ref_aligned_length.max(scored.q_aligned_length),
            mapping_quality: phred_scaled_error(identity),
            identity,
            mismatches: scored.mismatches,
            insertions: scored.insertions,
            deletions: scored.deletions,
            softclips: scored.softclips,
            edit_distance: alignment.edit_distance,
            alignment_length: alignment.ops.len(),
            error_rate: alignment.edit_distance as f64 / alignment.ops.len() as f64,
            cigar: scored.cigar,
        }
    }
}

impl Display for PafRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t+\t{}\t{}\t{}\t{}\t{}\t{}\t{}\
             \tid:f:{}\tma:i:{}\tmm:i:{}\tni:i:{}\tnd:i:{}\tns:i:{}\ted:i:{}\tal:i:{}\tse:f:{}\tcg:Z:{}",
            self.query_name,
            self.query_length,
            self.query_start,
            self.query_end,
            self.target_name,
            self.target_length,
            self.target_start,
            self.target_end,
            self.n_matches,
            self.block_length,
            self.mapping_quality,
            self.identity,
            self.n_matches,
            self.mismatches,
            self.insertions,
            self.deletions,
            self.softclips,
            self.edit_distance,
            self.alignment_length,
            self.error_rate,
            self.cigar,
        )
    }
}

#[cfg(test)]
mod test {
    use super::{PafRecord, PairMetadata};
    use crate::score::score_segment;
    use crate::segment::SegmentAlignment;
    use bio::alignment::AlignmentOperation::{Match, Subst};

    #[test]
    fn record_formatting() {
        let mut ops = vec![Match; 16];
        ops[8] = Subst;
        let alignment = SegmentAlignment {
            j: 16,
            i: 24,
            ops,
            edit_distance: 1,
            start_location: 0,
            skip_query_start: 4,
            keep_query_length: 8,
        };
        let metadata = PairMetadata {
            query_name: "q1".to_string(),
            query_length: 64,
            target_name: "t1".to_string(),
            target_length: 64,
        };
        let scored = score_segment(&alignment).unwrap();
        let record = PafRecord::from_segment(&alignment, scored, &metadata);
        assert_eq!(record.query_start, 20);
        assert_eq!(record.query_end, 28);
        assert_eq!(record.target_start, 28);
        assert_eq!(record.target_end, 36);
        let line = record.to_string();
        let fields: Vec<&str> = line.split('\t').collect();
        assert_eq!(fields[0], "q1");
        assert_eq!(fields[4], "+");
        assert_eq!(fields[5], "t1");
        assert_eq!(fields[9], "7");
        assert_eq!(fields[12], "id:f:0.875");
        assert_eq!(fields[18], "ed:i:1");
        assert_eq!(fields[19], "al:i:16");
        assert_eq!(fields[21], "cg:Z:4=1X3=");
    }
}

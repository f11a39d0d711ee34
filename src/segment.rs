use bio::alignment::pairwise::{Aligner, MatchParams};
use bio::alignment::AlignmentOperation;

/// Base-level alignment of one grid cell: the window starting at query
/// offset `j` aligned globally against the window at target offset `i`.
///
/// `skip_query_start`/`keep_query_length` restrict the part of the edit
/// script that is reported; zero means "keep everything". They are assigned
/// during chain merging, never here.
#[derive(Debug)]
pub struct SegmentAlignment {
    pub j: usize,
    pub i: usize,
    pub ops: Vec<AlignmentOperation>,
    pub edit_distance: u32,
    pub start_location: usize,
    pub skip_query_start: usize,
    pub keep_query_length: usize,
}

/// Wraps the pairwise alignment primitive over fixed-size windows.
///
/// Scoring is unit-cost (match 0, everything else -1), so the negated
/// alignment score is the edit distance and the operation list is the full
/// edit path of a global (NW) alignment.
pub struct SegmentAligner {
    segment_length: usize,
    max_distance: u32,
    aligner: Aligner<MatchParams>,
    calls: usize,
}

impl SegmentAligner {
    pub fn new(segment_length: usize, max_distance: usize) -> Self {
        let aligner = Aligner::with_capacity(
            segment_length,
            segment_length,
            0,
            -1,
            MatchParams::new(0, -1),
        );
        SegmentAligner {
            segment_length,
            max_distance: max_distance as u32,
            aligner,
            calls: 0,
        }
    }

    /// Number of primitive invocations so far
    pub fn calls(&self) -> usize {
        self.calls
    }

    /// Align the two windows and validate the result. Returns None when the
    /// alignment is unusable: empty path, or edit distance beyond
    /// `max_distance` (the bounded-k failure of the primitive).
    pub fn align(
        &mut self,
        query: &[u8],
        target: &[u8],
        j: usize,
        i: usize,
    ) -> Option<SegmentAlignment> {
        self.calls += 1;

        let query_window = &query[j..j + self.segment_length];
        let target_window = &target[i..i + self.segment_length];
        let alignment = self.aligner.global(query_window, target_window);

        let edit_distance = -alignment.score;
        if alignment.operations.is_empty()
            || edit_distance < 0
            || edit_distance as u32 > self.max_distance
        {
            return None;
        }

        Some(SegmentAlignment {
            j,
            i,
            ops: alignment.operations,
            edit_distance: edit_distance as u32,
            start_location: alignment.ystart,
            skip_query_start: 0,
            keep_query_length: 0,
        })
    }
}

use crate::cache::SegmentCache;
use crate::segment::SegmentAligner;
use crate::wavefront::MatchOracle;

/// Answers the wavefront engine's grid queries from the segment cache,
/// computing segment alignments lazily, and records the cells the engine
/// replays during backtrace.
pub struct SegmentOracle<'a> {
    query: &'a [u8],
    target: &'a [u8],
    pattern_length: i32,
    text_length: i32,
    step_size: usize,
    aligner: SegmentAligner,
    cache: SegmentCache,
    trace: Vec<(i32, i32)>,
}

impl<'a> SegmentOracle<'a> {
    pub fn new(
        query: &'a [u8],
        target: &'a [u8],
        pattern_length: i32,
        text_length: i32,
        segment_length: usize,
        step_size: usize,
    ) -> Self {
        SegmentOracle {
            query,
            target,
            pattern_length,
            text_length,
            step_size,
            aligner: SegmentAligner::new(segment_length, step_size),
            cache: SegmentCache::new(),
            trace: vec![],
        }
    }

    /// Replayed cells, most recent first
    pub fn trace_path(&self) -> &[(i32, i32)] {
        &self.trace
    }

    pub fn cache(&self) -> &SegmentCache {
        &self.cache
    }

    /// Number of base-level alignment invocations
    pub fn alignment_calls(&self) -> usize {
        self.aligner.calls()
    }

    pub fn into_parts(self) -> (SegmentCache, Vec<(i32, i32)>) {
        (self.cache, self.trace)
    }
}

impl MatchOracle for SegmentOracle<'_> {
    fn extend(&mut self, v: i32, h: i32) -> bool {
        if v < 0 || h < 0 || v >= self.pattern_length || h >= self.text_length {
            return false;
        }
        self.cache.get_or_compute(
            v,
            h,
            &mut self.aligner,
            self.query,
            self.target,
            self.step_size,
        )
    }

    fn trace(&mut self, v: i32, h: i32) -> bool {
        if self.cache.lookup(v, h).is_some() {
            self.trace.push((v, h));
            true
        } else {
            false
        }
    }
}

use fxhash::FxHashMap;

use crate::segment::{SegmentAligner, SegmentAlignment};

/// Memoized segment alignments keyed by grid coordinate `(v, h)`.
///
/// At most one record per coordinate; once stored, a cell is never
/// recomputed. Only valid alignments are stored, so presence in the map is
/// what "this cell is a match" means for the wavefront search.
#[derive(Default)]
pub struct SegmentCache {
    map: FxHashMap<(i32, i32), SegmentAlignment>,
}

impl SegmentCache {
    pub fn new() -> Self {
        SegmentCache::default()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns whether a valid alignment exists at `(v, h)`, computing and
    /// storing it on first success. Failures are not stored.
    pub fn get_or_compute(
        &mut self,
        v: i32,
        h: i32,
        aligner: &mut SegmentAligner,
        query: &[u8],
        target: &[u8],
        step_size: usize,
    ) -> bool {
        if self.map.contains_key(&(v, h)) {
            return true;
        }
        let j = v as usize * step_size;
        let i = h as usize * step_size;
        match aligner.align(query, target, j, i) {
            Some(alignment) => {
                self.map.insert((v, h), alignment);
                true
            }
            None => false,
        }
    }

    /// Pure read, used during traceback. Never computes.
    pub fn lookup(&self, v: i32, h: i32) -> Option<&SegmentAlignment> {
        self.map.get(&(v, h))
    }

    pub fn lookup_mut(&mut self, v: i32, h: i32) -> Option<&mut SegmentAlignment> {
        self.map.get_mut(&(v, h))
    }
}

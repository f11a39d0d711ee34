//! Gap-affine wavefront alignment over an abstract grid.
//!
//! The engine never sees sequences. It explores a `pattern_length` x
//! `text_length` grid whose match structure is answered cell by cell through
//! the [`MatchOracle`], and replays the optimal path through the oracle's
//! `trace` during backtrace. Diagonals are indexed `k = h - v`; a wavefront
//! stores, per diagonal, the furthest `h` reached at a given score.

const OFFSET_NULL: i32 = i32::MIN / 2;

/// Grid-cell oracle injected into the engine.
///
/// `extend` answers whether cell `(v, h)` matches; it must tolerate
/// coordinates outside the grid (and answer false). `trace` is called once
/// per matched cell of the optimal path, most recent first, after the
/// forward search has converged.
pub trait MatchOracle {
    fn extend(&mut self, v: i32, h: i32) -> bool;
    fn trace(&mut self, v: i32, h: i32) -> bool;
}

/// Gap-affine costs. Match is a cost too (zero in practice).
#[derive(Debug, Clone, Copy)]
pub struct Penalties {
    pub match_: i32,
    pub mismatch: i32,
    pub gap_open: i32,
    pub gap_extend: i32,
}

#[derive(Clone)]
struct Wavefront {
    lo: i32,
    hi: i32,
    offsets: Vec<i32>,
}

impl Wavefront {
    fn null() -> Self {
        Wavefront {
            lo: 0,
            hi: -1,
            offsets: vec![],
        }
    }

    fn new(lo: i32, hi: i32) -> Self {
        Wavefront {
            lo,
            hi,
            offsets: vec![OFFSET_NULL; (hi - lo + 1) as usize],
        }
    }

    fn is_null(&self) -> bool {
        self.hi < self.lo
    }

    fn get(&self, k: i32) -> i32 {
        if k < self.lo || k > self.hi {
            OFFSET_NULL
        } else {
            self.offsets[(k - self.lo) as usize]
        }
    }

    fn set(&mut self, k: i32, offset: i32) {
        self.offsets[(k - self.lo) as usize] = offset;
    }

    /// Restrict the diagonal range to the intersection with `[lo, hi]`.
    fn shrink(&mut self, lo: i32, hi: i32) {
        let new_lo = lo.max(self.lo);
        let new_hi = hi.min(self.hi);
        if new_hi < new_lo {
            *self = Wavefront::null();
            return;
        }
        self.offsets
            .drain(..(new_lo - self.lo) as usize);
        self.offsets.truncate((new_hi - new_lo + 1) as usize);
        self.lo = new_lo;
        self.hi = new_hi;
    }
}

struct WavefrontSet {
    m: Wavefront,
    i: Wavefront,
    d: Wavefront,
}

enum Mode {
    Complete,
    Reduced {
        min_wavefront_length: i32,
        max_distance_threshold: i32,
    },
}

#[derive(PartialEq, Clone, Copy)]
enum Matrix {
    M,
    I,
    D,
}

pub struct AffineWavefronts {
    pattern_length: i32,
    text_length: i32,
    penalties: Penalties,
    mode: Mode,
    wavefronts: Vec<WavefrontSet>,
    cigar: Vec<u8>,
}

impl AffineWavefronts {
    pub fn new_complete(pattern_length: i32, text_length: i32, penalties: Penalties) -> Self {
        assert!(pattern_length > 0 && text_length > 0);
        AffineWavefronts {
            pattern_length,
            text_length,
            penalties,
            mode: Mode::Complete,
            wavefronts: vec![],
            cigar: vec![],
        }
    }

    pub fn new_reduced(
        pattern_length: i32,
        text_length: i32,
        penalties: Penalties,
        min_wavefront_length: i32,
        max_distance_threshold: i32,
    ) -> Self {
        assert!(pattern_length > 0 && text_length > 0);
        AffineWavefronts {
            pattern_length,
            text_length,
            penalties,
            mode: Mode::Reduced {
                min_wavefront_length,
                max_distance_threshold,
            },
            wavefronts: vec![],
            cigar: vec![],
        }
    }

    /// Grid-level edit operations (`M`/`X`/`I`/`D`) of the converged
    /// alignment, start to end. Empty before `align` has run.
    pub fn edit_cigar(&self) -> &[u8] {
        &self.cigar
    }

    /// Gap-affine cost of an edit cigar; equals the score `align` returns
    /// when applied to its own result.
    pub fn cigar_score(cigar: &[u8], penalties: &Penalties) -> i32 {
        let mut score = 0;
        let mut last_op = 0u8;
        for &op in cigar {
            match op {
                b'M' => score += penalties.match_,
                b'X' => score += penalties.mismatch,
                b'I' | b'D' => {
                    score += penalties.gap_extend;
                    if last_op != op {
                        score += penalties.gap_open;
                    }
                }
                _ => unreachable!(),
            }
            last_op = op;
        }
        score
    }

    /// Forward search followed by backtrace. Returns the alignment cost, or
    /// None if the search exceeded its worst-case cost bound.
    pub fn align<O: MatchOracle>(&mut self, oracle: &mut O) -> Option<i32> {
        let k_end = self.text_length - self.pattern_length;
        // Worst case: mismatch along the whole main diagonal, then bridge
        // the length difference with one gap.
        let diff = (self.text_length - self.pattern_length).abs();
        let mut max_score =
            self.penalties.mismatch * self.pattern_length.min(self.text_length);
        if diff > 0 {
            max_score += self.penalties.gap_open + self.penalties.gap_extend * diff;
        }

        self.wavefronts.clear();
        self.cigar.clear();
        let mut first = WavefrontSet {
            m: Wavefront::new(0, 0),
            i: Wavefront::null(),
            d: Wavefront::null(),
        };
        first.m.set(0, 0);
        self.wavefronts.push(first);

        let mut score = 0;
        loop {
            self.extend_wavefront(score, oracle);
            if self.end_reached(score, k_end) {
                break;
            }
            if let Mode::Reduced {
                min_wavefront_length,
                max_distance_threshold,
            } = self.mode
            {
                self.reduce_wavefront(score, min_wavefront_length, max_distance_threshold);
            }
            score += 1;
            if score > max_score {
                return None;
            }
            self.compute_wavefront(score);
        }

        self.backtrace(score, k_end, oracle);
        Some(score)
    }

    fn m_at(&self, score: i32, k: i32) -> i32 {
        if score < 0 {
            return OFFSET_NULL;
        }
        self.wavefronts
            .get(score as usize)
            .map_or(OFFSET_NULL, |set| set.m.get(k))
    }

    fn i_at(&self, score: i32, k: i32) -> i32 {
        if score < 0 {
            return OFFSET_NULL;
        }
        self.wavefronts
            .get(score as usize)
            .map_or(OFFSET_NULL, |set| set.i.get(k))
    }

    fn d_at(&self, score: i32, k: i32) -> i32 {
        if score < 0 {
            return OFFSET_NULL;
        }
        self.wavefronts
            .get(score as usize)
            .map_or(OFFSET_NULL, |set| set.d.get(k))
    }

    fn extend_wavefront<O: MatchOracle>(&mut self, score: i32, oracle: &mut O) {
        let wavefront = &mut self.wavefronts[score as usize].m;
        for index in 0..wavefront.offsets.len() {
            let k = wavefront.lo + index as i32;
            let mut offset = wavefront.offsets[index];
            if offset < 0 {
                continue;
            }
            while oracle.extend(offset - k, offset) {
                offset += 1;
            }
            wavefront.offsets[index] = offset;
        }
    }

    fn end_reached(&self, score: i32, k_end: i32) -> bool {
        self.wavefronts[score as usize].m.get(k_end) >= self.text_length
    }

    /// Adaptive reduction: prune diagonals whose distance to the target
    /// corner exceeds the best diagonal's by more than the threshold.
    fn reduce_wavefront(
        &mut self,
        score: i32,
        min_wavefront_length: i32,
        max_distance_threshold: i32,
    ) {
        let pattern_length = self.pattern_length;
        let text_length = self.text_length;
        let set = &mut self.wavefronts[score as usize];
        if set.m.hi - set.m.lo + 1 < min_wavefront_length {
            return;
        }
        let distance = |k: i32, offset: i32| {
            let left_v = pattern_length - (offset - k);
            let left_h = text_length - offset;
            left_v.max(left_h)
        };
        let mut min_distance = i32::MAX;
        for k in set.m.lo..=set.m.hi {
            let offset = set.m.get(k);
            if offset < 0 {
                continue;
            }
            min_distance = min_distance.min(distance(k, offset));
        }
        if min_distance == i32::MAX {
            return;
        }
        let mut lo = set.m.lo;
        let mut hi = set.m.hi;
        while lo < hi {
            let offset = set.m.get(lo);
            if offset >= 0 && distance(lo, offset) <= min_distance + max_distance_threshold {
                break;
            }
            lo += 1;
        }
        while hi > lo {
            let offset = set.m.get(hi);
            if offset >= 0 && distance(hi, offset) <= min_distance + max_distance_threshold {
                break;
            }
            hi -= 1;
        }
        set.m.shrink(lo, hi);
        set.i.shrink(lo, hi);
        set.d.shrink(lo, hi);
    }

    fn compute_wavefront(&mut self, score: i32) {
        let p = self.penalties;
        let s_mismatch = score - p.mismatch;
        let s_open = score - p.gap_open - p.gap_extend;
        let s_extend = score - p.gap_extend;

        let mut lo = i32::MAX;
        let mut hi = i32::MIN;
        let mut merge = |wavefront: Option<&Wavefront>| {
            if let Some(wavefront) = wavefront {
                if !wavefront.is_null() {
                    lo = lo.min(wavefront.lo);
                    hi = hi.max(wavefront.hi);
                }
            }
        };
        let source = |s: i32| {
            if s < 0 {
                None
            } else {
                self.wavefronts.get(s as usize)
            }
        };
        merge(source(s_mismatch).map(|set| &set.m));
        merge(source(s_open).map(|set| &set.m));
        merge(source(s_extend).map(|set| &set.i));
        merge(source(s_extend).map(|set| &set.d));

        if lo == i32::MAX {
            self.wavefronts.push(WavefrontSet {
                m: Wavefront::null(),
                i: Wavefront::null(),
                d: Wavefront::null(),
            });
            return;
        }
        lo -= 1;
        hi += 1;

        let mut m = Wavefront::new(lo, hi);
        let mut i = Wavefront::new(lo, hi);
        let mut d = Wavefront::new(lo, hi);
        for k in lo..=hi {
            let ins = self.m_at(s_open, k - 1).max(self.i_at(s_extend, k - 1));
            let ins = if ins < 0 { OFFSET_NULL } else { ins + 1 };
            let del = self.m_at(s_open, k + 1).max(self.d_at(s_extend, k + 1));
            let del = if del < 0 { OFFSET_NULL } else { del };
            let mis = self.m_at(s_mismatch, k);
            let mis = if mis < 0 { OFFSET_NULL } else { mis + 1 };
            i.set(k, ins);
            d.set(k, del);
            let best = mis.max(ins).max(del);
            m.set(k, if best < 0 { OFFSET_NULL } else { best });
        }
        self.wavefronts.push(WavefrontSet { m, i, d });
    }

    fn backtrace<O: MatchOracle>(&mut self, score: i32, k_end: i32, oracle: &mut O) {
        let p = self.penalties;
        let mut ops: Vec<u8> = vec![];
        let mut s = score;
        let mut k = k_end;
        let mut offset = self.wavefronts[score as usize].m.get(k_end);
        let mut matrix = Matrix::M;

        loop {
            let v = offset - k;
            let h = offset;
            if v <= 0 || h <= 0 || s <= 0 {
                break;
            }
            match matrix {
                Matrix::M => {
                    let mis = self.m_at(s - p.mismatch, k);
                    let mis = if mis < 0 { OFFSET_NULL } else { mis + 1 };
                    let ins = self.i_at(s, k);
                    let del = self.d_at(s, k);
                    let best = mis.max(ins).max(del);
                    if best < 0 {
                        debug_assert!(false, "backtrace lost the optimal path");
                        break;
                    }
                    // Replay matched cells, most recent first
                    for cell in (best..offset).rev() {
                        oracle.trace(cell - k, cell);
                        ops.push(b'M');
                    }
                    offset = best;
                    if best == mis {
                        ops.push(b'X');
                        s -= p.mismatch;
                        offset -= 1;
                    } else if best == ins {
                        matrix = Matrix::I;
                    } else {
                        matrix = Matrix::D;
                    }
                }
                Matrix::I => {
                    ops.push(b'I');
                    let open = self.m_at(s - p.gap_open - p.gap_extend, k - 1);
                    offset -= 1;
                    k -= 1;
                    if open == offset {
                        matrix = Matrix::M;
                        s -= p.gap_open + p.gap_extend;
                    } else {
                        s -= p.gap_extend;
                    }
                }
                Matrix::D => {
                    ops.push(b'D');
                    let open = self.m_at(s - p.gap_open - p.gap_extend, k + 1);
                    k += 1;
                    if open == offset {
                        matrix = Matrix::M;
                        s -= p.gap_open + p.gap_extend;
                    } else {
                        s -= p.gap_extend;
                    }
                }
            }
        }

        let v = offset - k;
        let h = offset;
        if s == 0 {
            debug_assert_eq!(k, 0);
            for cell in (0..offset).rev() {
                oracle.trace(cell - k, cell);
                ops.push(b'M');
            }
        } else {
            for _ in 0..v {
                ops.push(b'D');
            }
            for _ in 0..h {
                ops.push(b'I');
            }
        }

        ops.reverse();
        self.cigar = ops;
    }
}

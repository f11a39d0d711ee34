use std::io::{self, Write};

use log::{debug, error};

use crate::chain::trim_chain;
use crate::fasta::RefSequence;
use crate::oracle::SegmentOracle;
use crate::paf::{PafRecord, PairMetadata};
use crate::score::score_segment;
use crate::segment::{SegmentAligner, SegmentAlignment};
use crate::wavefront::{AffineWavefronts, Penalties};

#[derive(Debug, Clone)]
pub struct MappingParameters {
    pub segment_length: usize,
    pub min_identity: f64,
    pub min_wavefront_length: i32,
    pub max_distance_threshold: i32,
}

impl Default for MappingParameters {
    fn default() -> Self {
        MappingParameters {
            segment_length: 256,
            min_identity: 0.0,
            min_wavefront_length: 0,
            max_distance_threshold: 0,
        }
    }
}

/// Grid-level penalties. Not user-tunable: a grid mismatch is an invalid
/// window pair, not a biological event.
fn grid_penalties() -> Penalties {
    Penalties {
        match_: 0,
        mismatch: 4,
        gap_open: 6,
        gap_extend: 2,
    }
}

/// Align one query/target pair by wavefront search over the segment grid and
/// stream the merged, trimmed segment records.
pub fn map_pair<W: Write>(
    query: &RefSequence,
    target: &RefSequence,
    parameters: &MappingParameters,
    out: &mut W,
) -> io::Result<()> {
    let segment_length = parameters.segment_length;
    let step_size = segment_length / 2;
    if step_size == 0 {
        return Ok(());
    }
    let pattern_length = (query.sequence.len() / step_size) as i64 - 2;
    let text_length = (target.sequence.len() / step_size) as i64 - 2;
    if pattern_length <= 0 || text_length <= 0 {
        debug!(
            "segment grid for {} x {} is empty, skipping",
            query.name, target.name
        );
        return Ok(());
    }
    let (pattern_length, text_length) = (pattern_length as i32, text_length as i32);

    let mut oracle = SegmentOracle::new(
        &query.sequence,
        &target.sequence,
        pattern_length,
        text_length,
        segment_length,
        step_size,
    );
    let banded =
        parameters.min_wavefront_length > 0 || parameters.max_distance_threshold > 0;
    let mut wavefronts = if banded {
        AffineWavefronts::new_reduced(
            pattern_length,
            text_length,
            grid_penalties(),
            parameters.min_wavefront_length,
            parameters.max_distance_threshold,
        )
    } else {
        AffineWavefronts::new_complete(pattern_length, text_length, grid_penalties())
    };

    match wavefronts.align(&mut oracle) {
        Some(score) => debug!(
            "alignment score {} for query: {} target: {}",
            score, query.name, target.name
        ),
        None => {
            error!(
                "wavefront search did not converge for query: {} target: {}",
                query.name, target.name
            );
            return Ok(());
        }
    }

    let metadata = pair_metadata(query, target);
    let (mut cache, mut path) = oracle.into_parts();
    // The engine reports the path most recent first; merge oldest first
    path.reverse();
    trim_chain(&path, step_size, &mut cache);
    for &(v, h) in &path {
        if let Some(alignment) = cache.lookup(v, h) {
            write_alignment(alignment, &metadata, parameters.min_identity, out)?;
        }
    }
    Ok(())
}

/// Align every window pair of the grid, unguided, and emit each one
/// untrimmed. Quadratic in the number of windows.
pub fn full_scan<W: Write>(
    query: &RefSequence,
    target: &RefSequence,
    parameters: &MappingParameters,
    out: &mut W,
) -> io::Result<()> {
    let segment_length = parameters.segment_length;
    let step_size = segment_length / 2;
    if step_size == 0
        || query.sequence.len() < segment_length
        || target.sequence.len() < segment_length
    {
        debug!(
            "no window of length {} fits {} x {}, skipping",
            segment_length, query.name, target.name
        );
        return Ok(());
    }
    let metadata = pair_metadata(query, target);
    let mut aligner = SegmentAligner::new(segment_length, step_size);
    for i in window_offsets(target.sequence.len(), segment_length, step_size) {
        for j in window_offsets(query.sequence.len(), segment_length, step_size) {
            if let Some(alignment) = aligner.align(&query.sequence, &target.sequence, j, i) {
                write_alignment(&alignment, &metadata, parameters.min_identity, out)?;
            }
        }
    }
    Ok(())
}

/// Window starts at `step` stride, plus a final window flush with the end
fn window_offsets(len: usize, segment_length: usize, step: usize) -> Vec<usize> {
    let mut offsets: Vec<usize> = (0..)
        .step_by(step)
        .take_while(|&offset| offset + segment_length + 1 < len)
        .collect();
    offsets.push(len - segment_length);
    offsets
}

fn pair_metadata(query: &RefSequence, target: &RefSequence) -> PairMetadata {
    PairMetadata {
        query_name: query.name.clone(),
        query_length: query.sequence.len() as u64,
        target_name: target.name.clone(),
        target_length: target.sequence.len() as u64,
    }
}

fn write_alignment<W: Write>(
    alignment: &SegmentAlignment,
    metadata: &PairMetadata,
    min_identity: f64,
    out: &mut W,
) -> io::Result<()> {
    let scored = match score_segment(alignment) {
        Ok(scored) => scored,
        Err(e) => {
            error!(
                "{} (query {} target {})",
                e, metadata.query_name, metadata.target_name
            );
            return Ok(());
        }
    };
    if scored.total_columns() == 0 {
        return Ok(());
    }
    if scored.identity() < min_identity {
        return Ok(());
    }
    writeln!(
        out,
        "{}",
        PafRecord::from_segment(alignment, scored, metadata)
    )
}

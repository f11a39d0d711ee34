use crate::cache::SegmentCache;

/// Assign overlap trims along the traceback path so that merged segments
/// tile the query without gaps or double counting.
///
/// `path` is oldest first. A run is a maximal stretch of entries whose grid
/// coordinates both advance by one per step (a pure diagonal in the
/// half-overlapped grid). Within a run every member keeps `step_size` query
/// bases; each interior boundary is split evenly between its two neighbours,
/// and the run ends keep the extra half window nobody else covers.
pub fn trim_chain(path: &[(i32, i32)], step_size: usize, cache: &mut SegmentCache) {
    let trim = step_size / 2;
    let mut start = 0;
    while start < path.len() {
        let mut end = start + 1;
        while end < path.len()
            && path[end].0 == path[end - 1].0 + 1
            && path[end].1 == path[end - 1].1 + 1
        {
            end += 1;
        }
        for index in start..end {
            let (v, h) = path[index];
            if let Some(alignment) = cache.lookup_mut(v, h) {
                alignment.keep_query_length = step_size;
                if index != start {
                    alignment.skip_query_start = trim;
                } else {
                    alignment.keep_query_length += trim;
                }
                if index + 1 == end {
                    alignment.keep_query_length += trim;
                }
            }
        }
        start = end;
    }
}

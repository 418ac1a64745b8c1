//! Ordered, contiguous partitioning of a review sequence into chunks

use std::ops::Range;

/// Split `len` items into exactly `parts` contiguous ranges
///
/// Sizes differ by at most one; the first `len % parts` ranges get the extra
/// item. When `parts > len` the trailing ranges are empty. Ranges are in
/// order, disjoint, and cover `0..len` exactly once.
///
/// `parts` must be at least 1.
pub fn partition(len: usize, parts: usize) -> Vec<Range<usize>> {
    debug_assert!(parts >= 1, "partition requires at least one part");
    let parts = parts.max(1);
    let base = len / parts;
    let extra = len % parts;

    let mut ranges = Vec::with_capacity(parts);
    let mut start = 0;
    for i in 0..parts {
        let size = base + usize::from(i < extra);
        ranges.push(start..start + size);
        start += size;
    }
    ranges
}

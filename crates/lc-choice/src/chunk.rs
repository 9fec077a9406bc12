//! Chooser batching that bounds interaction-row memory.

use std::ops::Range;

/// Split a sequence of choosers into consecutive ranges whose summed row
/// counts stay within `limit`.
///
/// `rows` yields the interaction-row count of each chooser in order.  A
/// chooser is never split, so a range holds at least one chooser even when
/// that chooser alone exceeds `limit`.  `limit == 0` means unbounded: one
/// range covering everything.
pub fn chunk_ranges<I>(rows: I, limit: usize) -> Vec<Range<usize>>
where
    I: IntoIterator<Item = usize>,
{
    let mut ranges = Vec::new();
    let mut start = 0;
    let mut filled = 0;
    let mut n = 0;

    for (i, r) in rows.into_iter().enumerate() {
        n = i + 1;
        if limit > 0 && i > start && filled + r > limit {
            ranges.push(start..i);
            start = i;
            filled = 0;
        }
        filled += r;
    }
    if n > start {
        ranges.push(start..n);
    }
    ranges
}

/// Like [`chunk_ranges`] when every chooser has the same row count.
pub fn uniform_chunks(choosers: usize, rows_per_chooser: usize, limit: usize) -> Vec<Range<usize>> {
    chunk_ranges(std::iter::repeat_n(rows_per_chooser, choosers), limit)
}

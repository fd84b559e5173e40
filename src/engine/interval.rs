//! Interval algebra over half-open `[start, end)` UTC intervals.

use crate::model::TimeInterval;

/// Merge overlapping or contiguous intervals into a sorted, disjoint list.
/// Stable under any input order; empty input yields empty output.
pub fn merge(mut intervals: Vec<TimeInterval>) -> Vec<TimeInterval> {
    intervals.sort_by_key(|iv| iv.start);
    let mut merged: Vec<TimeInterval> = Vec::with_capacity(intervals.len());
    for iv in intervals {
        if let Some(last) = merged.last_mut()
            && iv.start <= last.end
        {
            last.end = last.end.max(iv.end);
            continue;
        }
        merged.push(iv);
    }
    merged
}

/// Remove `occupied` time from `base`, which must be sorted and disjoint
/// (the output of [`merge`]). An occupied interval that covers a base
/// piece eliminates it, partial overlap truncates it, and an interior
/// overlap splits it in two. Never emits a zero-length interval.
pub fn subtract(base: &[TimeInterval], occupied: &[TimeInterval]) -> Vec<TimeInterval> {
    if occupied.is_empty() {
        return base.to_vec();
    }
    let mut occupied = occupied.to_vec();
    occupied.sort_by_key(|iv| iv.start);

    let mut result = Vec::new();
    let mut ri = 0;

    for &b in base {
        let mut cursor = b.start;
        let end = b.end;

        while ri < occupied.len() && occupied[ri].end <= cursor {
            ri += 1;
        }

        let mut j = ri;
        while j < occupied.len() && occupied[j].start < end {
            let r = &occupied[j];
            if r.start > cursor {
                result.push(TimeInterval::new(cursor, r.start));
            }
            cursor = cursor.max(r.end);
            j += 1;
        }

        if cursor < end {
            result.push(TimeInterval::new(cursor, end));
        }
    }

    result
}

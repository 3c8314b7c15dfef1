//! Busy-interval normalization.
//!
//! Calendar sources may return intervals unsorted, overlapping, duplicated or
//! empty. Normalizing once per request yields a sorted, disjoint list that the
//! conflict filter can binary-search.

use crate::types::BusyInterval;

/// Merge overlapping, adjacent and duplicate busy intervals.
///
/// Empty intervals (`end <= start`) cover no time under `[start, end)` and are
/// dropped. Returns intervals sorted by start, pairwise disjoint and
/// non-adjacent.
pub fn normalize_busy(intervals: &[BusyInterval]) -> Vec<BusyInterval> {
    let mut sorted: Vec<BusyInterval> = intervals
        .iter()
        .filter(|b| !b.is_empty())
        .copied()
        .collect();

    sorted.sort_by_key(|b| (b.start, b.end));

    let mut merged: Vec<BusyInterval> = Vec::with_capacity(sorted.len());
    for interval in sorted {
        if let Some(last) = merged.last_mut() {
            if interval.start <= last.end {
                last.end = last.end.max(interval.end);
                continue;
            }
        }
        merged.push(interval);
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn busy(start_hour: u32, end_hour: u32) -> BusyInterval {
        BusyInterval::new(
            Utc.with_ymd_and_hms(2026, 3, 2, start_hour, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 2, end_hour, 0, 0).unwrap(),
        )
    }

    #[test]
    fn unsorted_overlapping_and_duplicate_intervals_collapse() {
        let input = vec![busy(14, 15), busy(9, 11), busy(10, 12), busy(14, 15)];
        assert_eq!(normalize_busy(&input), vec![busy(9, 12), busy(14, 15)]);
    }

    #[test]
    fn adjacent_intervals_are_joined() {
        assert_eq!(normalize_busy(&[busy(10, 11), busy(9, 10)]), vec![busy(9, 11)]);
    }

    #[test]
    fn nested_interval_is_absorbed() {
        assert_eq!(normalize_busy(&[busy(9, 17), busy(12, 13)]), vec![busy(9, 17)]);
    }

    #[test]
    fn empty_and_inverted_intervals_are_dropped() {
        assert!(normalize_busy(&[busy(10, 10), busy(12, 11)]).is_empty());
        assert!(normalize_busy(&[]).is_empty());
    }
}

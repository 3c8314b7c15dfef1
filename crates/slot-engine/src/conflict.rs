//! Buffer-aware conflict filtering of candidate slots.
//!
//! Each candidate is widened by the buffer on both sides and tested against
//! every busy interval. Touching is not a conflict: a busy interval ending
//! exactly when the widened window starts leaves the slot available.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::busy::normalize_busy;
use crate::types::{BusyInterval, TimeSlot};

/// The slot widened by `buffer_minutes` on both sides.
pub fn buffered_window(slot: &TimeSlot, buffer_minutes: u32) -> (DateTime<Utc>, DateTime<Utc>) {
    let buffer = Duration::minutes(i64::from(buffer_minutes));
    (slot.start - buffer, slot.end + buffer)
}

/// Whether the window `[window_start, window_end]` collides with `busy`.
///
/// A collision is any of: the window starts inside the busy interval, the
/// window ends inside it, or the window fully contains it. Empty busy
/// intervals never collide.
pub fn overlaps_busy(
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
    busy: &BusyInterval,
) -> bool {
    if busy.is_empty() {
        return false;
    }
    let starts_inside = busy.contains(window_start);
    let ends_inside = busy.start < window_end && window_end <= busy.end;
    let contains_busy = window_start <= busy.start && busy.end <= window_end;
    starts_inside || ends_inside || contains_busy
}

/// Whether `slot` (plus buffer) collides with any of the `normalized` intervals.
///
/// `normalized` must come from [`normalize_busy`]: sorted and disjoint. Only
/// the first interval ending after the window start can collide, so this is
/// a binary search plus one check.
pub fn slot_conflicts(slot: &TimeSlot, normalized: &[BusyInterval], buffer_minutes: u32) -> bool {
    let (window_start, window_end) = buffered_window(slot, buffer_minutes);
    let idx = normalized.partition_point(|b| b.end <= window_start);
    normalized
        .get(idx)
        .is_some_and(|busy| overlaps_busy(window_start, window_end, busy))
}

/// Keep only the candidates whose buffered window is clear of every busy interval.
///
/// `busy` may be unsorted and contain overlaps or duplicates; it is normalized
/// once here. Candidate order is preserved.
pub fn filter_conflicts(
    candidates: Vec<TimeSlot>,
    busy: &[BusyInterval],
    buffer_minutes: u32,
) -> Vec<TimeSlot> {
    let normalized = normalize_busy(busy);
    let total = candidates.len();

    let surviving: Vec<TimeSlot> = candidates
        .into_iter()
        .filter(|slot| !slot_conflicts(slot, &normalized, buffer_minutes))
        .collect();

    debug!(
        busy = busy.len(),
        merged_busy = normalized.len(),
        candidates = total,
        surviving = surviving.len(),
        "filtered conflicting slots"
    );

    surviving
}

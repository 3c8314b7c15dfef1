//! Tests for buffer-aware conflict filtering.

use chrono::{DateTime, TimeZone, Utc};
use slot_engine::busy::normalize_busy;
use slot_engine::conflict::{overlaps_busy, slot_conflicts};
use slot_engine::{filter_conflicts, BusyInterval, TimeSlot};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn at(hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, hour, min, 0).unwrap()
}

fn busy(start_hour: u32, start_min: u32, end_hour: u32, end_min: u32) -> BusyInterval {
    BusyInterval::new(at(start_hour, start_min), at(end_hour, end_min))
}

fn slot(hour: u32, min: u32, duration_minutes: i64) -> TimeSlot {
    TimeSlot::new(at(hour, min), duration_minutes)
}

fn starts(slots: &[TimeSlot]) -> Vec<DateTime<Utc>> {
    slots.iter().map(|s| s.start).collect()
}

// ── The three collision shapes ──────────────────────────────────────────────

#[test]
fn window_starting_inside_busy_collides() {
    // Busy 09:00-10:00, window 09:30-10:30.
    assert!(overlaps_busy(at(9, 30), at(10, 30), &busy(9, 0, 10, 0)));
}

#[test]
fn window_ending_inside_busy_collides() {
    // Busy 10:00-11:00, window 09:30-10:30.
    assert!(overlaps_busy(at(9, 30), at(10, 30), &busy(10, 0, 11, 0)));
}

#[test]
fn window_containing_busy_collides() {
    // Busy 10:00-10:15 sits entirely inside window 09:30-10:30.
    assert!(overlaps_busy(at(9, 30), at(10, 30), &busy(10, 0, 10, 15)));
}

#[test]
fn touching_intervals_do_not_collide() {
    // Busy 09:00-10:00 then window 10:00-11:00, and the mirror case.
    assert!(!overlaps_busy(at(10, 0), at(11, 0), &busy(9, 0, 10, 0)));
    assert!(!overlaps_busy(at(8, 0), at(9, 0), &busy(9, 0, 10, 0)));
}

#[test]
fn empty_busy_interval_never_collides() {
    assert!(!overlaps_busy(at(9, 0), at(11, 0), &busy(10, 0, 10, 0)));
}

// ── Filtering ───────────────────────────────────────────────────────────────

#[test]
fn busy_interval_straddling_the_slot_rejects_it() {
    // Busy 09:00-12:00 fully contains slot 10:00-11:00: neither endpoint of the
    // busy interval lies inside the slot, yet the slot must go.
    let kept = filter_conflicts(vec![slot(10, 0, 60)], &[busy(9, 0, 12, 0)], 0);
    assert!(kept.is_empty());
}

#[test]
fn buffer_turns_adjacency_into_conflict() {
    // Busy 09:00-10:00; slot 10:00-10:30.
    let candidates = vec![slot(10, 0, 30)];
    let interval = [busy(9, 0, 10, 0)];

    assert_eq!(filter_conflicts(candidates.clone(), &interval, 0).len(), 1);
    assert!(filter_conflicts(candidates, &interval, 15).is_empty());
}

#[test]
fn buffer_applies_after_the_slot_too() {
    // Slot 09:00-09:30, busy 09:40-10:00: 15 minutes of buffer reaches 09:45.
    let candidates = vec![slot(9, 0, 30)];
    let interval = [busy(9, 40, 10, 0)];

    assert!(filter_conflicts(candidates.clone(), &interval, 15).is_empty());
    assert_eq!(filter_conflicts(candidates, &interval, 10).len(), 1);
}

#[test]
fn unsorted_overlapping_and_duplicate_busy_intervals() {
    // Effective busy time: 10:00-12:00 and 14:00-15:00.
    let raw = vec![
        busy(14, 0, 15, 0),
        busy(11, 0, 12, 0),
        busy(10, 0, 11, 30),
        busy(14, 0, 15, 0),
    ];
    let candidates: Vec<TimeSlot> = (9..17).map(|h| slot(h, 0, 60)).collect();

    let kept = filter_conflicts(candidates, &raw, 0);

    assert_eq!(
        starts(&kept),
        vec![at(9, 0), at(12, 0), at(13, 0), at(15, 0), at(16, 0)]
    );
}

#[test]
fn candidate_order_is_preserved_and_nothing_is_rescored() {
    let candidates = vec![slot(9, 0, 30), slot(13, 0, 30), slot(16, 0, 30)];
    let kept = filter_conflicts(candidates.clone(), &[busy(12, 0, 14, 0)], 0);

    assert_eq!(kept, vec![candidates[0].clone(), candidates[2].clone()]);
    assert!(kept.iter().all(|s| s.available && s.score.is_none()));
}

#[test]
fn no_busy_time_keeps_everything() {
    let candidates: Vec<TimeSlot> = (9..12).map(|h| slot(h, 0, 60)).collect();
    assert_eq!(filter_conflicts(candidates.clone(), &[], 30), candidates);
}

#[test]
fn binary_search_agrees_with_linear_scan() {
    let raw = vec![
        busy(9, 10, 9, 20),
        busy(11, 0, 11, 5),
        busy(13, 30, 15, 0),
        busy(16, 55, 17, 0),
    ];
    let normalized = normalize_busy(&raw);

    for minute in (8 * 60..18 * 60).step_by(5) {
        let candidate = slot(minute / 60, minute % 60, 25);
        for buffer in [0, 5, 20] {
            let (ws, we) = slot_engine::conflict::buffered_window(&candidate, buffer);
            let linear = raw.iter().any(|b| overlaps_busy(ws, we, b));
            assert_eq!(
                slot_conflicts(&candidate, &normalized, buffer),
                linear,
                "disagreement at {} with buffer {}",
                candidate.start,
                buffer
            );
        }
    }
}

use chrono::{Duration, TimeZone, Utc};
use criterion::{criterion_group, criterion_main, Criterion};
use slot_engine::{
    filter_conflicts, generate_slots, rank_slots, BusyInterval, DateRange, SchedulingPreferences,
};
use std::hint::black_box;

/// A month of 15-minute slots against a calendar with a meeting every 90 minutes.
fn bench_pipeline(c: &mut Criterion) {
    let start = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
    let range = DateRange::days_from(start, 30).unwrap();
    let prefs = SchedulingPreferences::default()
        .with_timezone("America/New_York")
        .with_buffer(5);

    let busy: Vec<BusyInterval> = (0..30 * 16)
        .map(|i| {
            let s = start + Duration::minutes(i * 90);
            BusyInterval::new(s, s + Duration::minutes(40))
        })
        .collect();

    c.bench_function("generate_30_days", |b| {
        b.iter(|| generate_slots(black_box(&range), 15, 5, &prefs).unwrap())
    });

    let candidates = generate_slots(&range, 15, 5, &prefs).unwrap();

    c.bench_function("filter_30_days", |b| {
        b.iter(|| filter_conflicts(black_box(candidates.clone()), black_box(&busy), 5))
    });

    let available = filter_conflicts(candidates, &busy, 5);

    c.bench_function("rank_30_days", |b| {
        b.iter(|| rank_slots(black_box(&available), start, &prefs, 10).unwrap())
    });
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);

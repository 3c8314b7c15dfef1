//! Candidate slot generation from business-hour rules alone.
//!
//! Walks every local calendar day touched by the search range and lays slots
//! end to end across each working day's open window, separated by the buffer.
//! No calendar data is consulted here, so the output is a pure function of the
//! range, duration, buffer and preferences.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::debug;

use crate::error::{EngineError, Result};
use crate::preferences::SchedulingPreferences;
use crate::types::{DateRange, TimeSlot};

/// Longest spring-forward gap we step over when a boundary lands inside one.
const MAX_DST_GAP_MINUTES: i64 = 180;

/// Longest appointment accepted. Nothing longer fits inside one day's working hours.
pub const MAX_DURATION_MINUTES: i64 = 24 * 60;

/// Generate every structurally valid slot in `range`.
///
/// Days are iterated from the local date of `range.start` to the local date of
/// `range.end`, inclusive, in `preferences.timezone`. On each working day the
/// first slot starts at opening time and each following slot starts
/// `duration_minutes + buffer_minutes` later; a slot is emitted only while it
/// ends at or before closing time. Slots starting before `range.start` are
/// skipped so a search anchored at "now" never offers the past.
///
/// All returned slots are `available` and unscored, in chronological order.
///
/// # Errors
/// Returns `EngineError::InvalidRange` if the range is inverted or the
/// duration is not in `1..=MAX_DURATION_MINUTES`, and `InvalidTimezone` /
/// `InvalidPreferences` for malformed preferences.
pub fn generate_slots(
    range: &DateRange,
    duration_minutes: i64,
    buffer_minutes: u32,
    preferences: &SchedulingPreferences,
) -> Result<Vec<TimeSlot>> {
    range.validate()?;
    check_duration(duration_minutes)?;

    let tz = preferences.tz()?;
    let (open, close) = preferences.working_hours.bounds()?;

    let duration = Duration::minutes(duration_minutes);
    let pitch = duration + Duration::minutes(i64::from(buffer_minutes));

    let first_day = range.start.with_timezone(&tz).date_naive();
    let last_day = range.end.with_timezone(&tz).date_naive();

    let mut slots = Vec::new();
    for day in first_day.iter_days().take_while(|d| *d <= last_day) {
        if !preferences.is_working_day(day.weekday()) {
            continue;
        }

        let (Some(open_at), Some(close_at)) = (
            resolve_local(&tz, day.and_time(open)),
            resolve_local(&tz, day.and_time(close)),
        ) else {
            continue;
        };

        let mut cursor = open_at;
        while let Some(end) = cursor.checked_add_signed(duration) {
            if end > close_at {
                break;
            }
            if cursor >= range.start {
                slots.push(TimeSlot {
                    start: cursor,
                    end,
                    available: true,
                    score: None,
                });
            }
            match cursor.checked_add_signed(pitch) {
                Some(next) => cursor = next,
                None => break,
            }
        }
    }

    debug!(
        days = days_spanned(first_day, last_day),
        generated = slots.len(),
        "generated candidate slots"
    );

    Ok(slots)
}

/// Reject durations that are not positive or longer than a day.
pub(crate) fn check_duration(duration_minutes: i64) -> Result<()> {
    if duration_minutes <= 0 {
        return Err(EngineError::InvalidRange(format!(
            "duration must be positive, got {} minutes",
            duration_minutes
        )));
    }
    if duration_minutes > MAX_DURATION_MINUTES {
        return Err(EngineError::InvalidRange(format!(
            "duration must be at most {} minutes, got {}",
            MAX_DURATION_MINUTES, duration_minutes
        )));
    }
    Ok(())
}

/// Map a wall-clock time in `tz` to a UTC instant.
///
/// Ambiguous times (fall-back) take the earlier instant. Times inside a
/// spring-forward gap move to the first valid minute after the gap.
fn resolve_local(tz: &Tz, local: NaiveDateTime) -> Option<DateTime<Utc>> {
    (0..=MAX_DST_GAP_MINUTES).find_map(|shift| {
        let shifted = local.checked_add_signed(Duration::minutes(shift))?;
        tz.from_local_datetime(&shifted)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
    })
}

fn days_spanned(first: NaiveDate, last: NaiveDate) -> i64 {
    (last - first).num_days() + 1
}

//! Desirability scoring and ranking of available slots.
//!
//! Every slot starts at [`BASE_SCORE`] and collects each applicable adjustment:
//!
//! | Condition (local time of slot start)           | Delta |
//! |------------------------------------------------|-------|
//! | Mon–Fri, hour in `[18, 20)`                    | +30   |
//! | Sunday, hour in `[14, 17)`                     | +25   |
//! | hour before 10 or at/after 20                  | −20   |
//! | each full day between now and the slot         | −2    |
//! | weekday in `preferredDays`                     | +20   |
//! | inside `preferredTimes` on one of its days     | +15   |
//!
//! The total is clamped at zero. Scoring is a pure function of its inputs.

use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};
use chrono_tz::Tz;

use crate::error::Result;
use crate::preferences::{weekday_index, SchedulingPreferences};
use crate::types::TimeSlot;

pub const BASE_SCORE: i64 = 100;

const WEEKDAY_EVENING_BONUS: i64 = 30;
const SUNDAY_AFTERNOON_BONUS: i64 = 25;
const OFF_HOURS_PENALTY: i64 = 20;
const DAILY_DECAY: i64 = 2;
const PREFERRED_DAY_BONUS: i64 = 20;
const PREFERRED_TIME_BONUS: i64 = 15;

/// Score a single slot relative to `now`.
///
/// # Errors
/// Returns `InvalidTimezone` or `InvalidPreferences` if `preferences` are malformed.
pub fn score_slot(slot: &TimeSlot, now: DateTime<Utc>, preferences: &SchedulingPreferences) -> Result<u32> {
    let tz = preferences.tz()?;
    score_in(&tz, slot, now, preferences)
}

/// Score every slot, returning new slots with `score` set. Input order is kept.
pub fn score_slots(
    slots: &[TimeSlot],
    now: DateTime<Utc>,
    preferences: &SchedulingPreferences,
) -> Result<Vec<TimeSlot>> {
    let tz = preferences.tz()?;
    slots
        .iter()
        .map(|slot| -> Result<TimeSlot> {
            Ok(slot.with_score(score_in(&tz, slot, now, preferences)?))
        })
        .collect()
}

/// Score, then order by descending score (earliest start first on ties) and
/// keep at most `limit` slots.
pub fn rank_slots(
    slots: &[TimeSlot],
    now: DateTime<Utc>,
    preferences: &SchedulingPreferences,
    limit: usize,
) -> Result<Vec<TimeSlot>> {
    let mut scored = score_slots(slots, now, preferences)?;
    scored.sort_by(|a, b| b.score.cmp(&a.score).then(a.start.cmp(&b.start)));
    scored.truncate(limit);
    Ok(scored)
}

fn score_in(
    tz: &Tz,
    slot: &TimeSlot,
    now: DateTime<Utc>,
    preferences: &SchedulingPreferences,
) -> Result<u32> {
    let local = slot.start.with_timezone(tz);
    let weekday = local.weekday();
    let hour = local.hour();

    let mut score = BASE_SCORE;

    let is_weekday = !matches!(weekday, Weekday::Sat | Weekday::Sun);
    if is_weekday && (18..20).contains(&hour) {
        score += WEEKDAY_EVENING_BONUS;
    }
    if weekday == Weekday::Sun && (14..17).contains(&hour) {
        score += SUNDAY_AFTERNOON_BONUS;
    }
    if hour < 10 || hour >= 20 {
        score -= OFF_HOURS_PENALTY;
    }

    let days_out = (slot.start - now).num_days().max(0);
    score -= DAILY_DECAY * days_out;

    if preferences.is_preferred_day(weekday) {
        score += PREFERRED_DAY_BONUS;
    }

    if let Some(preferred) = &preferences.preferred_times {
        let (from, until) = preferred.bounds()?;
        let on_day = preferred.days_of_week.is_empty()
            || preferred.days_of_week.contains(&weekday_index(weekday));
        let time = local.time();
        if on_day && from <= time && time < until {
            score += PREFERRED_TIME_BONUS;
        }
    }

    Ok(u32::try_from(score.max(0)).unwrap_or(u32::MAX))
}

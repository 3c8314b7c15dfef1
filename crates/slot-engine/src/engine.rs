//! The public availability API.
//!
//! [`AvailabilityEngine`] composes generation, conflict filtering and scoring
//! around a single busy-time lookup per operation. It holds no mutable state,
//! so one engine can serve any number of concurrent searches.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::{EngineConfig, MAX_SUGGESTIONS};
use crate::conflict::{filter_conflicts, overlaps_busy};
use crate::error::{EngineError, Result};
use crate::generator::{check_duration, generate_slots};
use crate::preferences::SchedulingPreferences;
use crate::scorer::rank_slots;
use crate::source::BusyTimeSource;
use crate::types::{BusyInterval, DateRange, TimeSlot};

/// Result of one calendar in a multi-calendar search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarSlots {
    pub calendar_id: String,
    #[serde(with = "result_as_map")]
    pub slots: Result<Vec<TimeSlot>>,
}

pub struct AvailabilityEngine<S> {
    source: S,
    clock: Arc<dyn Clock>,
    config: EngineConfig,
}

impl<S: BusyTimeSource> AvailabilityEngine<S> {
    /// An engine with default configuration reading the system clock.
    pub fn new(source: S) -> Self {
        Self {
            source,
            clock: Arc::new(SystemClock),
            config: EngineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// All conflict-free slots for `calendar_id` in `range`, chronologically.
    ///
    /// Returned slots are unscored. An empty list means nothing is open and is
    /// not an error. Busy intervals are fetched once, over the range widened
    /// to cover every candidate slot and its buffer.
    ///
    /// # Errors
    /// `InvalidRange` for an inverted range or non-positive duration,
    /// `InvalidTimezone` / `InvalidPreferences` for malformed preferences, and
    /// `CalendarLookup` / `Timeout` when the busy-time lookup fails.
    #[instrument(skip_all, fields(calendar_id = %calendar_id, duration_minutes = duration_minutes))]
    pub async fn find_available_slots(
        &self,
        calendar_id: &str,
        duration_minutes: i64,
        range: DateRange,
        preferences: Option<&SchedulingPreferences>,
    ) -> Result<Vec<TimeSlot>> {
        let preferences = self.preferences(preferences);
        range.validate()?;
        check_duration(duration_minutes)?;
        preferences.validate()?;

        let buffer_minutes = preferences.buffer_minutes;
        let candidates = generate_slots(&range, duration_minutes, buffer_minutes, preferences)?;

        let (fetch_start, fetch_end) = fetch_window(&range, &candidates, buffer_minutes);
        let busy = self.fetch_busy(calendar_id, fetch_start, fetch_end).await?;

        let available = filter_conflicts(candidates, &busy, buffer_minutes);
        debug!(available = available.len(), "found available slots");
        Ok(available)
    }

    /// The best slots from now through the suggestion horizon.
    ///
    /// Slots are ranked by descending score, earliest first on ties, and capped
    /// at `max_suggestions` (10 by default, never more than 10). Each returned
    /// slot keeps its numeric `score`.
    #[instrument(skip_all, fields(calendar_id = %calendar_id, duration_minutes = duration_minutes))]
    pub async fn suggest_optimal_times(
        &self,
        calendar_id: &str,
        duration_minutes: i64,
        preferences: Option<&SchedulingPreferences>,
    ) -> Result<Vec<TimeSlot>> {
        let now = self.clock.now();
        let range = DateRange::days_from(now, self.config.suggestion_horizon_days)?;
        let available = self
            .find_available_slots(calendar_id, duration_minutes, range, preferences)
            .await?;

        rank_slots(
            &available,
            now,
            self.preferences(preferences),
            self.config.max_suggestions.min(MAX_SUGGESTIONS),
        )
    }

    /// Whether a slot of `duration_minutes` at `start` is clear of busy time.
    ///
    /// Queries the source for exactly the buffered window. `buffer_minutes`
    /// defaults to the configured default preferences' buffer.
    #[instrument(skip_all, fields(calendar_id = %calendar_id, start = %start))]
    pub async fn is_slot_available(
        &self,
        calendar_id: &str,
        start: DateTime<Utc>,
        duration_minutes: i64,
        buffer_minutes: Option<u32>,
    ) -> Result<bool> {
        check_duration(duration_minutes)?;
        let buffer_minutes =
            buffer_minutes.unwrap_or(self.config.default_preferences.buffer_minutes);

        let (window_start, window_end) = checked_window(start, duration_minutes, buffer_minutes)?;
        let busy = self.fetch_busy(calendar_id, window_start, window_end).await?;

        Ok(!busy
            .iter()
            .any(|b| overlaps_busy(window_start, window_end, b)))
    }

    /// The earliest open slot within the next-slot horizon, if any.
    #[instrument(skip_all, fields(calendar_id = %calendar_id, duration_minutes = duration_minutes))]
    pub async fn next_available_slot(
        &self,
        calendar_id: &str,
        duration_minutes: i64,
        preferences: Option<&SchedulingPreferences>,
    ) -> Result<Option<TimeSlot>> {
        let range = DateRange::days_from(self.clock.now(), self.config.next_slot_horizon_days)?;
        let available = self
            .find_available_slots(calendar_id, duration_minutes, range, preferences)
            .await?;
        Ok(available.into_iter().next())
    }

    /// Run [`find_available_slots`](Self::find_available_slots) for several
    /// calendars concurrently.
    ///
    /// Each calendar gets its own lookup and its own result; one failing
    /// calendar does not affect the others. Output order follows `calendar_ids`.
    pub async fn find_available_slots_across(
        &self,
        calendar_ids: &[&str],
        duration_minutes: i64,
        range: DateRange,
        preferences: Option<&SchedulingPreferences>,
    ) -> Vec<CalendarSlots> {
        let searches = calendar_ids.iter().map(|&calendar_id| async move {
            CalendarSlots {
                calendar_id: calendar_id.to_string(),
                slots: self
                    .find_available_slots(calendar_id, duration_minutes, range, preferences)
                    .await,
            }
        });
        join_all(searches).await
    }

    fn preferences<'a>(
        &'a self,
        preferences: Option<&'a SchedulingPreferences>,
    ) -> &'a SchedulingPreferences {
        preferences.unwrap_or(&self.config.default_preferences)
    }

    async fn fetch_busy(
        &self,
        calendar_id: &str,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> Result<Vec<BusyInterval>> {
        let lookup = self
            .source
            .busy_intervals(calendar_id, range_start, range_end);

        let outcome = match self.config.fetch_timeout() {
            Some(after) => match tokio::time::timeout(after, lookup).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    warn!(calendar_id, ?after, "busy-time lookup timed out");
                    return Err(EngineError::Timeout {
                        calendar_id: calendar_id.to_string(),
                        after,
                    });
                }
            },
            None => lookup.await,
        };

        match outcome {
            Ok(busy) => {
                debug!(calendar_id, busy = busy.len(), "fetched busy intervals");
                Ok(busy)
            }
            Err(e) => {
                warn!(calendar_id, error = %e, "busy-time lookup failed");
                Err(e.into())
            }
        }
    }
}

/// `[start - buffer, start + duration + buffer]`, or `InvalidRange` when an
/// edge falls outside the representable time line.
fn checked_window(
    start: DateTime<Utc>,
    duration_minutes: i64,
    buffer_minutes: u32,
) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let buffer = Duration::minutes(i64::from(buffer_minutes));
    let window_start = start.checked_sub_signed(buffer);
    let window_end = start
        .checked_add_signed(Duration::minutes(duration_minutes))
        .and_then(|end| end.checked_add_signed(buffer));
    match (window_start, window_end) {
        (Some(ws), Some(we)) => Ok((ws, we)),
        _ => Err(EngineError::InvalidRange(format!(
            "slot at {} with buffer {} minutes is out of range",
            start.to_rfc3339(),
            buffer_minutes
        ))),
    }
}

/// The range widened to cover every candidate's buffered window.
///
/// Slots on the last day may run past `range.end`, so busy time there must be
/// fetched too.
fn fetch_window(
    range: &DateRange,
    candidates: &[TimeSlot],
    buffer_minutes: u32,
) -> (DateTime<Utc>, DateTime<Utc>) {
    let buffer = Duration::minutes(i64::from(buffer_minutes));
    let start = candidates
        .first()
        .and_then(|first| first.start.checked_sub_signed(buffer))
        .map_or(range.start, |edge| range.start.min(edge));
    let end = candidates
        .last()
        .and_then(|last| last.end.checked_add_signed(buffer))
        .map_or(range.end, |edge| range.end.max(edge));
    (start, end)
}

mod result_as_map {
    use serde::ser::{SerializeMap, Serializer};

    use crate::error::Result;
    use crate::types::TimeSlot;

    pub fn serialize<S: Serializer>(
        result: &Result<Vec<TimeSlot>>,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match result {
            Ok(slots) => map.serialize_entry("ok", slots)?,
            Err(e) => map.serialize_entry("error", &e.to_string())?,
        }
        map.end()
    }
}

//! Per-request scheduling preferences.
//!
//! Weekdays are indexed `0 = Sunday .. 6 = Saturday`. Clock times are
//! `"HH:mm"` strings interpreted as wall-clock time in [`SchedulingPreferences::timezone`].
//!
//! Only `working_hours` and `working_days` restrict which slots exist.
//! `preferred_times` and `preferred_days` never filter; they add ranking
//! bonuses in [`crate::scorer`].

use std::collections::BTreeSet;

use chrono::{NaiveTime, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

pub const DEFAULT_WORKING_START: &str = "09:00";
pub const DEFAULT_WORKING_END: &str = "21:00";
pub const DEFAULT_BUFFER_MINUTES: u32 = 15;
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Daily opening and closing time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHours {
    pub start: String,
    pub end: String,
}

impl WorkingHours {
    pub fn new(start: &str, end: &str) -> Self {
        Self {
            start: start.to_string(),
            end: end.to_string(),
        }
    }

    /// Parsed `(open, close)`; `close` must be strictly after `open`.
    pub fn bounds(&self) -> Result<(NaiveTime, NaiveTime)> {
        let open = parse_clock(&self.start)?;
        let close = parse_clock(&self.end)?;
        if close <= open {
            return Err(EngineError::InvalidPreferences(format!(
                "working hours end {} is not after start {}",
                self.end, self.start
            )));
        }
        Ok((open, close))
    }
}

impl Default for WorkingHours {
    fn default() -> Self {
        Self::new(DEFAULT_WORKING_START, DEFAULT_WORKING_END)
    }
}

/// A soft time-of-day preference, optionally limited to some weekdays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferredTimes {
    pub start: String,
    pub end: String,
    /// Empty means every day.
    #[serde(default)]
    pub days_of_week: BTreeSet<u8>,
}

impl PreferredTimes {
    pub fn bounds(&self) -> Result<(NaiveTime, NaiveTime)> {
        Ok((parse_clock(&self.start)?, parse_clock(&self.end)?))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchedulingPreferences {
    pub working_hours: WorkingHours,
    pub working_days: BTreeSet<u8>,
    pub buffer_minutes: u32,
    /// IANA timezone identifier, e.g. "America/New_York".
    pub timezone: String,
    pub preferred_times: Option<PreferredTimes>,
    pub preferred_days: Option<BTreeSet<u8>>,
}

impl Default for SchedulingPreferences {
    fn default() -> Self {
        Self {
            working_hours: WorkingHours::default(),
            working_days: (0..=6).collect(),
            buffer_minutes: DEFAULT_BUFFER_MINUTES,
            timezone: DEFAULT_TIMEZONE.to_string(),
            preferred_times: None,
            preferred_days: None,
        }
    }
}

impl SchedulingPreferences {
    pub fn with_working_hours(mut self, start: &str, end: &str) -> Self {
        self.working_hours = WorkingHours::new(start, end);
        self
    }

    pub fn with_working_days(mut self, days: impl IntoIterator<Item = u8>) -> Self {
        self.working_days = days.into_iter().collect();
        self
    }

    pub fn with_buffer(mut self, minutes: u32) -> Self {
        self.buffer_minutes = minutes;
        self
    }

    pub fn with_timezone(mut self, timezone: &str) -> Self {
        self.timezone = timezone.to_string();
        self
    }

    pub fn with_preferred_days(mut self, days: impl IntoIterator<Item = u8>) -> Self {
        self.preferred_days = Some(days.into_iter().collect());
        self
    }

    pub fn with_preferred_times(mut self, preferred: PreferredTimes) -> Self {
        self.preferred_times = Some(preferred);
        self
    }

    /// Parse the configured timezone.
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse()
            .map_err(|_| EngineError::InvalidTimezone(self.timezone.clone()))
    }

    pub fn is_working_day(&self, weekday: Weekday) -> bool {
        self.working_days.contains(&weekday_index(weekday))
    }

    pub fn is_preferred_day(&self, weekday: Weekday) -> bool {
        self.preferred_days
            .as_ref()
            .is_some_and(|days| days.contains(&weekday_index(weekday)))
    }

    /// Check every field that can be malformed.
    pub fn validate(&self) -> Result<()> {
        self.tz()?;
        self.working_hours.bounds()?;
        check_weekdays("workingDays", &self.working_days)?;
        if let Some(days) = &self.preferred_days {
            check_weekdays("preferredDays", days)?;
        }
        if let Some(preferred) = &self.preferred_times {
            preferred.bounds()?;
            check_weekdays("preferredTimes.daysOfWeek", &preferred.days_of_week)?;
        }
        Ok(())
    }
}

/// Weekday index with Sunday as 0.
pub fn weekday_index(weekday: Weekday) -> u8 {
    weekday.num_days_from_sunday() as u8
}

fn parse_clock(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .map_err(|_| EngineError::InvalidPreferences(format!("expected HH:mm, got '{}'", s)))
}

fn check_weekdays(field: &str, days: &BTreeSet<u8>) -> Result<()> {
    match days.iter().find(|&&d| d > 6) {
        Some(bad) => Err(EngineError::InvalidPreferences(format!(
            "{} contains weekday index {} (expected 0-6)",
            field, bad
        ))),
        None => Ok(()),
    }
}

//! Core value types shared by every stage of the slot pipeline.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// A candidate appointment window of exactly the requested duration.
///
/// The buffer is never part of the slot's own span. `score` is only filled in
/// by the scorer; slots coming out of the generator and the conflict filter
/// carry `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
}

impl TimeSlot {
    /// An available, unscored slot of `duration_minutes` starting at `start`.
    pub fn new(start: DateTime<Utc>, duration_minutes: i64) -> Self {
        Self {
            start,
            end: start + Duration::minutes(duration_minutes),
            available: true,
            score: None,
        }
    }

    /// A copy of this slot carrying `score`.
    pub fn with_score(&self, score: u32) -> Self {
        Self {
            score: Some(score),
            ..self.clone()
        }
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// Inclusive search window supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    /// Build a range, rejecting `start > end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        let range = Self { start, end };
        range.validate()?;
        Ok(range)
    }

    /// A range of `days` whole days starting at `start`.
    ///
    /// # Errors
    /// `InvalidRange` when `days` is negative or the end is not representable.
    pub fn days_from(start: DateTime<Utc>, days: i64) -> Result<Self> {
        let end = Duration::try_days(days)
            .and_then(|span| start.checked_add_signed(span))
            .ok_or_else(|| {
                EngineError::InvalidRange(format!(
                    "{} days after {} is out of range",
                    days,
                    start.to_rfc3339()
                ))
            })?;
        Self::new(start, end)
    }

    pub fn validate(&self) -> Result<()> {
        if self.start > self.end {
            return Err(EngineError::InvalidRange(format!(
                "range start {} is after end {}",
                self.start.to_rfc3339(),
                self.end.to_rfc3339()
            )));
        }
        Ok(())
    }
}

/// A committed period on a calendar, treated as closed-open `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BusyInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl BusyInterval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// True when the interval covers no time at all.
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Whether `instant` lies in `[start, end)`.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    /// Whether any part of this interval falls in `[range_start, range_end)`.
    pub fn intersects(&self, range_start: DateTime<Utc>, range_end: DateTime<Utc>) -> bool {
        self.start < range_end && range_start < self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn days_from_spans_whole_days() {
        let start = Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap();
        let range = DateRange::days_from(start, 14).unwrap();
        assert_eq!(range.end, Utc.with_ymd_and_hms(2026, 3, 16, 8, 0, 0).unwrap());
    }

    #[test]
    fn days_from_rejects_unrepresentable_horizons() {
        let start = Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap();
        assert!(matches!(
            DateRange::days_from(start, 9_000_000_000_000_000),
            Err(EngineError::InvalidRange(_))
        ));
        assert!(DateRange::days_from(start, -1).is_err());
    }
}

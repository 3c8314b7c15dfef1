//! Error types for slot-engine operations.

use std::time::Duration;

use thiserror::Error;

/// Failure reported by a [`BusyTimeSource`](crate::source::BusyTimeSource).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarLookupError {
    #[error("Calendar not found: {0}")]
    NotFound(String),

    #[error("Not authorized to read calendar: {0}")]
    Unauthorized(String),

    #[error("Calendar service unreachable: {0}")]
    Unreachable(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Passed through from the busy-time source unchanged.
    #[error(transparent)]
    CalendarLookup(#[from] CalendarLookupError),

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid preferences: {0}")]
    InvalidPreferences(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Busy-time lookup for calendar '{calendar_id}' timed out after {after:?}")]
    Timeout { calendar_id: String, after: Duration },
}

pub type Result<T> = std::result::Result<T, EngineError>;

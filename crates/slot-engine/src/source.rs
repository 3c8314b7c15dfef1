//! The busy-time port the engine reads calendars through.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::CalendarLookupError;
use crate::types::BusyInterval;

/// Supplies the busy intervals of a calendar over a time range.
///
/// Implementations talk to an external calendar service. Retries and caching,
/// if any, belong here rather than in the engine.
#[async_trait]
pub trait BusyTimeSource: Send + Sync {
    /// Busy intervals on `calendar_id` intersecting `[range_start, range_end)`.
    ///
    /// The result may be unsorted and may contain overlapping intervals.
    async fn busy_intervals(
        &self,
        calendar_id: &str,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> Result<Vec<BusyInterval>, CalendarLookupError>;
}

#[async_trait]
impl<T: BusyTimeSource + ?Sized> BusyTimeSource for Arc<T> {
    async fn busy_intervals(
        &self,
        calendar_id: &str,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> Result<Vec<BusyInterval>, CalendarLookupError> {
        (**self)
            .busy_intervals(calendar_id, range_start, range_end)
            .await
    }
}

/// In-memory busy-time source keyed by calendar id.
#[derive(Debug, Clone, Default)]
pub struct StaticBusySource {
    calendars: HashMap<String, Vec<BusyInterval>>,
}

impl StaticBusySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `calendar_id` with its busy intervals, replacing any previous entry.
    pub fn with_calendar(
        mut self,
        calendar_id: impl Into<String>,
        busy: impl IntoIterator<Item = BusyInterval>,
    ) -> Self {
        self.calendars
            .insert(calendar_id.into(), busy.into_iter().collect());
        self
    }

    pub fn calendar_ids(&self) -> impl Iterator<Item = &str> {
        self.calendars.keys().map(String::as_str)
    }
}

impl From<HashMap<String, Vec<BusyInterval>>> for StaticBusySource {
    fn from(calendars: HashMap<String, Vec<BusyInterval>>) -> Self {
        Self { calendars }
    }
}

#[async_trait]
impl BusyTimeSource for StaticBusySource {
    async fn busy_intervals(
        &self,
        calendar_id: &str,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> Result<Vec<BusyInterval>, CalendarLookupError> {
        let busy = self
            .calendars
            .get(calendar_id)
            .ok_or_else(|| CalendarLookupError::NotFound(calendar_id.to_string()))?;

        Ok(busy
            .iter()
            .filter(|b| b.intersects(range_start, range_end))
            .copied()
            .collect())
    }
}

//! Engine-wide configuration.
//!
//! Loaded once and handed to [`AvailabilityEngine`](crate::engine::AvailabilityEngine).
//! `default_preferences` applies only when a caller omits preferences for a
//! request; it is never mutated by the engine.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::preferences::SchedulingPreferences;

pub const DEFAULT_SUGGESTION_HORIZON_DAYS: i64 = 14;
pub const DEFAULT_MAX_SUGGESTIONS: usize = 10;
pub const DEFAULT_NEXT_SLOT_HORIZON_DAYS: i64 = 30;

/// Hard cap on `max_suggestions`; a suggestion list never exceeds this.
pub const MAX_SUGGESTIONS: usize = 10;
/// Longest accepted search horizon, in days.
pub const MAX_HORIZON_DAYS: i64 = 366;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub default_preferences: SchedulingPreferences,
    /// Days searched after "now" by `suggest_optimal_times`.
    pub suggestion_horizon_days: i64,
    /// Length of a suggestion list, `1..=MAX_SUGGESTIONS`.
    pub max_suggestions: usize,
    /// Days searched after "now" by `next_available_slot`.
    pub next_slot_horizon_days: i64,
    /// Upper bound on each busy-time lookup. `None` waits indefinitely.
    pub fetch_timeout_secs: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_preferences: SchedulingPreferences::default(),
            suggestion_horizon_days: DEFAULT_SUGGESTION_HORIZON_DAYS,
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
            next_slot_horizon_days: DEFAULT_NEXT_SLOT_HORIZON_DAYS,
            fetch_timeout_secs: None,
        }
    }
}

impl EngineConfig {
    /// Parse a JSON config; absent fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| EngineError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_default_preferences(mut self, preferences: SchedulingPreferences) -> Self {
        self.default_preferences = preferences;
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout_secs = Some(timeout.as_secs());
        self
    }

    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout_secs.map(Duration::from_secs)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, days) in [
            ("suggestion_horizon_days", self.suggestion_horizon_days),
            ("next_slot_horizon_days", self.next_slot_horizon_days),
        ] {
            if !(0..=MAX_HORIZON_DAYS).contains(&days) {
                return Err(EngineError::InvalidConfig(format!(
                    "{} must be between 0 and {}, got {}",
                    name, MAX_HORIZON_DAYS, days
                )));
            }
        }
        if !(1..=MAX_SUGGESTIONS).contains(&self.max_suggestions) {
            return Err(EngineError::InvalidConfig(format!(
                "max_suggestions must be between 1 and {}, got {}",
                MAX_SUGGESTIONS, self.max_suggestions
            )));
        }
        if self.fetch_timeout_secs == Some(0) {
            return Err(EngineError::InvalidConfig(
                "fetch_timeout_secs must be at least 1".to_string(),
            ));
        }
        self.default_preferences.validate()
    }
}

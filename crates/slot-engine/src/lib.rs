//! # slot-engine
//!
//! Availability search for appointments with a leader whose commitments live in
//! an external calendar.
//!
//! Given a calendar's busy intervals, a requested duration, a search window
//! and scheduling preferences, the engine produces conflict-free candidate
//! slots, ranks them, and can check or locate a single slot on demand.
//!
//! Data flows one way: date range + preferences → generated candidates →
//! busy-filtered candidates → scored and ranked results.
//!
//! ## Modules
//!
//! - [`generator`]: business-hour rules → candidate slots
//! - [`conflict`]: drop candidates whose buffered window hits busy time
//! - [`busy`]: merge raw busy intervals into a sorted, disjoint list
//! - [`scorer`]: desirability scores and ranking
//! - [`engine`]: [`AvailabilityEngine`], the public operations
//! - [`source`]: the [`BusyTimeSource`] port and an in-memory implementation
//! - [`preferences`], [`config`], [`clock`], [`types`], [`error`]

pub mod busy;
pub mod clock;
pub mod config;
pub mod conflict;
pub mod engine;
pub mod error;
pub mod generator;
pub mod preferences;
pub mod scorer;
pub mod source;
pub mod types;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::EngineConfig;
pub use conflict::filter_conflicts;
pub use engine::{AvailabilityEngine, CalendarSlots};
pub use error::{CalendarLookupError, EngineError};
pub use generator::generate_slots;
pub use preferences::{PreferredTimes, SchedulingPreferences, WorkingHours};
pub use scorer::{rank_slots, score_slot};
pub use source::{BusyTimeSource, StaticBusySource};
pub use types::{BusyInterval, DateRange, TimeSlot};

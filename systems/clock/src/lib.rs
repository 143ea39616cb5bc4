#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Calendar-day keys for the daily round.
//!
//! Every player shares the same day boundary: keys are derived from UTC wall
//! time and roll over at 00:00 UTC regardless of the host time zone.

use chrono::{DateTime, Utc};
use dodle_core::DateKey;

/// Source of the calendar day a session belongs to.
pub trait Clock {
    /// Returns the key of the current calendar day.
    fn today(&self) -> DateKey;
}

/// Clock backed by the system wall clock, pinned to UTC.
#[derive(Clone, Copy, Debug, Default)]
pub struct UtcClock;

impl Clock for UtcClock {
    fn today(&self) -> DateKey {
        date_key_at(Utc::now())
    }
}

/// Clock that always reports the same day.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedClock {
    today: DateKey,
}

impl FixedClock {
    /// Creates a clock frozen on the provided day.
    #[must_use]
    pub const fn new(today: DateKey) -> Self {
        Self { today }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> DateKey {
        self.today
    }
}

/// Converts an instant into the key of the UTC calendar day containing it.
#[must_use]
pub fn date_key_at(instant: DateTime<Utc>) -> DateKey {
    DateKey::from_date(instant.date_naive())
}

//! Clock port used to time pipeline stages.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// Provides the current wall-clock time.
///
/// Stage durations are computed from two readings of this clock, so a
/// recorded or fixed clock makes reported timings reproducible.
pub trait Clock: Send + Sync {
    /// Returns the current UTC time.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time between two readings, clamped to zero if the clock went backwards.
#[must_use]
pub fn elapsed(start: DateTime<Utc>, end: DateTime<Utc>) -> Duration {
    (end - start).to_std().unwrap_or_default()
}

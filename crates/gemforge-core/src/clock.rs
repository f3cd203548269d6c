//! Time sources for the accrual engine.
//!
//! Production and offline catch-up both reason about wall-clock-comparable
//! instants: a [`Timestamp`] taken in one process run must be meaningfully
//! subtractable from a timestamp taken in a later run. Seconds since the
//! UNIX epoch satisfy that; a monotonic clock would not survive a restart.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Elapsed durations, in seconds. May be fractional.
pub type Seconds = f64;

/// An instant in wall-clock time, in seconds since the UNIX epoch.
///
/// Comparable across process runs, which is what lets the reconciler
/// compute how long the process was closed.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Timestamp(f64);

impl Timestamp {
    /// Construct from raw seconds since the UNIX epoch.
    pub fn from_seconds(seconds: f64) -> Self {
        Self(seconds)
    }

    /// Raw seconds since the UNIX epoch.
    pub fn as_seconds(self) -> f64 {
        self.0
    }

    /// Seconds elapsed since `earlier`. Negative when the wall clock went
    /// backwards between the two readings; callers clamp before accruing.
    pub fn elapsed_since(self, earlier: Timestamp) -> Seconds {
        self.0 - earlier.0
    }
}

/// Supplies the current wall-clock time. The core never reads a clock
/// directly; it is handed one at assembly so tests can drive time manually.
pub trait Clock {
    /// The current instant.
    fn now(&self) -> Timestamp;
}

/// The production clock, backed by [`SystemTime`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        // A system clock set before 1970 reads as the epoch itself.
        let seconds = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0);
        Timestamp::from_seconds(seconds)
    }
}

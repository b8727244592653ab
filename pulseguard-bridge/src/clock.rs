//! Wall-clock source for log rows
//!
//! Device timestamps drive the filter; the host clock is only used to stamp
//! CSV rows and name the log file. Abstracted so tests get stable output.

use chrono::{Duration, Local, NaiveDateTime};

/// Provides host wall-clock time
pub trait Clock {
    /// Current local time
    fn now(&self) -> NaiveDateTime;
}

/// Host local time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Manually advanced clock for tests and replays
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    time: NaiveDateTime,
}

impl FixedClock {
    /// Clock stopped at `time`
    pub fn new(time: NaiveDateTime) -> Self {
        Self { time }
    }

    /// Move forward by `ms` milliseconds
    pub fn advance_ms(&mut self, ms: i64) {
        self.time += Duration::milliseconds(ms);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.time
    }
}

/// ISO-8601 local time with millisecond precision, no offset
pub fn format_iso_ms(time: &NaiveDateTime) -> String {
    time.format("%Y-%m-%dT%H:%M:%S%.3f").to_string()
}

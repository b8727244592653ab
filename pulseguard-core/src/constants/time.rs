//! Time-Related Constants

/// Milliseconds per second.
pub const MS_PER_SECOND: i64 = 1000;

/// [`MS_PER_SECOND`] as a float, for converting elapsed time to seconds.
pub const MS_PER_SECOND_F: f64 = MS_PER_SECOND as f64;

/// Nominal device reporting interval (milliseconds).
///
/// The sensor firmware emits one telemetry record per second.
pub const NOMINAL_REPORT_INTERVAL_MS: i64 = 1000;

//! Physiological Limits
//!
//! Bounds used to sanitize raw device readings before they reach the
//! filter. The device reports integer BPM; anything outside this window
//! is a sensing artifact rather than a heart rate.

// ===== HEART RATE =====

/// Lowest heart rate the filter will accept or report (BPM).
///
/// Deep bradycardia in trained athletes at rest sits around 30-40 BPM.
/// Lower readings come from lost contact or a missed beat detection.
pub const BPM_MIN: i32 = 30;

/// Highest heart rate the filter will accept or report (BPM).
///
/// Roughly the age-predicted maximum of a young adult during peak effort.
pub const BPM_MAX: i32 = 220;

/// [`BPM_MIN`] as a float, for clamping the running estimate.
pub const BPM_MIN_F: f64 = BPM_MIN as f64;

/// [`BPM_MAX`] as a float, for clamping the running estimate.
pub const BPM_MAX_F: f64 = BPM_MAX as f64;

// ===== SIGNAL QUALITY =====

/// Lowest signal quality score (no usable pulse).
pub const QUALITY_MIN: f64 = 0.0;

/// Highest signal quality score (clean, high-amplitude pulse).
pub const QUALITY_MAX: f64 = 1.0;

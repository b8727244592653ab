//! Input sanitation and the quality-dependent envelope
//!
//! Pure functions of `(quality, stable)` that the filter combines on every
//! update. Kept separate so each threshold can be tested on its own.
//!
//! ```text
//! quality   max_rate (stable)   max_rate (unstable)   alpha (stable)   jump_limit
//!   0.0          6.0                  6.0                 0.080            8
//!   0.5         11.0                  8.5                 0.355           15
//!   1.0         16.0                 11.0                 0.630           25
//! ```

use crate::constants::{
    filter::{
        ALPHA_MIN, ALPHA_QUALITY_GAIN, BASE_RATE_BPM_PER_S, HIGH_QUALITY_THRESHOLD,
        JUMP_LIMIT_HIGH_QUALITY_BPM, JUMP_LIMIT_LOW_QUALITY_BPM, JUMP_LIMIT_MEDIUM_QUALITY_BPM,
        MEDIUM_QUALITY_THRESHOLD, QUALITY_RATE_BONUS_BPM_PER_S, UNSTABLE_ALPHA_FACTOR,
        UNSTABLE_RATE_FACTOR,
    },
    physiology::{BPM_MAX, BPM_MAX_F, BPM_MIN, BPM_MIN_F, QUALITY_MAX, QUALITY_MIN},
};

/// Clamp a raw device reading to the physiological window
pub fn sanitize_bpm(bpm_raw: i32) -> i32 {
    bpm_raw.clamp(BPM_MIN, BPM_MAX)
}

/// Clamp quality to [0, 1]; non-finite quality counts as no signal
pub fn sanitize_quality(quality: f64) -> f64 {
    if quality.is_nan() {
        return QUALITY_MIN;
    }
    quality.clamp(QUALITY_MIN, QUALITY_MAX)
}

/// Clamp the running estimate to the physiological window
pub fn clamp_estimate(estimate: f64) -> f64 {
    estimate.clamp(BPM_MIN_F, BPM_MAX_F)
}

/// Maximum permitted rate of change in BPM per second
///
/// Higher quality widens the envelope; instability halves the quality bonus.
pub fn max_rate(quality: f64, stable: bool) -> f64 {
    let stability = if stable { 1.0 } else { UNSTABLE_RATE_FACTOR };
    BASE_RATE_BPM_PER_S + QUALITY_RATE_BONUS_BPM_PER_S * quality * stability
}

/// Jump size beyond which a reading is a moderate outlier
///
/// Three times this is the extreme-spike threshold.
pub fn jump_limit(quality: f64) -> f64 {
    if quality > HIGH_QUALITY_THRESHOLD {
        JUMP_LIMIT_HIGH_QUALITY_BPM
    } else if quality > MEDIUM_QUALITY_THRESHOLD {
        JUMP_LIMIT_MEDIUM_QUALITY_BPM
    } else {
        JUMP_LIMIT_LOW_QUALITY_BPM
    }
}

/// Exponential smoothing factor
pub fn smoothing_alpha(quality: f64, stable: bool) -> f64 {
    let alpha = ALPHA_MIN + ALPHA_QUALITY_GAIN * quality;
    if stable {
        alpha
    } else {
        alpha * UNSTABLE_ALPHA_FACTOR
    }
}

/// Round an estimate to the nearest whole BPM, ties to even
pub fn round_bpm(estimate: f64) -> i32 {
    // rint honours the default rounding mode: nearest, ties to even
    libm::rint(estimate) as i32
}

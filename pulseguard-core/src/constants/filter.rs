//! Correction Filter Tuning
//!
//! Hand-tuned thresholds of the adaptive correction filter. They interact:
//! the smoothing factor decides where the estimate wants to go, the rate
//! envelope decides how far it may go this tick, and the jump limits decide
//! whether the reading is trusted at all.

// ===== RATE ENVELOPE =====

/// Floor of the permitted rate of change (BPM per second).
///
/// Applies regardless of quality, so even a poor signal can follow a real
/// change slowly.
pub const BASE_RATE_BPM_PER_S: f64 = 6.0;

/// Extra permitted rate at full quality (BPM per second).
///
/// `max_rate = BASE + BONUS * q`, giving 6..16 BPM/s for a stable signal.
pub const QUALITY_RATE_BONUS_BPM_PER_S: f64 = 10.0;

/// Multiplier on the quality bonus while the device reports instability.
pub const UNSTABLE_RATE_FACTOR: f64 = 0.5;

// ===== SMOOTHING =====

/// Smoothing factor at zero quality (heaviest smoothing).
pub const ALPHA_MIN: f64 = 0.08;

/// Smoothing factor gain per unit of quality.
///
/// `alpha = ALPHA_MIN + GAIN * q`, so 0.08..0.63.
pub const ALPHA_QUALITY_GAIN: f64 = 0.55;

/// Multiplier on the smoothing factor while unstable.
pub const UNSTABLE_ALPHA_FACTOR: f64 = 0.6;

// ===== OUTLIER REJECTION =====

/// Quality above which a reading counts as high quality.
pub const HIGH_QUALITY_THRESHOLD: f64 = 0.6;

/// Quality above which a reading counts as medium quality.
pub const MEDIUM_QUALITY_THRESHOLD: f64 = 0.3;

/// Jump limit for high-quality readings (BPM).
pub const JUMP_LIMIT_HIGH_QUALITY_BPM: f64 = 25.0;

/// Jump limit for medium-quality readings (BPM).
pub const JUMP_LIMIT_MEDIUM_QUALITY_BPM: f64 = 15.0;

/// Jump limit for low-quality readings (BPM).
pub const JUMP_LIMIT_LOW_QUALITY_BPM: f64 = 8.0;

/// A jump beyond `SPIKE_FACTOR * jump_limit` is discarded outright.
pub const SPIKE_FACTOR: f64 = 3.0;

/// Fraction of the step envelope a moderate outlier may use.
pub const MODERATE_OUTLIER_STEP_FACTOR: f64 = 0.5;

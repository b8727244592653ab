//! Constants for PulseGuard Core
//!
//! Every threshold the correction filter uses is a fixed, hand-tuned value
//! defined here. Nothing is learned or fitted at runtime.
//!
//! ## Organization
//!
//! - **Physiology**: plausible heart-rate and quality ranges
//! - **Filter**: smoothing, rate-limit and outlier thresholds
//! - **Time**: unit conversions
//!
//! Names carry their units (`_BPM`, `_BPM_PER_S`, `_MS`).

/// Physiological limits for heart-rate readings.
pub mod physiology;

/// Tuning of the adaptive correction filter.
pub mod filter;

/// Time unit conversions.
pub mod time;

pub use physiology::{BPM_MIN, BPM_MAX, QUALITY_MIN, QUALITY_MAX};

pub use filter::{
    BASE_RATE_BPM_PER_S, QUALITY_RATE_BONUS_BPM_PER_S, UNSTABLE_RATE_FACTOR,
    ALPHA_MIN, ALPHA_QUALITY_GAIN, UNSTABLE_ALPHA_FACTOR,
    SPIKE_FACTOR, MODERATE_OUTLIER_STEP_FACTOR,
};

pub use time::MS_PER_SECOND;

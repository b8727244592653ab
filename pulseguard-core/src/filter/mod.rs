//! Adaptive BPM Correction Filter
//!
//! ## Overview
//!
//! A label-free online estimator for one heart-rate stream. It needs no
//! ground truth and no training: every reading is judged only against the
//! current estimate, the reported signal quality and the time elapsed since
//! the last accepted reading.
//!
//! ## Per-Update Pipeline
//!
//! ```text
//! raw, q, stable
//!      │
//!      ▼
//! ┌──────────────┐  clamp bpm to [30, 220], q to [0, 1]
//! │   Sanitize   │
//! └──────┬───────┘
//!        ▼
//! ┌──────────────┐  first reading → estimate = raw
//! │  Initialize  │
//! └──────┬───────┘
//!        ▼
//! ┌──────────────┐  dt <= 0 → return estimate unchanged
//! │  Time guard  │
//! └──────┬───────┘
//!        ▼
//! ┌──────────────┐  |raw - est| > 3 × jump_limit → keep estimate,
//! │ Spike reject │  advance last timestamp
//! └──────┬───────┘
//!        ▼
//! ┌──────────────┐  delta = alpha × (raw - est)
//! │   Smooth     │
//! └──────┬───────┘
//!        ▼
//! ┌──────────────┐  |delta| <= max_rate × dt_s
//! │  Rate limit  │  moderate outlier → |delta| <= 0.5 × max_rate × dt_s
//! └──────┬───────┘
//!        ▼
//!   estimate += delta, clamp to [30, 220]
//! ```
//!
//! Rejected readings never move the estimate, so repeating them any number
//! of times causes no drift. A spike still consumes its timestamp: packets
//! older than it are stale.
//!
//! ## Example
//!
//! ```rust
//! use pulseguard_core::AdaptiveBpmFilter;
//!
//! let mut filter = AdaptiveBpmFilter::new();
//!
//! assert_eq!(filter.update(0, 80, 0.9, true), 80);
//! // alpha = 0.575, target = 91.5, well inside the 15 BPM/s envelope
//! assert_eq!(filter.update(1000, 100, 0.9, true), 92);
//! // 200 BPM from 91.5 is a glitch at this quality
//! assert_eq!(filter.update(2000, 200, 0.9, true), 92);
//! ```

pub mod envelope;

use crate::{
    constants::filter::{MODERATE_OUTLIER_STEP_FACTOR, SPIKE_FACTOR},
    time::{self, Timestamp},
    traits::Corrector,
};

#[cfg(feature = "log")]
macro_rules! log_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

/// What the filter did with a reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome {
    /// First reading of the stream, taken as-is
    Initialized,
    /// Reading moved the estimate
    Accepted {
        /// The jump exceeded the quality's jump limit, so the step was halved
        moderate_outlier: bool,
    },
    /// Timestamp did not advance; duplicate or out-of-order packet
    StaleTimestamp,
    /// Jump too large to be physiological
    SpikeRejected,
}

impl Outcome {
    /// Whether the reading was discarded without touching the estimate
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::StaleTimestamp | Self::SpikeRejected)
    }
}

/// Result of a single filter update
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Correction {
    /// Corrected BPM, rounded half-to-even
    pub bpm: i32,
    /// Unrounded estimate after the update
    pub estimate: f64,
    /// How the reading was handled
    pub outcome: Outcome,
}

impl Correction {
    fn new(estimate: f64, outcome: Outcome) -> Self {
        Self {
            bpm: envelope::round_bpm(estimate),
            estimate,
            outcome,
        }
    }
}

/// Counters over the lifetime of a filter
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FilterStats {
    /// Total calls to `update`
    pub updates: u64,
    /// Readings that initialized or moved the estimate
    pub accepted: u64,
    /// Readings dropped for a non-advancing timestamp
    pub stale_rejections: u64,
    /// Readings dropped as extreme spikes
    pub spike_rejections: u64,
    /// Accepted readings whose step was halved
    pub moderate_outliers: u64,
}

#[derive(Debug, Clone, Copy)]
struct Tracking {
    estimate: f64,
    last_timestamp_ms: Timestamp,
}

/// Quality-weighted, rate-limited heart-rate corrector for one stream
///
/// Not shareable between streams: construct one per device and feed it
/// from a single caller.
#[derive(Debug, Clone, Default)]
pub struct AdaptiveBpmFilter {
    /// `None` until the first reading arrives
    state: Option<Tracking>,
    stats: FilterStats,
}

impl AdaptiveBpmFilter {
    /// Create an uninitialized filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the estimate and counters; the next reading initializes
    pub fn reset(&mut self) {
        self.state = None;
        self.stats = FilterStats::default();
    }

    /// Whether a first reading has been accepted
    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    /// Current unrounded estimate, if initialized
    pub fn estimate(&self) -> Option<f64> {
        self.state.map(|s| s.estimate)
    }

    /// Timestamp of the last accepted reading, if initialized
    pub fn last_timestamp_ms(&self) -> Option<Timestamp> {
        self.state.map(|s| s.last_timestamp_ms)
    }

    /// Lifetime counters
    pub fn stats(&self) -> &FilterStats {
        &self.stats
    }

    /// Feed one reading and return the rounded corrected BPM
    pub fn update(&mut self, t_ms: Timestamp, bpm_raw: i32, quality: f64, stable: bool) -> i32 {
        self.update_detailed(t_ms, bpm_raw, quality, stable).bpm
    }

    /// Feed one reading and report how it was handled
    pub fn update_detailed(
        &mut self,
        t_ms: Timestamp,
        bpm_raw: i32,
        quality: f64,
        stable: bool,
    ) -> Correction {
        let bpm_raw = envelope::sanitize_bpm(bpm_raw);
        let quality = envelope::sanitize_quality(quality);
        self.stats.updates += 1;

        let Some(current) = self.state else {
            let estimate = f64::from(bpm_raw);
            self.state = Some(Tracking { estimate, last_timestamp_ms: t_ms });
            self.stats.accepted += 1;
            return Correction::new(estimate, Outcome::Initialized);
        };

        let dt_ms = time::delta_ms(current.last_timestamp_ms, t_ms);
        if dt_ms <= 0 {
            self.stats.stale_rejections += 1;
            log_debug!("stale reading t={} (last {})", t_ms, current.last_timestamp_ms);
            return Correction::new(current.estimate, Outcome::StaleTimestamp);
        }

        let max_step = envelope::max_rate(quality, stable) * time::ms_to_seconds(dt_ms);

        let jump = f64::from(bpm_raw) - current.estimate;
        let abs_jump = libm::fabs(jump);
        let jump_limit = envelope::jump_limit(quality);

        if abs_jump > SPIKE_FACTOR * jump_limit {
            self.state = Some(Tracking { last_timestamp_ms: t_ms, ..current });
            self.stats.spike_rejections += 1;
            log_debug!(
                "spike rejected: raw={} est={:.1} limit={}",
                bpm_raw, current.estimate, SPIKE_FACTOR * jump_limit
            );
            return Correction::new(current.estimate, Outcome::SpikeRejected);
        }

        let alpha = envelope::smoothing_alpha(quality, stable);
        let target = current.estimate + alpha * jump;

        let mut delta = (target - current.estimate).clamp(-max_step, max_step);

        let moderate_outlier = abs_jump > jump_limit;
        if moderate_outlier {
            let cap = MODERATE_OUTLIER_STEP_FACTOR * max_step;
            delta = delta.clamp(-cap, cap);
            self.stats.moderate_outliers += 1;
        }

        let estimate = envelope::clamp_estimate(current.estimate + delta);
        self.state = Some(Tracking { estimate, last_timestamp_ms: t_ms });
        self.stats.accepted += 1;

        Correction::new(estimate, Outcome::Accepted { moderate_outlier })
    }
}

impl Corrector for AdaptiveBpmFilter {
    fn correct(&mut self, t_ms: Timestamp, bpm_raw: i32, quality: f64, stable: bool) -> Correction {
        self.update_detailed(t_ms, bpm_raw, quality, stable)
    }

    fn reset(&mut self) {
        AdaptiveBpmFilter::reset(self);
    }

    fn estimate(&self) -> Option<f64> {
        AdaptiveBpmFilter::estimate(self)
    }
}

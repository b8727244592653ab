//! Core traits
//!
//! The bridge drives a [`Corrector`] without knowing which estimator sits
//! behind it. Keep it small - one stream, one caller.

use crate::filter::Correction;
use crate::time::Timestamp;

/// Online corrector for a single heart-rate stream
pub trait Corrector {
    /// Feed one reading; inputs are sanitized by the implementation
    fn correct(&mut self, t_ms: Timestamp, bpm_raw: i32, quality: f64, stable: bool) -> Correction;

    /// Return to the uninitialized state
    fn reset(&mut self);

    /// Current unrounded estimate, `None` before the first reading
    fn estimate(&self) -> Option<f64>;
}

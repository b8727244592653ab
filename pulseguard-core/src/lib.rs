//! Core correction engine for PulseGuard
//!
//! Turns a noisy heart-rate telemetry stream into a smoothed, spike-free
//! estimate that never changes faster than a heart plausibly can.
//! No I/O lives here; the bridge crate owns sockets and log files.
//!
//! Key constraints:
//! - One filter per stream, single caller
//! - No heap allocation
//! - Never fails on bad input: values are sanitized, not rejected
//!
//! ```
//! use pulseguard_core::{AdaptiveBpmFilter, TelemetryRecord};
//!
//! let mut filter = AdaptiveBpmFilter::new();
//!
//! let record = TelemetryRecord::parse("1000,72,0.850,1,0")?;
//! let bpm = filter.update(record.t_ms, record.bpm_raw, record.quality, record.stable);
//! assert_eq!(bpm, 72);
//! # Ok::<(), pulseguard_core::TelemetryError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod constants;
pub mod errors;
pub mod filter;
pub mod telemetry;
pub mod time;
pub mod traits;

// Public API
pub use errors::{TelemetryError, TelemetryResult};
pub use filter::{AdaptiveBpmFilter, Correction, FilterStats, Outcome};
pub use telemetry::{encode_correction, AlarmType, OutputFormat, TelemetryRecord};
pub use time::Timestamp;
pub use traits::Corrector;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Error Types for Telemetry Decoding
//!
//! ## Design Philosophy
//!
//! The correction filter itself never fails: out-of-range inputs are
//! sanitized, stale timestamps and spikes are silent no-op paths. The only
//! fallible step in the core is turning a device datagram into a
//! [`TelemetryRecord`](crate::telemetry::TelemetryRecord).
//!
//! Errors follow the same rules as the rest of the crate:
//!
//! 1. **No Heap Allocation**: payloads are integers and `&'static str`.
//! 2. **Copy Semantics**: errors are returned from the receive loop on every
//!    bad packet, so they stay cheap to move around.
//! 3. **Never Reach the Filter**: a record that fails to decode is dropped
//!    by the caller before any filter state is touched.
//!
//! ## Handling Strategy
//!
//! ```rust
//! use pulseguard_core::{TelemetryError, TelemetryRecord};
//!
//! match TelemetryRecord::parse("1000,72,0.9") {
//!     Ok(record) => { /* feed the filter */ }
//!     Err(TelemetryError::FieldCount { found }) => {
//!         // Truncated or foreign packet - warn and drop
//!         assert_eq!(found, 3);
//!     }
//!     Err(_) => { /* non-numeric field, oversized datagram - drop */ }
//! }
//! ```

use thiserror_no_std::Error;

/// Result type for telemetry decoding
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Telemetry decoding errors - kept small for embedded use
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum TelemetryError {
    /// Record does not have 5 or 6 comma-separated fields
    #[error("Expected 5 or 6 fields, found {found}")]
    FieldCount {
        /// Number of non-empty fields in the record
        found: usize,
    },

    /// A field could not be parsed as a number
    #[error("Invalid value in field '{field}'")]
    InvalidField {
        /// Name of the offending field
        field: &'static str,
    },

    /// Datagram text exceeds the record buffer
    #[error("Record too long: {len} bytes")]
    TooLong {
        /// Length of the decoded text
        len: usize,
    },
}

#[cfg(feature = "defmt")]
impl defmt::Format for TelemetryError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::FieldCount { found } =>
                defmt::write!(fmt, "Expected 5 or 6 fields, found {}", found),
            Self::InvalidField { field } =>
                defmt::write!(fmt, "Invalid field {}", field),
            Self::TooLong { len } =>
                defmt::write!(fmt, "Record too long: {}", len),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "std")]
    #[test]
    fn error_display() {
        let err = TelemetryError::FieldCount { found: 3 };
        assert_eq!(format!("{}", err), "Expected 5 or 6 fields, found 3");

        let err = TelemetryError::InvalidField { field: "quality" };
        assert_eq!(format!("{}", err), "Invalid value in field 'quality'");
    }
}

//! Device timestamps
//!
//! Timestamps come from the sensor device, not from the host. They are
//! milliseconds on the device's own monotonic clock, signed so that a clock
//! that steps backwards produces a negative delta instead of wrapping.

use crate::constants::time::MS_PER_SECOND_F;

/// Timestamp in milliseconds on the device clock
pub type Timestamp = i64;

/// Signed time delta from `earlier` to `later` in milliseconds
///
/// Zero or negative means a duplicate or out-of-order reading.
pub fn delta_ms(earlier: Timestamp, later: Timestamp) -> i64 {
    later.saturating_sub(earlier)
}

/// Convert a millisecond delta to seconds
pub fn ms_to_seconds(delta_ms: i64) -> f64 {
    delta_ms as f64 / MS_PER_SECOND_F
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_is_signed() {
        assert_eq!(delta_ms(1000, 1500), 500);
        assert_eq!(delta_ms(1500, 1000), -500);
        assert_eq!(delta_ms(1000, 1000), 0);
    }

    #[test]
    fn delta_saturates() {
        assert_eq!(delta_ms(i64::MIN, i64::MAX), i64::MAX);
    }

    #[test]
    fn seconds_conversion() {
        assert_eq!(ms_to_seconds(1000), 1.0);
        assert_eq!(ms_to_seconds(250), 0.25);
    }
}

//! Telemetry record codec
//!
//! Text formats exchanged with the sensor device over UDP.
//!
//! ## Inbound Record
//!
//! One record per datagram, comma-separated:
//!
//! ```text
//! t_ms,bpm_raw,quality,stable,alarm_type[,bpm_corr_old]
//! 123456,72,0.870,1,0
//! ```
//!
//! Ranges are not enforced here - the filter sanitizes BPM and quality
//! itself. The optional sixth field is the device's previous correction and
//! is carried along for diagnostics only.
//!
//! ## Outbound Record
//!
//! ```text
//! t_ms,bpm_corr\n     (OutputFormat::WithTimestamp)
//! bpm_corr\n          (OutputFormat::BpmOnly)
//! ```

use core::fmt::Write;

use crate::errors::{TelemetryError, TelemetryResult};
use crate::time::Timestamp;

/// Longest datagram accepted, in bytes; also the bridge's receive buffer
pub const MAX_RECORD_LEN: usize = 2048;

/// Required number of fields
pub const REQUIRED_FIELDS: usize = 5;

/// Maximum number of fields (with the trailing previous correction)
pub const MAX_FIELDS: usize = 6;

/// Capacity of an encoded outbound record
pub const MAX_CORRECTION_LEN: usize = 48;

/// Alarm raised by the device's on-board anomaly detector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AlarmType {
    /// No alarm
    None,
    /// Low quality or no usable pulse
    NoSignal,
    /// Sustained low BPM
    Bradycardia,
    /// Sustained high BPM
    Tachycardia,
    /// Rapid BPM jump or instability
    RapidChange,
    /// Code not known to this build
    Unknown(i32),
}

impl AlarmType {
    /// Classify a raw alarm code
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => Self::None,
            1 => Self::NoSignal,
            2 => Self::Bradycardia,
            3 => Self::Tachycardia,
            4 => Self::RapidChange,
            other => Self::Unknown(other),
        }
    }

    /// Display name as used by the device firmware
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::NoSignal => "NO_SIGNAL",
            Self::Bradycardia => "BRADYCARDIA",
            Self::Tachycardia => "TACHYCARDIA",
            Self::RapidChange => "RAPID_CHANGE",
            Self::Unknown(_) => "UNKNOWN",
        }
    }
}

/// One decoded telemetry reading
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TelemetryRecord {
    /// Device timestamp in milliseconds
    pub t_ms: Timestamp,
    /// Raw BPM as measured, unclamped
    pub bpm_raw: i32,
    /// Signal quality, nominally 0..1 but not range-checked
    pub quality: f64,
    /// Device considers the BPM stable
    pub stable: bool,
    /// Raw alarm code, passed through to the log
    pub alarm_type: i32,
    /// Correction the device last received, if reported
    pub bpm_corr_old: Option<i32>,
}

impl TelemetryRecord {
    /// Parse one record from text
    ///
    /// Surrounding whitespace, per-field whitespace and empty fields (for
    /// example a trailing comma) are ignored.
    pub fn parse(line: &str) -> TelemetryResult<Self> {
        let mut fields: heapless::Vec<&str, MAX_FIELDS> = heapless::Vec::new();
        let mut found = 0;

        for field in line.trim().split(',').map(str::trim).filter(|f| !f.is_empty()) {
            found += 1;
            // Keep counting past capacity so the error reports the real size
            let _ = fields.push(field);
        }

        if !(REQUIRED_FIELDS..=MAX_FIELDS).contains(&found) {
            return Err(TelemetryError::FieldCount { found });
        }

        let t_ms = parse_field(fields[0], "t_ms")?;
        let bpm_raw = parse_field(fields[1], "bpm_raw")?;
        let quality = parse_field(fields[2], "quality")?;
        let stable = parse_field::<i64>(fields[3], "stable")? != 0;
        let alarm_type = parse_field(fields[4], "alarm_type")?;
        let bpm_corr_old = match fields.get(5) {
            Some(field) => Some(parse_field(field, "bpm_corr_old")?),
            None => None,
        };

        Ok(Self {
            t_ms,
            bpm_raw,
            quality,
            stable,
            alarm_type,
            bpm_corr_old,
        })
    }

    /// Decode a raw datagram
    ///
    /// Bytes that are not valid UTF-8 are dropped rather than failing the
    /// whole record.
    pub fn from_datagram(data: &[u8]) -> TelemetryResult<Self> {
        let mut text: heapless::String<MAX_RECORD_LEN> = heapless::String::new();
        let too_long = TelemetryError::TooLong { len: data.len() };

        let mut rest = data;
        while !rest.is_empty() {
            match core::str::from_utf8(rest) {
                Ok(valid) => {
                    text.push_str(valid).map_err(|_| too_long)?;
                    break;
                }
                Err(e) => {
                    let (valid, after) = rest.split_at(e.valid_up_to());
                    // valid_up_to guarantees this prefix is UTF-8
                    if let Ok(valid) = core::str::from_utf8(valid) {
                        text.push_str(valid).map_err(|_| too_long)?;
                    }
                    let skip = e.error_len().unwrap_or(after.len());
                    rest = &after[skip..];
                }
            }
        }

        Self::parse(&text)
    }

    /// Alarm classification of the raw code
    pub fn alarm(&self) -> AlarmType {
        AlarmType::from_code(self.alarm_type)
    }
}

fn parse_field<T: core::str::FromStr>(field: &str, name: &'static str) -> TelemetryResult<T> {
    field
        .parse()
        .map_err(|_| TelemetryError::InvalidField { field: name })
}

/// Shape of the record sent back to the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum OutputFormat {
    /// `t_ms,bpm_corr\n`
    #[default]
    WithTimestamp,
    /// `bpm_corr\n`
    BpmOnly,
}

impl OutputFormat {
    /// Map the `include_timestamp` configuration flag
    pub fn from_include_timestamp(include_timestamp: bool) -> Self {
        if include_timestamp {
            Self::WithTimestamp
        } else {
            Self::BpmOnly
        }
    }
}

/// Encode a corrected reading for the device
pub fn encode_correction(
    format: OutputFormat,
    t_ms: Timestamp,
    bpm: i32,
) -> heapless::String<MAX_CORRECTION_LEN> {
    let mut out = heapless::String::new();
    // Capacity covers i64::MIN and i32::MIN with separators
    let _ = match format {
        OutputFormat::WithTimestamp => writeln!(out, "{},{}", t_ms, bpm),
        OutputFormat::BpmOnly => writeln!(out, "{}", bpm),
    };
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_five_fields() {
        let r = TelemetryRecord::parse("123456,72,0.870,1,0").unwrap();
        assert_eq!(r.t_ms, 123456);
        assert_eq!(r.bpm_raw, 72);
        assert_eq!(r.quality, 0.87);
        assert!(r.stable);
        assert_eq!(r.alarm_type, 0);
        assert_eq!(r.bpm_corr_old, None);
    }

    #[test]
    fn parses_six_fields() {
        let r = TelemetryRecord::parse("1000,180,0.2,0,3,95\n").unwrap();
        assert!(!r.stable);
        assert_eq!(r.alarm(), AlarmType::Tachycardia);
        assert_eq!(r.bpm_corr_old, Some(95));
    }

    #[test]
    fn tolerates_whitespace_and_trailing_comma() {
        let r = TelemetryRecord::parse("  1000 , 65 ,0.5, 2 ,1,\r\n").unwrap();
        assert_eq!(r.bpm_raw, 65);
        // Any non-zero stability code means stable
        assert!(r.stable);
        assert_eq!(r.alarm(), AlarmType::NoSignal);
    }

    #[test]
    fn out_of_range_values_pass_through() {
        let r = TelemetryRecord::parse("1000,400,3.5,1,0").unwrap();
        assert_eq!(r.bpm_raw, 400);
        assert_eq!(r.quality, 3.5);
    }

    #[test]
    fn rejects_wrong_field_count() {
        assert_eq!(
            TelemetryRecord::parse("1000,72,0.9"),
            Err(TelemetryError::FieldCount { found: 3 })
        );
        assert_eq!(
            TelemetryRecord::parse("1,2,0.3,1,0,5,6,7,8,9"),
            Err(TelemetryError::FieldCount { found: 10 })
        );
        assert_eq!(TelemetryRecord::parse(""), Err(TelemetryError::FieldCount { found: 0 }));
    }

    #[test]
    fn rejects_non_numeric_fields() {
        assert_eq!(
            TelemetryRecord::parse("abc,72,0.9,1,0"),
            Err(TelemetryError::InvalidField { field: "t_ms" })
        );
        assert_eq!(
            TelemetryRecord::parse("1000,72.5,0.9,1,0"),
            Err(TelemetryError::InvalidField { field: "bpm_raw" })
        );
        assert_eq!(
            TelemetryRecord::parse("1000,72,high,1,0"),
            Err(TelemetryError::InvalidField { field: "quality" })
        );
        assert_eq!(
            TelemetryRecord::parse("1000,72,0.9,yes,0"),
            Err(TelemetryError::InvalidField { field: "stable" })
        );
        assert_eq!(
            TelemetryRecord::parse("1000,72,0.9,1,0,x"),
            Err(TelemetryError::InvalidField { field: "bpm_corr_old" })
        );
    }

    #[test]
    fn datagram_drops_invalid_utf8() {
        let data = b"1000,7\xff2,0.9,1,0\n";
        let r = TelemetryRecord::from_datagram(data).unwrap();
        assert_eq!(r.bpm_raw, 72);
    }

    #[test]
    fn padded_datagram_is_accepted() {
        let mut data = b"1000,72,0.9,1,0".to_vec();
        data.resize(600, b' ');
        let r = TelemetryRecord::from_datagram(&data).unwrap();
        assert_eq!(r.bpm_raw, 72);

        data.resize(MAX_RECORD_LEN, b' ');
        assert!(TelemetryRecord::from_datagram(&data).is_ok());
    }

    #[test]
    fn datagram_too_long() {
        let data = [b'1'; MAX_RECORD_LEN + 1];
        assert_eq!(
            TelemetryRecord::from_datagram(&data),
            Err(TelemetryError::TooLong { len: MAX_RECORD_LEN + 1 })
        );
    }

    #[test]
    fn unknown_alarm_code() {
        assert_eq!(AlarmType::from_code(9), AlarmType::Unknown(9));
        assert_eq!(AlarmType::from_code(9).as_str(), "UNKNOWN");
        assert_eq!(AlarmType::from_code(2).as_str(), "BRADYCARDIA");
    }

    #[test]
    fn encodes_corrections() {
        let out = encode_correction(OutputFormat::WithTimestamp, 123456, 74);
        assert_eq!(out.as_str(), "123456,74\n");

        let out = encode_correction(OutputFormat::BpmOnly, 123456, 74);
        assert_eq!(out.as_str(), "74\n");

        let out = encode_correction(OutputFormat::WithTimestamp, i64::MIN, i32::MIN);
        assert!(out.ends_with('\n'));
    }

    #[test]
    fn output_format_flag() {
        assert_eq!(OutputFormat::from_include_timestamp(true), OutputFormat::WithTimestamp);
        assert_eq!(OutputFormat::from_include_timestamp(false), OutputFormat::BpmOnly);
    }
}

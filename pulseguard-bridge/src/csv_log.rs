//! CSV session log
//!
//! One file per bridge run, one row per processed reading, flushed as soon
//! as it is written so a crash loses at most the reading in flight.
//!
//! ```text
//! pc_time_iso,src_ip,t_ms,bpm_raw,quality,stable,alarm_type,bpm_corr
//! 2024-03-09T12:00:00.005,192.168.1.40,123456,72,0.870,1,0,72
//! ```

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::net::IpAddr;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use pulseguard_core::TelemetryRecord;

use crate::clock::format_iso_ms;

/// Column header, first line of every log
pub const HEADER: &str = "pc_time_iso,src_ip,t_ms,bpm_raw,quality,stable,alarm_type,bpm_corr";

/// File name for a log opened at `opened`: `{prefix}_{YYYYmmdd_HHMMSS}.csv`
pub fn log_file_name(prefix: &str, opened: &NaiveDateTime) -> String {
    format!("{}_{}.csv", prefix, opened.format("%Y%m%d_%H%M%S"))
}

/// Append-only CSV writer
#[derive(Debug)]
pub struct CsvLog<W: Write> {
    writer: W,
    rows: u64,
}

impl<W: Write> CsvLog<W> {
    /// Wrap a writer and emit the header
    pub fn new(mut writer: W) -> io::Result<Self> {
        writeln!(writer, "{}", HEADER)?;
        writer.flush()?;
        Ok(Self { writer, rows: 0 })
    }

    /// Append one reading and flush
    pub fn append(
        &mut self,
        time: &NaiveDateTime,
        source: IpAddr,
        record: &TelemetryRecord,
        bpm_corr: i32,
    ) -> io::Result<()> {
        writeln!(
            self.writer,
            "{},{},{},{},{:.3},{},{},{}",
            format_iso_ms(time),
            source,
            record.t_ms,
            record.bpm_raw,
            record.quality,
            u8::from(record.stable),
            record.alarm_type,
            bpm_corr
        )?;
        self.writer.flush()?;
        self.rows += 1;
        Ok(())
    }

    /// Rows written so far, header excluded
    pub fn rows(&self) -> u64 {
        self.rows
    }

    /// Borrow the underlying writer
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Unwrap the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl CsvLog<BufWriter<File>> {
    /// Create a fresh timestamped log in `dir`
    ///
    /// Creates `dir` if needed. Returns the log and the path it writes to.
    pub fn create_in(
        dir: &Path,
        prefix: &str,
        opened: NaiveDateTime,
    ) -> io::Result<(Self, PathBuf)> {
        fs::create_dir_all(dir)?;
        let path = dir.join(log_file_name(prefix, &opened));
        let file = File::create(&path)?;
        let log = Self::new(BufWriter::new(file))?;
        Ok((log, path))
    }
}

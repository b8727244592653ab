//! Receive, correct, log, reply
//!
//! [`TelemetryBridge`] owns one corrector and drives it from a single
//! receive loop. Every datagram takes this path:
//!
//! ```text
//! datagram ──decode──▶ record ──dup t_ms?──▶ skip
//!    │ error                │
//!    ▼                      ▼
//!  warn, drop         corrector.correct()
//!                           │
//!                    CSV row (fatal on error)
//!                           │
//!                    send correction (warn on error)
//! ```
//!
//! All four collaborators are generic so tests can swap in a recording
//! sink, an in-memory log and a fixed clock.

use std::io::Write;
use std::net::{SocketAddr, UdpSocket};

use log::{debug, info, warn};
use pulseguard_core::telemetry::MAX_RECORD_LEN;
use pulseguard_core::{encode_correction, Correction, Corrector, TelemetryRecord, Timestamp};
use serde::Serialize;

use crate::clock::{format_iso_ms, Clock};
use crate::config::BridgeConfig;
use crate::csv_log::CsvLog;
use crate::sender::CorrectionSink;
use crate::BridgeError;

/// Receive buffer size; longer datagrams are truncated by the OS
pub const RECV_BUFFER_SIZE: usize = MAX_RECORD_LEN;

/// Counters for one bridge run
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct BridgeStats {
    /// Datagrams handed to the bridge
    pub datagrams_received: u64,
    /// Datagrams dropped because they did not decode
    pub malformed: u64,
    /// Records skipped for repeating the previous timestamp
    pub duplicates: u64,
    /// Records run through the corrector and logged
    pub processed: u64,
    /// Corrections delivered to the socket
    pub corrections_sent: u64,
    /// Corrections that failed to send
    pub send_failures: u64,
    /// Socket receive errors
    pub receive_errors: u64,
}

/// Result of handling one well-formed, non-duplicate datagram
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedReading {
    /// Peer that sent the record
    pub source: SocketAddr,
    /// Decoded record
    pub record: TelemetryRecord,
    /// Filter output for the record
    pub correction: Correction,
    /// Whether the correction reached the socket
    pub sent: bool,
}

/// Single-session telemetry bridge
pub struct TelemetryBridge<C, S, W, K>
where
    C: Corrector,
    S: CorrectionSink,
    W: Write,
    K: Clock,
{
    corrector: C,
    sink: S,
    log: CsvLog<W>,
    clock: K,
    config: BridgeConfig,
    last_t_ms: Option<Timestamp>,
    stats: BridgeStats,
}

impl<C, S, W, K> TelemetryBridge<C, S, W, K>
where
    C: Corrector,
    S: CorrectionSink,
    W: Write,
    K: Clock,
{
    /// Assemble a bridge; the log must already carry its header
    pub fn new(config: &BridgeConfig, corrector: C, sink: S, log: CsvLog<W>, clock: K) -> Self {
        Self {
            corrector,
            sink,
            log,
            clock,
            config: config.clone(),
            last_t_ms: None,
            stats: BridgeStats::default(),
        }
    }

    /// Process one datagram from `source`
    ///
    /// Returns `Ok(None)` for dropped and skipped datagrams. Only a log write
    /// failure is returned as an error.
    pub fn handle_datagram(
        &mut self,
        data: &[u8],
        source: SocketAddr,
    ) -> Result<Option<ProcessedReading>, BridgeError> {
        self.stats.datagrams_received += 1;

        let record = match TelemetryRecord::from_datagram(data) {
            Ok(record) => record,
            Err(e) => {
                warn!(
                    "Dropping malformed record from {}: {} ({:?})",
                    source,
                    e,
                    String::from_utf8_lossy(data).trim_end()
                );
                self.stats.malformed += 1;
                return Ok(None);
            }
        };

        // Devices resend the last packet when they miss a reply; only a
        // delivered reading counts as handled
        if self.last_t_ms == Some(record.t_ms) {
            self.stats.duplicates += 1;
            return Ok(None);
        }

        let correction = self.corrector.correct(
            record.t_ms,
            record.bpm_raw,
            record.quality,
            record.stable,
        );
        if correction.outcome.is_rejected() {
            debug!("t={} raw={} held: {:?}", record.t_ms, record.bpm_raw, correction.outcome);
        }

        let now = self.clock.now();
        self.log
            .append(&now, source.ip(), &record, correction.bpm)
            .map_err(BridgeError::LogWrite)?;
        self.stats.processed += 1;

        let payload = encode_correction(self.config.output_format(), record.t_ms, correction.bpm);
        let dest = self.config.reply_addr(source);
        let sent = match self.sink.send(payload.as_bytes(), dest) {
            Ok(()) => {
                self.last_t_ms = Some(record.t_ms);
                self.stats.corrections_sent += 1;
                true
            }
            Err(e) => {
                warn!("{}", e);
                self.stats.send_failures += 1;
                false
            }
        };

        info!(
            "[{}] raw={:3} q={:.2} st={} -> corr={:3}",
            format_iso_ms(&now),
            record.bpm_raw,
            record.quality,
            u8::from(record.stable),
            correction.bpm
        );

        Ok(Some(ProcessedReading {
            source,
            record,
            correction,
            sent,
        }))
    }

    /// Block for one datagram on `socket` and process it
    ///
    /// Receive errors are counted and returned as [`BridgeError::Receive`].
    pub fn poll_once(
        &mut self,
        socket: &UdpSocket,
        buf: &mut [u8],
    ) -> Result<Option<ProcessedReading>, BridgeError> {
        let (len, source) = socket.recv_from(buf).map_err(|e| {
            self.stats.receive_errors += 1;
            BridgeError::Receive(e)
        })?;
        self.handle_datagram(&buf[..len], source)
    }

    /// Serve `socket` until an unrecoverable error
    pub fn run(&mut self, socket: &UdpSocket) -> Result<(), BridgeError> {
        let mut buf = [0u8; RECV_BUFFER_SIZE];
        loop {
            match self.poll_once(socket, &mut buf) {
                Ok(_) => {}
                Err(e) if e.is_recoverable() => warn!("{}", e),
                Err(e) => return Err(e),
            }
        }
    }

    /// Counters so far
    pub fn stats(&self) -> &BridgeStats {
        &self.stats
    }

    /// The corrector being driven
    pub fn corrector(&self) -> &C {
        &self.corrector
    }

    /// The session log
    pub fn log(&self) -> &CsvLog<W> {
        &self.log
    }

    /// The outbound sink
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Timestamp of the last reading whose correction was delivered
    pub fn last_timestamp_ms(&self) -> Option<Timestamp> {
        self.last_t_ms
    }
}

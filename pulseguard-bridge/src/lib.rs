//! UDP Telemetry Bridge for Wearable Heart-Rate Sensors
//!
//! ## Overview
//!
//! Sits between a sensor device and the network. Every telemetry datagram
//! the device sends is decoded, run through the adaptive BPM filter from
//! `pulseguard-core`, appended to a CSV log and answered with the corrected
//! value.
//!
//! ```text
//! device:any ──UDP "t_ms,bpm,q,stable,alarm"──▶ bridge:7777
//!                                                  │
//!                                   decode ─▶ filter ─▶ CSV row
//!                                                  │
//! device:7778 ◀──UDP "t_ms,bpm_corr\n"─────────────┘
//! ```
//!
//! ## Failure Handling
//!
//! The loop is built to keep running on bad input:
//!
//! - **Malformed record**: warned about and dropped, filter untouched
//! - **Duplicate timestamp**: skipped silently, no row, no reply
//! - **Send failure**: warned about, the row is already logged; a resend
//!   of the same reading is processed and answered again
//! - **Receive error**: warned about, next datagram is awaited
//!
//! Only a failure to write the CSV log stops the bridge.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::net::UdpSocket;
//! use pulseguard_bridge::{
//!     BridgeConfig, CsvLog, SystemClock, TelemetryBridge, UdpCorrectionSender, Clock,
//! };
//! use pulseguard_core::AdaptiveBpmFilter;
//!
//! let config = BridgeConfig::default();
//! let socket = UdpSocket::bind(config.listen_addr())?;
//! let clock = SystemClock;
//! let (log, _path) = CsvLog::create_in(&config.log_dir, &config.log_prefix, clock.now())?;
//!
//! let mut bridge = TelemetryBridge::new(
//!     &config,
//!     AdaptiveBpmFilter::new(),
//!     UdpCorrectionSender::unbound()?,
//!     log,
//!     clock,
//! );
//! bridge.run(&socket)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod bridge;
pub mod clock;
pub mod config;
pub mod csv_log;
pub mod sender;

use std::io;
use std::net::SocketAddr;

pub use bridge::{BridgeStats, ProcessedReading, TelemetryBridge, RECV_BUFFER_SIZE};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{BridgeConfig, ConfigError};
pub use csv_log::CsvLog;
pub use sender::{CorrectionSink, UdpCorrectionSender};

use thiserror::Error;

/// Bridge errors
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Receive failed: {0}")]
    Receive(#[source] io::Error),

    #[error("Log write failed: {0}")]
    LogWrite(#[source] io::Error),

    #[error("Send to {dest} failed: {source}")]
    Send {
        dest: SocketAddr,
        #[source]
        source: io::Error,
    },

}

impl BridgeError {
    /// Whether the receive loop can carry on after this error
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Receive(_) | Self::Send { .. })
    }
}

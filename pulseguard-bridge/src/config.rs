//! Bridge configuration
//!
//! Fixed for the lifetime of the process. Resolved once at startup in
//! three layers, later layers winning:
//!
//! 1. [`BridgeConfig::default`] - the ports the device firmware expects
//! 2. An optional JSON file ([`BridgeConfig::from_file`])
//! 3. Command-line overrides applied through the builder methods
//!
//! ```json
//! {
//!   "bind_address": "0.0.0.0",
//!   "in_port": 7777,
//!   "out_port": 7778,
//!   "include_timestamp": true,
//!   "log_dir": "/var/log/pulseguard",
//!   "log_prefix": "heart_adaptive"
//! }
//! ```

use std::fs;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use pulseguard_core::OutputFormat;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Port the device sends telemetry to
pub const DEFAULT_IN_PORT: u16 = 7777;

/// Port the device listens on for corrections
pub const DEFAULT_OUT_PORT: u16 = 7778;

/// Log file name prefix
pub const DEFAULT_LOG_PREFIX: &str = "heart_adaptive";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{name} must be non-zero")]
    InvalidPort { name: &'static str },

    #[error("Log prefix must not be empty")]
    EmptyPrefix,
}

/// Startup configuration of the telemetry bridge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Local address the telemetry socket binds to
    pub bind_address: IpAddr,
    /// Inbound telemetry port
    pub in_port: u16,
    /// Outbound port on the device for corrected BPM
    pub out_port: u16,
    /// Send `t_ms,bpm_corr` instead of bare `bpm_corr`
    pub include_timestamp: bool,
    /// Directory for the CSV log
    pub log_dir: PathBuf,
    /// CSV log file name prefix
    pub log_prefix: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            bind_address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            in_port: DEFAULT_IN_PORT,
            out_port: DEFAULT_OUT_PORT,
            include_timestamp: true,
            log_dir: PathBuf::from("."),
            log_prefix: DEFAULT_LOG_PREFIX.to_string(),
        }
    }
}

impl BridgeConfig {
    /// Default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from JSON; missing keys keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Set bind address
    pub fn bind_address(mut self, address: IpAddr) -> Self {
        self.bind_address = address;
        self
    }

    /// Set inbound port
    pub fn in_port(mut self, port: u16) -> Self {
        self.in_port = port;
        self
    }

    /// Set outbound port
    pub fn out_port(mut self, port: u16) -> Self {
        self.out_port = port;
        self
    }

    /// Choose the outbound record shape
    pub fn include_timestamp(mut self, include: bool) -> Self {
        self.include_timestamp = include;
        self
    }

    /// Set log directory
    pub fn log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = dir.into();
        self
    }

    /// Set log file prefix
    pub fn log_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.log_prefix = prefix.into();
        self
    }

    /// Reject configurations the bridge cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.in_port == 0 {
            return Err(ConfigError::InvalidPort { name: "in_port" });
        }
        if self.out_port == 0 {
            return Err(ConfigError::InvalidPort { name: "out_port" });
        }
        if self.log_prefix.trim().is_empty() {
            return Err(ConfigError::EmptyPrefix);
        }
        Ok(())
    }

    /// Address the telemetry socket binds to
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.in_port)
    }

    /// Where a correction for a datagram from `source` goes
    pub fn reply_addr(&self, source: SocketAddr) -> SocketAddr {
        SocketAddr::new(source.ip(), self.out_port)
    }

    /// Outbound record shape
    pub fn output_format(&self) -> OutputFormat {
        OutputFormat::from_include_timestamp(self.include_timestamp)
    }
}

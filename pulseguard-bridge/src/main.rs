//! `pulseguard-bridge` binary
//!
//! ```bash
//! pulseguard-bridge
//! pulseguard-bridge --config bridge.json --log-dir /var/log/pulseguard
//! pulseguard-bridge --in-port 9100 --out-port 9101 --bpm-only
//! ```

use std::net::{IpAddr, UdpSocket};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::info;
use pulseguard_bridge::{
    BridgeConfig, Clock, CsvLog, SystemClock, TelemetryBridge, UdpCorrectionSender,
};
use pulseguard_core::AdaptiveBpmFilter;
use tracing_subscriber::EnvFilter;

/// Adaptive heart-rate correction bridge
#[derive(Parser, Debug)]
#[command(name = "pulseguard-bridge", version, about, long_about = None)]
struct Args {
    /// JSON configuration file; flags below override it
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Local address to receive telemetry on
    #[arg(long, value_name = "ADDR")]
    bind: Option<IpAddr>,

    /// Inbound telemetry port
    #[arg(long, value_name = "PORT")]
    in_port: Option<u16>,

    /// Device port for corrected BPM
    #[arg(long, value_name = "PORT")]
    out_port: Option<u16>,

    /// Send bare `bpm_corr` instead of `t_ms,bpm_corr`
    #[arg(long, default_value_t = false)]
    bpm_only: bool,

    /// Directory for the CSV log
    #[arg(long, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    /// CSV log file name prefix
    #[arg(long, value_name = "PREFIX")]
    log_prefix: Option<String>,

    /// Log level when RUST_LOG is unset (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn resolve_config(&self) -> anyhow::Result<BridgeConfig> {
        let mut config = match self.config.as_deref() {
            Some(path) => BridgeConfig::from_file(path)?,
            None => BridgeConfig::default(),
        };

        if let Some(addr) = self.bind {
            config = config.bind_address(addr);
        }
        if let Some(port) = self.in_port {
            config = config.in_port(port);
        }
        if let Some(port) = self.out_port {
            config = config.out_port(port);
        }
        if self.bpm_only {
            config = config.include_timestamp(false);
        }
        if let Some(dir) = &self.log_dir {
            config = config.log_dir(dir);
        }
        if let Some(prefix) = &self.log_prefix {
            config = config.log_prefix(prefix);
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = args.resolve_config()?;

    let socket = UdpSocket::bind(config.listen_addr())
        .with_context(|| format!("binding telemetry socket on {}", config.listen_addr()))?;
    let sender = UdpCorrectionSender::unbound().context("binding correction sender")?;

    let clock = SystemClock;
    let (log, path) = CsvLog::create_in(&config.log_dir, &config.log_prefix, clock.now())
        .with_context(|| format!("creating log in {}", config.log_dir.display()))?;

    info!("PulseGuard bridge v{}", env!("CARGO_PKG_VERSION"));
    info!("Listening on {}", config.listen_addr());
    info!(
        "Replying on port {} ({:?})",
        config.out_port,
        config.output_format()
    );
    info!("Logging to {}", path.display());

    let mut bridge = TelemetryBridge::new(&config, AdaptiveBpmFilter::new(), sender, log, clock);
    bridge.run(&socket)?;
    Ok(())
}

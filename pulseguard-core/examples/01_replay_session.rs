//! Replay a Recorded Session
//!
//! Feeds a short telemetry capture through the adaptive filter and prints
//! what happened to each reading.
//!
//! ## What You'll See
//!
//! - The first reading taken as-is
//! - A motion spike held at the previous estimate
//! - A duplicate packet ignored
//! - A real rise followed at a bounded rate
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run -p pulseguard-core --example 01_replay_session
//! ```

use pulseguard_core::{AdaptiveBpmFilter, Outcome, TelemetryRecord};

const CAPTURE: &[&str] = &[
    "1000,72,0.91,1,0",
    "2000,74,0.88,1,0",
    "3000,171,0.35,0,4",
    "3000,171,0.35,0,4",
    "4000,75,0.90,1,0",
    "5000,96,0.85,1,0",
    "6000,98,0.82,1,0",
    "7000,99,0.86,1,0",
    "8000,bad,0.9,1,0",
    "9000,100,0.90,1,3,92",
];

fn main() {
    let mut filter = AdaptiveBpmFilter::new();

    println!("{:>6}  {:>4}  {:>5}  {:>4}  outcome", "t_ms", "raw", "q", "corr");
    for line in CAPTURE {
        let record = match TelemetryRecord::parse(line) {
            Ok(record) => record,
            Err(e) => {
                println!("{:>6}  dropped: {}", "-", e);
                continue;
            }
        };

        let correction =
            filter.update_detailed(record.t_ms, record.bpm_raw, record.quality, record.stable);
        let note = match correction.outcome {
            Outcome::Initialized => "initialized",
            Outcome::Accepted { moderate_outlier: true } => "accepted (outlier, half step)",
            Outcome::Accepted { .. } => "accepted",
            Outcome::StaleTimestamp => "stale timestamp",
            Outcome::SpikeRejected => "spike rejected",
        };
        println!(
            "{:>6}  {:>4}  {:>5.2}  {:>4}  {} [{}]",
            record.t_ms,
            record.bpm_raw,
            record.quality,
            correction.bpm,
            note,
            record.alarm().as_str()
        );
    }

    println!("\n{:#?}", filter.stats());
}

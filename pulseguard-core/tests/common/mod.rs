//! Common test utilities for filter integration tests
//!
//! - Deterministic heart-rate stream generator
//! - Reading type shared by the scenario and property tests

#![allow(dead_code)]

use pulseguard_core::Timestamp;

/// One reading as the device would report it
#[derive(Debug, Clone, Copy)]
pub struct Reading {
    pub t_ms: Timestamp,
    pub bpm_raw: i32,
    pub quality: f64,
    pub stable: bool,
}

impl Reading {
    pub fn new(t_ms: Timestamp, bpm_raw: i32, quality: f64, stable: bool) -> Self {
        Self { t_ms, bpm_raw, quality, stable }
    }
}

/// Generator for realistic heart-rate telemetry
///
/// Simulates:
/// - A slowly varying true heart rate
/// - Measurement noise
/// - Occasional spikes from motion artifacts (with a quality dip)
pub struct HeartRateGenerator {
    seed: u32,
    t_ms: Timestamp,
    interval_ms: i64,
}

impl HeartRateGenerator {
    pub fn new(start_ms: Timestamp, interval_ms: i64) -> Self {
        Self {
            seed: 42,
            t_ms: start_ms,
            interval_ms,
        }
    }

    /// Resting stream around `base_bpm` with ±`noise` jitter and a spike
    /// every `spike_every` readings (0 for none)
    pub fn resting(&mut self, base_bpm: i32, noise: i32, count: usize, spike_every: usize) -> Vec<Reading> {
        let mut readings = Vec::with_capacity(count);

        for i in 0..count {
            let jitter = self.random_int(-noise, noise);
            let spike = spike_every != 0 && i > 0 && i % spike_every == 0;

            let (bpm, quality) = if spike {
                (base_bpm + 90 + self.random_int(0, 40), 0.35)
            } else {
                (base_bpm + jitter, 0.75 + 0.2 * self.random_float())
            };

            readings.push(Reading::new(self.t_ms, bpm, quality, !spike));
            self.t_ms += self.interval_ms;
        }

        readings
    }

    /// Linear ramp from `from` to `to` BPM over `count` readings
    pub fn ramp(&mut self, from: i32, to: i32, count: usize, quality: f64) -> Vec<Reading> {
        let mut readings = Vec::with_capacity(count);
        let steps = count.saturating_sub(1).max(1) as f64;

        for i in 0..count {
            let bpm = from as f64 + (to - from) as f64 * i as f64 / steps;
            readings.push(Reading::new(self.t_ms, bpm.round() as i32, quality, true));
            self.t_ms += self.interval_ms;
        }

        readings
    }

    fn random_float(&mut self) -> f64 {
        self.seed = self.seed.wrapping_mul(1664525).wrapping_add(1013904223);
        self.seed as f64 / u32::MAX as f64
    }

    fn random_int(&mut self, min: i32, max: i32) -> i32 {
        let range = (max - min + 1) as f64;
        (min + (self.random_float() * range) as i32).min(max)
    }
}

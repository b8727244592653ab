//! Property tests for the adaptive correction filter

use proptest::prelude::*;
use pulseguard_core::filter::envelope;
use pulseguard_core::{AdaptiveBpmFilter, Outcome};

fn reading() -> impl Strategy<Value = (i64, i32, f64, bool)> {
    (
        -1_000_000i64..1_000_000,
        any::<i32>(),
        prop_oneof![-1.0f64..2.0, any::<f64>()],
        any::<bool>(),
    )
}

fn primed(bpm: i32, quality: f64) -> AdaptiveBpmFilter {
    let mut filter = AdaptiveBpmFilter::new();
    filter.update(0, bpm, quality, true);
    filter
}

proptest! {
    #[test]
    fn estimate_stays_in_physiological_window(readings in prop::collection::vec(reading(), 1..200)) {
        let mut filter = AdaptiveBpmFilter::new();
        for (t, bpm, q, stable) in readings {
            let out = filter.update(t, bpm, q, stable);
            let estimate = filter.estimate().unwrap();
            prop_assert!((30.0..=220.0).contains(&estimate));
            prop_assert!((30..=220).contains(&out));
        }
    }

    #[test]
    fn first_call_returns_clamped_raw(t in any::<i64>(), bpm in any::<i32>(), q in any::<f64>(), stable in any::<bool>()) {
        let mut filter = AdaptiveBpmFilter::new();
        prop_assert_eq!(filter.update(t, bpm, q, stable), bpm.clamp(30, 220));
    }

    #[test]
    fn repeated_timestamp_changes_nothing(
        (t, bpm, q, stable) in reading(),
        (_, bpm2, q2, stable2) in reading(),
    ) {
        let mut filter = AdaptiveBpmFilter::new();
        let first = filter.update(t, bpm, q, stable);
        let before = filter.estimate();

        let second = filter.update(t, bpm2, q2, stable2);
        prop_assert_eq!(first, second);
        prop_assert_eq!(before, filter.estimate());
    }

    #[test]
    fn backwards_time_changes_nothing(
        t1 in 1i64..1_000_000,
        back in 1i64..1_000_000,
        a in 30i32..220,
        b in 30i32..220,
        c in any::<i32>(),
        q in 0.0f64..=1.0,
    ) {
        let mut filter = AdaptiveBpmFilter::new();
        filter.update(0, a, q, true);
        let after_first = filter.update(t1, b, q, true);
        let snapshot = (filter.estimate(), filter.last_timestamp_ms());

        let c_out = filter.update_detailed(t1 - back, c, q, false);
        prop_assert_eq!(c_out.outcome, Outcome::StaleTimestamp);
        prop_assert_eq!(c_out.bpm, after_first);
        prop_assert_eq!(snapshot, (filter.estimate(), filter.last_timestamp_ms()));
    }

    #[test]
    fn extreme_spikes_leave_estimate(q in 0.0f64..=1.0, excess in 0.001f64..200.0, up in any::<bool>(), dt in 1i64..60_000) {
        let mut filter = primed(60, q);
        let threshold = 3.0 * envelope::jump_limit(q);
        let offset = (threshold + excess).ceil() as i32;
        let raw = if up { 60 + offset } else { 60 - offset };

        // Readings that clamp back inside the threshold are not spikes
        prop_assume!((envelope::sanitize_bpm(raw) - 60).abs() as f64 > threshold);

        let c = filter.update_detailed(dt, raw, q, true);
        prop_assert_eq!(c.outcome, Outcome::SpikeRejected);
        prop_assert_eq!(filter.estimate(), Some(60.0));
    }

    #[test]
    fn step_is_bounded_by_rate_envelope(
        start in 30i32..=220,
        raw in any::<i32>(),
        q in 0.0f64..=1.0,
        stable in any::<bool>(),
        dt in 1i64..5_000,
    ) {
        let mut filter = primed(start, 0.9);
        let before = filter.estimate().unwrap();
        let c = filter.update_detailed(dt, raw, q, stable);

        let bound = envelope::max_rate(q, stable) * dt as f64 / 1000.0;
        prop_assert!((c.estimate - before).abs() <= bound + 1e-9);
    }

    #[test]
    fn rejections_do_not_drift(
        start in 40i32..200,
        repeats in 1usize..50,
        q in 0.0f64..=1.0,
    ) {
        let mut filter = primed(start, 0.9);
        filter.update(1000, start + 2, 0.9, true);
        let settled = filter.estimate();

        for _ in 0..repeats {
            // Stale timestamp
            filter.update(500, start + 10, q, true);
            // Far outside any jump limit
            filter.update(2000, if start < 120 { 220 } else { 30 }, q, true);
        }

        prop_assert_eq!(settled, filter.estimate());
        // The first spike consumed t=2000; its repeats are stale
        prop_assert_eq!(filter.last_timestamp_ms(), Some(2000));
        prop_assert_eq!(filter.stats().spike_rejections, 1);
    }

    #[test]
    fn constant_input_is_a_fixed_point(bpm in 30i32..=220, q in 0.0f64..=1.0, stable in any::<bool>(), n in 1i64..30) {
        let mut filter = AdaptiveBpmFilter::new();
        filter.update(0, bpm, q, stable);
        for i in 1..=n {
            prop_assert_eq!(filter.update(i * 1000, bpm, q, stable), bpm);
        }
        prop_assert_eq!(filter.estimate(), Some(bpm as f64));
    }
}

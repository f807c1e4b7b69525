use std::time::Duration;

use mintap_core::PolledThrottle;
use proptest::prelude::*;
use web_time::Instant;

/// Feed `gaps` (milliseconds between emissions) through a polled throttle,
/// polling every `poll_every` milliseconds, then drain it.
fn run(interval_ms: u64, poll_every: u64, gaps: &[u64]) -> Vec<(u64, usize)> {
    let start = Instant::now();
    let at = |ms: u64| start + Duration::from_millis(ms);
    let mut throttle = PolledThrottle::new(Duration::from_millis(interval_ms));
    let mut delivered = Vec::new();

    let mut now = 0;
    for (value, gap) in gaps.iter().enumerate() {
        for t in (now..now + gap).filter(|t| t % poll_every == 0) {
            if let Some(v) = throttle.poll(at(t)) {
                delivered.push((t, v));
            }
        }
        now += gap;
        if let Some(v) = throttle.emit(value, at(now)) {
            delivered.push((now, v));
        }
    }
    for t in (now..=now + 2 * (interval_ms + poll_every)).filter(|t| t % poll_every == 0) {
        if let Some(v) = throttle.poll(at(t)) {
            delivered.push((t, v));
        }
    }
    delivered
}

proptest! {
    #[test]
    fn zero_interval_delivers_everything(gaps in prop::collection::vec(0u64..5, 1..40)) {
        let delivered: Vec<_> = run(0, 1, &gaps).into_iter().map(|(_, v)| v).collect();
        prop_assert_eq!(delivered, (0..gaps.len()).collect::<Vec<_>>());
    }

    #[test]
    fn deliveries_are_spaced_ordered_and_end_on_latest(
        interval_ms in 1u64..100,
        poll_every in 1u64..250,
        gaps in prop::collection::vec(0u64..150, 1..30),
    ) {
        let delivered = run(interval_ms, poll_every, &gaps);
        prop_assert_eq!(delivered.first().map(|d| d.1), Some(0));
        prop_assert_eq!(delivered.last().map(|d| d.1), Some(gaps.len() - 1));
        for pair in delivered.windows(2) {
            prop_assert!(pair[1].1 > pair[0].1);
            prop_assert!(pair[1].0 - pair[0].0 >= interval_ms);
        }
    }
}

// tests/streaming_properties.rs
//! Property tests for streaming coverage and ordering

use eeg_playback_core::config::SessionConfig;
use eeg_playback_core::playback::{BatchSubscriber, PlaybackSession, SampleBatch};
use eeg_playback_core::recording::SyntheticRecording;
use eeg_playback_core::utils::time::MockTimeProvider;
use crossbeam::channel::unbounded;
use proptest::prelude::*;
use std::sync::Arc;

struct BatchCollector(crossbeam::channel::Sender<SampleBatch>);

impl BatchSubscriber for BatchCollector {
    fn on_batch(&mut self, batch: &SampleBatch) {
        self.0.send(batch.clone()).unwrap();
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Whatever the rate, duration, tick step and speed, a full session
    /// emits exactly the floored sample count, each index once, in order.
    #[test]
    fn full_session_coverage(
        rate in 10u32..=500,
        duration_ms in 500u32..=15_000,
        tick_ms in 100u32..=500,
        speed_tenths in 5u32..=40,
    ) {
        let rate = rate as f64;
        let duration = duration_ms as f64 / 1000.0;
        let tick = tick_ms as f64 / 1000.0;
        let speed = speed_tenths as f64 / 10.0;

        let buffer = Arc::new(SyntheticRecording::ramp(1, rate, duration));
        let clock = Arc::new(MockTimeProvider::new(0));
        let (mut session, _events) =
            PlaybackSession::new(buffer, &SessionConfig::default(), clock.clone()).unwrap();
        session.set_speed(speed).unwrap();

        let (tx, rx) = unbounded();
        session.add_subscriber(Box::new(BatchCollector(tx)));
        session.start();

        let mut guard = 0;
        while session.is_streaming() {
            clock.advance_seconds(tick);
            session.tick();
            guard += 1;
            prop_assert!(guard < 1_000_000, "session failed to terminate");
        }

        let expected = (duration * rate).floor() as usize;
        let mut next_index = 0usize;
        let mut last_time = f64::NEG_INFINITY;
        for batch in rx.try_iter() {
            // Contiguous, gap-free, duplicate-free emission
            prop_assert_eq!(batch.start_sample_index, next_index);
            prop_assert!(batch.end_sample_index > batch.start_sample_index);
            next_index = batch.end_sample_index;

            prop_assert!(batch.recording_time_seconds >= last_time);
            last_time = batch.recording_time_seconds;
        }
        prop_assert_eq!(next_index, expected);
    }

    /// The cursor is non-decreasing and never exceeds the duration.
    #[test]
    fn cursor_is_monotone_and_clamped(
        duration_ms in 500u32..=10_000,
        tick_ms in 100u32..=500,
        speed_tenths in 5u32..=40,
    ) {
        let duration = duration_ms as f64 / 1000.0;
        let tick = tick_ms as f64 / 1000.0;
        let speed = speed_tenths as f64 / 10.0;

        let buffer = Arc::new(SyntheticRecording::ramp(1, 50.0, duration));
        let clock = Arc::new(MockTimeProvider::new(0));
        let (mut session, _events) =
            PlaybackSession::new(buffer, &SessionConfig::default(), clock.clone()).unwrap();
        session.set_speed(speed).unwrap();
        session.start();

        let mut last = 0.0;
        let mut guard = 0;
        while session.is_streaming() {
            clock.advance_seconds(tick);
            session.tick();
            let cursor = session.cursor_seconds();
            prop_assert!(cursor >= last);
            prop_assert!(cursor <= duration);
            last = cursor;
            guard += 1;
            prop_assert!(guard < 1_000_000, "session failed to terminate");
        }
        prop_assert_eq!(last, duration);
    }
}

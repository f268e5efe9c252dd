// src/playback/engine.rs
//! Sample slicing and batch fan-out
//!
//! On each timebase tick the engine converts the cursor advancement into a
//! half-open sample index range per channel, slices the recording buffer, and
//! hands the resulting batch to every subscriber synchronously, in a fixed
//! order, before the tick completes. Subscribers receive the batch by shared
//! reference and must not retain it past the callback.

use crate::playback::timebase::TickAdvance;
use crate::playback::SessionEvent;
use crate::recording::RecordingBuffer;
use crate::error::StreamFault;
use crossbeam::channel::Sender;
use std::sync::Arc;

/// Newly available samples for one channel from one playback tick.
///
/// Ephemeral: produced once per tick per channel and consumed immediately.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBatch {
    pub channel_index: usize,
    /// First absolute sample index in the batch (inclusive).
    pub start_sample_index: usize,
    /// One past the last absolute sample index (exclusive).
    pub end_sample_index: usize,
    pub values: Vec<f64>,
    /// Recording time of the batch's last sample.
    pub recording_time_seconds: f64,
}

impl SampleBatch {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Downstream consumer of the tick stream.
///
/// All callbacks run synchronously inside the tick, in the order subscribers
/// were registered. `on_batch` is invoked once per non-empty channel batch;
/// `on_cursor` fires after the tick's batches, with the cursor movement that
/// produced them; `on_session_end` fires exactly once when streaming halts,
/// whether by `stop()` or by reaching the end of the recording.
pub trait BatchSubscriber: Send {
    /// A new session began; discard any per-session state.
    fn on_session_start(&mut self) {}

    /// A stopped session resumed with its cursor preserved. Counters and
    /// other per-session tallies restart; position-dependent state may be
    /// kept.
    fn on_session_resume(&mut self, _cursor_seconds: f64) {}

    fn on_batch(&mut self, batch: &SampleBatch);

    fn on_cursor(&mut self, _advance: &TickAdvance) {}

    fn on_session_end(&mut self, _cursor_seconds: f64, _natural_end: bool) {}
}

/// Converts cursor advancement into per-channel sample batches.
pub struct StreamingEngine {
    buffer: Arc<RecordingBuffer>,
    /// Per-channel guard against double emission: the next index each
    /// channel is allowed to emit.
    next_emittable_index: Vec<usize>,
    events: Sender<SessionEvent>,
}

impl StreamingEngine {
    pub fn new(buffer: Arc<RecordingBuffer>, events: Sender<SessionEvent>) -> Self {
        let channel_count = buffer.channel_count();
        Self {
            buffer,
            next_emittable_index: vec![0; channel_count],
            events,
        }
    }

    /// Forget emission progress for a new session.
    pub fn reset(&mut self) {
        self.next_emittable_index.fill(0);
    }

    /// Samples emitted so far for a channel this session.
    pub fn emitted_samples(&self, channel: usize) -> usize {
        self.next_emittable_index.get(channel).copied().unwrap_or(0)
    }

    /// Slice and publish this tick's batches to the subscribers in order.
    pub fn run_tick(
        &mut self,
        advance: &TickAdvance,
        subscribers: &mut [Box<dyn BatchSubscriber>],
    ) {
        let rate = self.buffer.sample_rate_hz();
        let available = self.buffer.samples_per_channel();

        for channel in 0..self.buffer.channel_count() {
            let window_start = (advance.previous_cursor * rate).floor() as usize;
            let start = window_start.max(self.next_emittable_index[channel]);
            let mut end = (advance.new_cursor * rate).floor() as usize;

            if end > available {
                // Truncation at the natural end of the recording is expected;
                // anywhere else it means the buffer is shorter than its
                // declared duration.
                if !advance.reached_end {
                    let fault = StreamFault::ShortRead {
                        channel,
                        requested_end: end,
                        available,
                    };
                    tracing::warn!(%fault, "mid-stream short read");
                    let _ = self.events.send(SessionEvent::Fault(fault));
                }
                end = available;
            }

            if end <= start {
                continue;
            }

            let batch = SampleBatch {
                channel_index: channel,
                start_sample_index: start,
                end_sample_index: end,
                values: self.buffer.slice(channel, start, end).to_vec(),
                recording_time_seconds: (end - 1) as f64 / rate,
            };
            self.next_emittable_index[channel] = end;

            for subscriber in subscribers.iter_mut() {
                subscriber.on_batch(&batch);
            }
        }

        for subscriber in subscribers.iter_mut() {
            subscriber.on_cursor(advance);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::SyntheticRecording;
    use crossbeam::channel::unbounded;

    /// Forwards every batch out of the boxed trait object for inspection.
    struct ForwardingSubscriber(crossbeam::channel::Sender<SampleBatch>);

    impl BatchSubscriber for ForwardingSubscriber {
        fn on_batch(&mut self, batch: &SampleBatch) {
            self.0.send(batch.clone()).unwrap();
        }
    }

    fn advance(previous: f64, new: f64, reached_end: bool) -> TickAdvance {
        TickAdvance {
            previous_cursor: previous,
            new_cursor: new,
            reached_end,
        }
    }

    #[test]
    fn test_slicing_matches_cursor_window() {
        let buffer = Arc::new(SyntheticRecording::ramp(1, 100.0, 2.0));
        let (tx, _rx) = unbounded();
        let mut engine = StreamingEngine::new(buffer, tx);
        let mut subs: Vec<Box<dyn BatchSubscriber>> = Vec::new();

        // 0.25s at 100 Hz is indexes [0, 25)
        engine.run_tick(&advance(0.0, 0.25, false), &mut subs);
        assert_eq!(engine.emitted_samples(0), 25);

        engine.reset();
        assert_eq!(engine.emitted_samples(0), 0);
    }

    #[test]
    fn test_no_index_emitted_twice() {
        let buffer = Arc::new(SyntheticRecording::ramp(1, 100.0, 2.0));
        let (tx, _rx) = unbounded();
        let mut engine = StreamingEngine::new(buffer, tx);
        let mut subs: Vec<Box<dyn BatchSubscriber>> = Vec::new();

        engine.run_tick(&advance(0.0, 0.5, false), &mut subs);
        // Overlapping window must not re-emit indexes below 50
        engine.run_tick(&advance(0.3, 0.8, false), &mut subs);
        assert_eq!(engine.emitted_samples(0), 80);
    }

    #[test]
    fn test_truncation_at_recording_end() {
        let buffer = Arc::new(SyntheticRecording::ramp(1, 100.0, 1.0));
        let (tx, rx) = unbounded();
        let mut engine = StreamingEngine::new(buffer, tx);
        let mut subs: Vec<Box<dyn BatchSubscriber>> = Vec::new();

        engine.run_tick(&advance(0.95, 1.0, true), &mut subs);
        assert_eq!(engine.emitted_samples(0), 100);
        // Natural end: no short-read fault
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_mid_stream_short_read_reported() {
        // Declared 1.0s but tick claims more time remains
        let buffer = Arc::new(SyntheticRecording::ramp(1, 100.0, 1.0));
        let (tx, rx) = unbounded();
        let mut engine = StreamingEngine::new(buffer, tx);
        let mut subs: Vec<Box<dyn BatchSubscriber>> = Vec::new();

        engine.run_tick(&advance(0.9, 1.5, false), &mut subs);
        match rx.try_recv() {
            Ok(SessionEvent::Fault(StreamFault::ShortRead { channel, .. })) => {
                assert_eq!(channel, 0)
            }
            other => panic!("expected short-read fault, got {other:?}"),
        }
    }

    #[test]
    fn test_batch_contents_and_fan_out_order() {
        let buffer = Arc::new(SyntheticRecording::ramp(2, 10.0, 1.0));
        let (tx, _rx) = unbounded();
        let mut engine = StreamingEngine::new(buffer.clone(), tx);

        let (batch_tx, batch_rx) = unbounded();
        let mut subs: Vec<Box<dyn BatchSubscriber>> =
            vec![Box::new(ForwardingSubscriber(batch_tx))];
        engine.run_tick(&advance(0.0, 0.5, false), &mut subs);

        let batches: Vec<SampleBatch> = batch_rx.try_iter().collect();
        assert_eq!(batches.len(), 2);

        let first = &batches[0];
        assert_eq!(first.channel_index, 0);
        assert_eq!(first.start_sample_index, 0);
        assert_eq!(first.end_sample_index, 5);
        assert_eq!(first.values, buffer.slice(0, 0, 5));
        assert!((first.recording_time_seconds - 0.4).abs() < 1e-12);

        assert_eq!(batches[1].channel_index, 1);
    }

    #[test]
    fn test_empty_window_emits_nothing() {
        let buffer = Arc::new(SyntheticRecording::ramp(1, 2.0, 10.0));
        let (tx, _rx) = unbounded();
        let mut engine = StreamingEngine::new(buffer, tx);

        // A 0.3s window at 2 Hz that straddles no sample boundary
        let (batch_tx, batch_rx) = unbounded();
        let mut subs: Vec<Box<dyn BatchSubscriber>> =
            vec![Box::new(ForwardingSubscriber(batch_tx))];
        engine.run_tick(&advance(0.6, 0.9, false), &mut subs);

        assert!(batch_rx.try_recv().is_err());
        assert_eq!(engine.emitted_samples(0), 0);
    }
}

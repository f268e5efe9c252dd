// src/playback/mod.rs
//! Playback session: timebase, streaming engine and subscriber wiring
//!
//! A session owns the single cooperative timeline. One logical tick advances
//! the timebase, slices batches, and runs every subscriber to completion
//! before the next tick is scheduled; there are no overlapping ticks and no
//! out-of-order batch delivery. The recording buffer is shared read-only;
//! playback state is written only from the tick path.

pub mod driver;
pub mod engine;
pub mod timebase;

pub use driver::TickDriver;
pub use engine::{BatchSubscriber, SampleBatch, StreamingEngine};
pub use timebase::{PlaybackState, TickAdvance, TimebaseController};

use crate::config::SessionConfig;
use crate::error::{PlaybackError, PlaybackResult, StreamFault};
use crate::monitor::{IntegrityMonitor, IntegrityReport, IntegritySummary, IschemiaDetector, IschemiaEvent};
use crate::recording::RecordingBuffer;
use crate::utils::time::TimeProvider;
use crossbeam::channel::{unbounded, Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;

/// Outputs produced for the UI/logging side of the system.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    PeriodicReport(IntegrityReport),
    FinalSummary(IntegritySummary),
    Ischemia(IschemiaEvent),
    EndOfRecording { cursor_seconds: f64 },
    Fault(StreamFault),
}

/// One playback session over a loaded recording.
pub struct PlaybackSession {
    timebase: TimebaseController,
    engine: StreamingEngine,
    subscribers: Vec<Box<dyn BatchSubscriber>>,
    events: Sender<SessionEvent>,
    tick_interval: Duration,
    /// True between a session start/resume and its end notification.
    session_open: bool,
}

impl PlaybackSession {
    /// Wire up a session over the recording: timebase at the configured
    /// display speed, streaming engine, integrity monitor and event detector
    /// subscribed in that fixed order. Returns the receiving end of the
    /// session event channel.
    pub fn new(
        buffer: Arc<RecordingBuffer>,
        config: &SessionConfig,
        clock: Arc<dyn TimeProvider>,
    ) -> PlaybackResult<(Self, Receiver<SessionEvent>)> {
        config
            .validate_consistency()
            .map_err(|reasons| PlaybackError::InvalidConfig { reasons })?;

        let (events, events_rx) = unbounded();

        let mut timebase = TimebaseController::new(buffer.duration_seconds(), clock.clone());
        timebase.set_speed_from_display_rate(config.playback.display_rate_mm_per_sec)?;

        let engine = StreamingEngine::new(buffer.clone(), events.clone());

        let monitor = IntegrityMonitor::new(buffer.clone(), &config.integrity, events.clone());
        let detector = IschemiaDetector::new(
            config.detection.windows.clone(),
            clock,
            events.clone(),
        );
        let subscribers: Vec<Box<dyn BatchSubscriber>> =
            vec![Box::new(monitor), Box::new(detector)];

        Ok((
            Self {
                timebase,
                engine,
                subscribers,
                events,
                tick_interval: Duration::from_millis(config.playback.tick_interval_ms),
                session_open: false,
            },
            events_rx,
        ))
    }

    /// Register an additional subscriber (e.g. a renderer). Runs after the
    /// built-in monitor and detector on every tick.
    pub fn add_subscriber(&mut self, subscriber: Box<dyn BatchSubscriber>) {
        self.subscribers.push(subscriber);
    }

    /// Begin a fresh session from the start of the recording. A no-op while
    /// already streaming: cursor, counters and emission progress are kept.
    pub fn start(&mut self) {
        if self.timebase.is_streaming() {
            return;
        }
        self.engine.reset();
        for subscriber in &mut self.subscribers {
            subscriber.on_session_start();
        }
        self.session_open = true;
        self.timebase.start();
    }

    /// Continue a stopped session from the preserved cursor. Counters reset;
    /// already-emitted sample indexes are not emitted again.
    pub fn resume(&mut self) {
        if self.timebase.is_streaming() {
            return;
        }
        let cursor = self.timebase.cursor_seconds();
        for subscriber in &mut self.subscribers {
            subscriber.on_session_resume(cursor);
        }
        self.session_open = true;
        self.timebase.resume();
    }

    /// Halt streaming and emit the final integrity summary. Safe to call at
    /// any point; after it returns no further batches or counter mutations
    /// occur for this session.
    pub fn stop(&mut self) {
        if !self.timebase.is_streaming() {
            return;
        }
        self.timebase.stop();
        self.finish_session(false);
    }

    /// Run one logical tick: advance the timebase, slice and publish this
    /// tick's batches, then run cursor-driven observers. When the cursor
    /// reaches the end of the recording the session finalizes and an
    /// end-of-recording notification is emitted.
    pub fn tick(&mut self) {
        let Some(advance) = self.timebase.tick() else {
            return;
        };
        self.engine.run_tick(&advance, &mut self.subscribers);
        if advance.reached_end {
            self.finish_session(true);
        }
    }

    pub fn set_speed(&mut self, multiplier: f64) -> PlaybackResult<()> {
        self.timebase.set_speed(multiplier)
    }

    pub fn set_speed_from_display_rate(&mut self, mm_per_second: f64) -> PlaybackResult<f64> {
        self.timebase.set_speed_from_display_rate(mm_per_second)
    }

    pub fn cursor_seconds(&self) -> f64 {
        self.timebase.cursor_seconds()
    }

    pub fn is_streaming(&self) -> bool {
        self.timebase.is_streaming()
    }

    pub fn speed_multiplier(&self) -> f64 {
        self.timebase.speed_multiplier()
    }

    /// Read-only snapshot of the playback state.
    pub fn state(&self) -> PlaybackState {
        self.timebase.state()
    }

    /// Tick cadence the driver should use for this session.
    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    fn finish_session(&mut self, natural_end: bool) {
        if !self.session_open {
            return;
        }
        self.session_open = false;

        let cursor = self.timebase.cursor_seconds();
        for subscriber in &mut self.subscribers {
            subscriber.on_session_end(cursor, natural_end);
        }
        if natural_end {
            let _ = self.events.send(SessionEvent::EndOfRecording {
                cursor_seconds: cursor,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::SyntheticRecording;
    use crate::utils::time::MockTimeProvider;

    fn session(
        duration: f64,
    ) -> (PlaybackSession, Receiver<SessionEvent>, Arc<MockTimeProvider>) {
        let buffer = Arc::new(SyntheticRecording::ramp(2, 100.0, duration));
        let clock = Arc::new(MockTimeProvider::new(0));
        let config = SessionConfig::default();
        let (session, rx) = PlaybackSession::new(buffer, &config, clock.clone()).unwrap();
        (session, rx, clock)
    }

    fn drive(session: &mut PlaybackSession, clock: &MockTimeProvider, step: f64, ticks: usize) {
        for _ in 0..ticks {
            clock.advance_seconds(step);
            session.tick();
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let buffer = Arc::new(SyntheticRecording::ramp(1, 100.0, 1.0));
        let clock = Arc::new(MockTimeProvider::new(0));
        let mut config = SessionConfig::default();
        config.playback.tick_interval_ms = 1;

        assert!(matches!(
            PlaybackSession::new(buffer, &config, clock),
            Err(PlaybackError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_full_session_reaches_end() {
        let (mut session, rx, clock) = session(2.0);
        session.start();
        drive(&mut session, &clock, 0.25, 10);

        assert!(!session.is_streaming());
        assert_eq!(session.cursor_seconds(), 2.0);

        let events: Vec<_> = rx.try_iter().collect();
        assert!(events
            .iter()
            .any(|e| matches!(e, SessionEvent::EndOfRecording { cursor_seconds } if *cursor_seconds == 2.0)));
        assert!(events
            .iter()
            .any(|e| matches!(e, SessionEvent::FinalSummary(s) if s.overall_pass)));
    }

    #[test]
    fn test_no_batches_after_stop() {
        let (mut session, _rx, clock) = session(10.0);
        session.start();
        drive(&mut session, &clock, 0.25, 4);

        session.stop();
        let cursor = session.cursor_seconds();
        drive(&mut session, &clock, 0.25, 4);

        assert_eq!(session.cursor_seconds(), cursor);
    }

    #[test]
    fn test_start_while_streaming_is_noop() {
        let (mut session, _rx, clock) = session(10.0);
        session.start();
        drive(&mut session, &clock, 0.25, 4);
        let cursor = session.cursor_seconds();

        session.start();
        assert_eq!(session.cursor_seconds(), cursor);
        assert!(session.is_streaming());
    }

    #[test]
    fn test_stop_then_resume_preserves_cursor() {
        let (mut session, _rx, clock) = session(10.0);
        session.start();
        drive(&mut session, &clock, 0.25, 4);
        session.stop();

        let cursor = session.cursor_seconds();
        assert!((cursor - 1.0).abs() < 1e-9);

        session.resume();
        drive(&mut session, &clock, 0.25, 4);
        assert!((session.cursor_seconds() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_stop_emits_final_summary() {
        let (mut session, rx, clock) = session(10.0);
        session.start();
        drive(&mut session, &clock, 0.25, 4);
        session.stop();

        let events: Vec<_> = rx.try_iter().collect();
        assert!(events
            .iter()
            .any(|e| matches!(e, SessionEvent::FinalSummary(_))));
        // An explicit stop is not an end-of-recording
        assert!(!events
            .iter()
            .any(|e| matches!(e, SessionEvent::EndOfRecording { .. })));
    }

    #[test]
    fn test_double_stop_single_summary() {
        let (mut session, rx, clock) = session(10.0);
        session.start();
        drive(&mut session, &clock, 0.25, 2);
        session.stop();
        session.stop();

        let summaries = rx
            .try_iter()
            .filter(|e| matches!(e, SessionEvent::FinalSummary(_)))
            .count();
        assert_eq!(summaries, 1);
    }
}

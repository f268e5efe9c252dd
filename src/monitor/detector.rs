// src/monitor/detector.rs
//! Condition-window event detection on the recording timeline
//!
//! Each monitored condition (e.g. an ischemia window) is a two-state machine:
//! `Quiescent` until the recording-time cursor crosses into the window, then
//! `Active` until it crosses out. Detection compares against the timebase
//! cursor, never the wall clock, so a replay of the same recording at any
//! speed produces the same events. Reported event times trail the true
//! boundary by at most one tick's worth of recording time.

use crate::config::ConditionWindow;
use crate::error::{PlaybackError, PlaybackResult, StreamFault};
use crate::playback::engine::{BatchSubscriber, SampleBatch};
use crate::playback::timebase::TickAdvance;
use crate::playback::SessionEvent;
use crate::utils::time::TimeProvider;
use crossbeam::channel::Sender;
use serde::Serialize;
use std::sync::Arc;

/// Boundary kind of a detected event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EventKind {
    Start,
    Stop,
}

/// A detected condition boundary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IschemiaEvent {
    pub condition: String,
    pub kind: EventKind,
    /// Recording time at which the boundary was detected.
    pub time_seconds: f64,
    /// Wall-clock timestamp of the detection, for audit logs.
    pub detected_at_wall_clock_nanos: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ConditionState {
    Quiescent,
    Active,
}

struct MonitoredCondition {
    window: ConditionWindow,
    state: ConditionState,
}

/// Raises alternating start/stop events for scheduled condition windows.
///
/// Events within one session strictly alternate start, stop, start, stop.
/// A transition that would break the alternation, such as a stop marker
/// with no preceding start, is a detector fault: it is surfaced on the
/// event channel and rejected, never silently accepted as an event.
pub struct IschemiaDetector {
    conditions: Vec<MonitoredCondition>,
    clock: Arc<dyn TimeProvider>,
    events: Sender<SessionEvent>,
    history: Vec<IschemiaEvent>,
}

impl IschemiaDetector {
    pub fn new(
        windows: Vec<ConditionWindow>,
        clock: Arc<dyn TimeProvider>,
        events: Sender<SessionEvent>,
    ) -> Self {
        Self {
            conditions: windows
                .into_iter()
                .map(|window| MonitoredCondition {
                    window,
                    state: ConditionState::Quiescent,
                })
                .collect(),
            clock,
            events,
            history: Vec::new(),
        }
    }

    /// Events detected so far this session, in emission order.
    pub fn history(&self) -> &[IschemiaEvent] {
        &self.history
    }

    /// Feed an externally detected marker (e.g. an annotation scanned from a
    /// monitoring log) through the state machine. Markers that violate the
    /// alternation invariant are reported as faults and rejected.
    pub fn ingest_marker(
        &mut self,
        condition: &str,
        kind: EventKind,
        time_seconds: f64,
    ) -> PlaybackResult<()> {
        let entry = self
            .conditions
            .iter_mut()
            .find(|c| c.window.label == condition);
        let Some(entry) = entry else {
            return self.fault(condition, "marker for unknown condition");
        };

        match (kind, entry.state) {
            (EventKind::Start, ConditionState::Quiescent) => {
                entry.state = ConditionState::Active;
            }
            (EventKind::Stop, ConditionState::Active) => {
                entry.state = ConditionState::Quiescent;
            }
            (EventKind::Start, ConditionState::Active) => {
                return self.fault(condition, "start marker while already active");
            }
            (EventKind::Stop, ConditionState::Quiescent) => {
                return self.fault(condition, "stop marker with no preceding start");
            }
        }

        let label = condition.to_string();
        self.emit(label, kind, time_seconds);
        Ok(())
    }

    fn fault(&mut self, condition: &str, reason: &str) -> PlaybackResult<()> {
        let fault = StreamFault::DetectorFault {
            condition: condition.to_string(),
            reason: reason.to_string(),
        };
        tracing::warn!(%fault, "detector fault");
        let _ = self.events.send(SessionEvent::Fault(fault));
        Err(PlaybackError::DetectorFault {
            condition: condition.to_string(),
            reason: reason.to_string(),
        })
    }

    fn emit(&mut self, condition: String, kind: EventKind, time_seconds: f64) {
        let event = IschemiaEvent {
            condition,
            kind,
            time_seconds,
            detected_at_wall_clock_nanos: self.clock.now_nanos(),
        };
        tracing::info!(
            condition = %event.condition,
            kind = ?event.kind,
            time = event.time_seconds,
            "condition boundary detected"
        );
        self.history.push(event.clone());
        let _ = self.events.send(SessionEvent::Ischemia(event));
    }
}

impl BatchSubscriber for IschemiaDetector {
    fn on_session_start(&mut self) {
        for condition in &mut self.conditions {
            condition.state = ConditionState::Quiescent;
        }
        self.history.clear();
    }

    fn on_batch(&mut self, _batch: &SampleBatch) {}

    fn on_cursor(&mut self, advance: &TickAdvance) {
        let cursor = advance.new_cursor;
        let mut pending = Vec::new();

        for (index, condition) in self.conditions.iter_mut().enumerate() {
            if condition.state == ConditionState::Quiescent
                && cursor >= condition.window.start_seconds
                && advance.previous_cursor < condition.window.stop_seconds
            {
                condition.state = ConditionState::Active;
                pending.push((index, EventKind::Start));
            }
            if condition.state == ConditionState::Active && cursor >= condition.window.stop_seconds
            {
                // A window skipped entirely within one tick still produces
                // its start first, preserving alternation.
                condition.state = ConditionState::Quiescent;
                pending.push((index, EventKind::Stop));
            }
        }

        for (index, kind) in pending {
            let label = self.conditions[index].window.label.clone();
            self.emit(label, kind, cursor);
        }
    }
}

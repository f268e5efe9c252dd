// src/monitor/integrity.rs
//! Statistical validation of streamed samples against the source buffer
//!
//! The monitor is a pure observer on the tick stream: it tallies counters,
//! emits reports on the session event channel, and has no path back into the
//! engine. Sends go over an unbounded channel so a slow report consumer can
//! never stall a tick. Observed problems are recorded and streaming
//! continues; nothing here halts playback.

use crate::config::IntegrityConfig;
use crate::error::StreamFault;
use crate::playback::engine::{BatchSubscriber, SampleBatch};
use crate::playback::timebase::TickAdvance;
use crate::playback::SessionEvent;
use crate::recording::RecordingBuffer;
use crossbeam::channel::Sender;
use serde::Serialize;
use std::sync::Arc;

/// Tolerance when matching the periodic report boundary against an
/// accumulated f64 cursor.
const REPORT_BOUNDARY_EPSILON: f64 = 1e-9;

/// Running tallies for one streaming session, monotonically increasing
/// until the session is reset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IntegrityCounters {
    pub total_samples_checked: u64,
    pub valid_count: u64,
    pub invalid_count: u64,
    /// Zero-valued but finite samples; informational, still valid.
    pub zero_count: u64,
    pub mismatch_count: u64,
    pub index_mismatch_count: u64,
}

/// Snapshot emitted every fixed interval of recording time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntegrityReport {
    pub elapsed_recording_seconds: f64,
    pub counters: IntegrityCounters,
}

/// Final session verdict emitted on stop or end of recording.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntegritySummary {
    pub counters: IntegrityCounters,
    pub overall_pass: bool,
}

/// Cross-checks every emitted batch against the recording buffer.
pub struct IntegrityMonitor {
    buffer: Arc<RecordingBuffer>,
    fidelity_epsilon: f64,
    report_interval_secs: f64,
    counters: IntegrityCounters,
    next_report_at: f64,
    events: Sender<SessionEvent>,
    finalized: bool,
}

impl IntegrityMonitor {
    pub fn new(
        buffer: Arc<RecordingBuffer>,
        config: &IntegrityConfig,
        events: Sender<SessionEvent>,
    ) -> Self {
        Self {
            buffer,
            fidelity_epsilon: config.fidelity_epsilon,
            report_interval_secs: config.report_interval_secs,
            counters: IntegrityCounters::default(),
            next_report_at: config.report_interval_secs,
            events,
            finalized: false,
        }
    }

    pub fn counters(&self) -> &IntegrityCounters {
        &self.counters
    }

    fn check_sample(&mut self, batch: &SampleBatch, offset: usize, value: f64) {
        let rate = self.buffer.sample_rate_hz();
        let index = batch.start_sample_index + offset;
        self.counters.total_samples_checked += 1;

        // Validity: finite, not NaN
        if !value.is_finite() {
            self.counters.invalid_count += 1;
            let fault = StreamFault::InvalidSample {
                channel: batch.channel_index,
                index,
            };
            tracing::debug!(%fault, "non-finite sample observed");
        } else {
            self.counters.valid_count += 1;
            if value == 0.0 {
                self.counters.zero_count += 1;
            }

            // Fidelity: streamed value must match the source within epsilon
            let matches_source = match self.buffer.sample(batch.channel_index, index) {
                Some(source) if source.is_finite() => {
                    (value - source).abs() <= self.fidelity_epsilon
                }
                // Finite streamed value where the source holds NaN, or an
                // index past the source channel, is a divergence either way.
                _ => false,
            };
            if !matches_source {
                self.counters.mismatch_count += 1;
                let fault = StreamFault::FidelityMismatch {
                    channel: batch.channel_index,
                    index,
                    streamed: value,
                    source: self
                        .buffer
                        .sample(batch.channel_index, index)
                        .unwrap_or(f64::NAN),
                };
                tracing::warn!(%fault, "fidelity mismatch");
            }
        }

        // Index-to-time: the absolute index must land on the batch's implied
        // timeline within one sample period
        let expected_seconds = index as f64 / rate;
        let last_offset = batch.len().saturating_sub(1);
        let implied_seconds =
            batch.recording_time_seconds - (last_offset - offset) as f64 / rate;
        if (expected_seconds - implied_seconds).abs() > 1.0 / rate {
            self.counters.index_mismatch_count += 1;
            let fault = StreamFault::IndexMismatch {
                channel: batch.channel_index,
                index,
            };
            tracing::warn!(%fault, expected_seconds, implied_seconds, "index/time mismatch");
        }
    }

    fn summary(&self) -> IntegritySummary {
        let pass = self.counters.invalid_count == 0
            && self.counters.mismatch_count == 0
            && self.counters.index_mismatch_count == 0;
        IntegritySummary {
            counters: self.counters.clone(),
            overall_pass: pass,
        }
    }
}

impl BatchSubscriber for IntegrityMonitor {
    fn on_session_start(&mut self) {
        self.counters = IntegrityCounters::default();
        self.next_report_at = self.report_interval_secs;
        self.finalized = false;
    }

    fn on_session_resume(&mut self, cursor_seconds: f64) {
        // Counters restart on resume; the report cadence realigns to the
        // next interval boundary past the preserved cursor.
        self.counters = IntegrityCounters::default();
        self.finalized = false;
        let intervals_passed = (cursor_seconds / self.report_interval_secs).floor();
        self.next_report_at = (intervals_passed + 1.0) * self.report_interval_secs;
    }

    fn on_batch(&mut self, batch: &SampleBatch) {
        for (offset, &value) in batch.values.iter().enumerate() {
            self.check_sample(batch, offset, value);
        }
    }

    fn on_cursor(&mut self, advance: &TickAdvance) {
        while self.next_report_at <= advance.new_cursor + REPORT_BOUNDARY_EPSILON {
            let report = IntegrityReport {
                elapsed_recording_seconds: self.next_report_at,
                counters: self.counters.clone(),
            };
            tracing::debug!(
                elapsed = report.elapsed_recording_seconds,
                checked = report.counters.total_samples_checked,
                "periodic integrity report"
            );
            let _ = self.events.send(SessionEvent::PeriodicReport(report));
            self.next_report_at += self.report_interval_secs;
        }
    }

    fn on_session_end(&mut self, _cursor_seconds: f64, _natural_end: bool) {
        if self.finalized {
            return;
        }
        self.finalized = true;

        let summary = self.summary();
        if summary.overall_pass {
            tracing::info!(
                checked = summary.counters.total_samples_checked,
                "integrity summary: pass"
            );
        } else {
            tracing::warn!(
                invalid = summary.counters.invalid_count,
                mismatched = summary.counters.mismatch_count,
                index_mismatched = summary.counters.index_mismatch_count,
                "integrity summary: fail"
            );
        }
        let _ = self.events.send(SessionEvent::FinalSummary(summary));
    }
}

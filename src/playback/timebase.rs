// src/playback/timebase.rs
//! Wall-clock to recording-time mapping
//!
//! The controller advances the recording cursor by *measured* elapsed wall
//! time multiplied by the playback speed, on every tick while streaming. Using
//! measured time rather than the nominal tick interval means driver jitter
//! never accumulates as drift between wall time and recording time.

use crate::config::constants::playback;
use crate::error::{PlaybackError, PlaybackResult};
use crate::utils::time::{TimeProvider, NANOS_PER_SECOND};
use std::sync::Arc;

/// Mutable playback state, owned by the session and written only by the
/// timebase controller from the tick driver's execution context.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    pub is_streaming: bool,
    pub speed_multiplier: f64,
    pub recording_cursor_seconds: f64,
    pub wall_clock_anchor_nanos: u64,
}

impl PlaybackState {
    fn idle() -> Self {
        Self {
            is_streaming: false,
            speed_multiplier: 1.0,
            recording_cursor_seconds: 0.0,
            wall_clock_anchor_nanos: 0,
        }
    }
}

/// One tick's worth of cursor advancement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickAdvance {
    pub previous_cursor: f64,
    pub new_cursor: f64,
    /// The cursor hit the recording's duration on this tick; streaming has
    /// already been turned off.
    pub reached_end: bool,
}

/// Maps wall-clock elapsed time to recording time at a configured speed.
pub struct TimebaseController {
    state: PlaybackState,
    duration_seconds: f64,
    clock: Arc<dyn TimeProvider>,
    last_tick_nanos: u64,
}

impl TimebaseController {
    pub fn new(duration_seconds: f64, clock: Arc<dyn TimeProvider>) -> Self {
        Self {
            state: PlaybackState::idle(),
            duration_seconds,
            clock,
            last_tick_nanos: 0,
        }
    }

    /// Begin streaming from the start of the recording.
    ///
    /// Idempotent while already streaming: the anchor and cursor are left
    /// untouched, so a double start never duplicates emitted samples.
    pub fn start(&mut self) {
        if self.state.is_streaming {
            tracing::debug!("start() while streaming, ignoring");
            return;
        }
        let now = self.clock.now_nanos();
        self.state.recording_cursor_seconds = 0.0;
        self.state.wall_clock_anchor_nanos = now;
        self.last_tick_nanos = now;
        self.state.is_streaming = true;
        tracing::info!(
            speed = self.state.speed_multiplier,
            "playback started"
        );
    }

    /// Begin streaming without resetting the cursor.
    pub fn resume(&mut self) {
        if self.state.is_streaming {
            return;
        }
        let now = self.clock.now_nanos();
        self.state.wall_clock_anchor_nanos = now;
        self.last_tick_nanos = now;
        self.state.is_streaming = true;
        tracing::info!(
            cursor = self.state.recording_cursor_seconds,
            "playback resumed"
        );
    }

    /// Halt streaming. Safe to call at any point; no further ticks advance
    /// the cursor until a new `start()` or `resume()`.
    pub fn stop(&mut self) {
        if self.state.is_streaming {
            self.state.is_streaming = false;
            tracing::info!(
                cursor = self.state.recording_cursor_seconds,
                "playback stopped"
            );
        }
    }

    /// Set the speed multiplier directly. Takes effect on the next tick
    /// without resetting the cursor.
    pub fn set_speed(&mut self, multiplier: f64) -> PlaybackResult<()> {
        if !multiplier.is_finite()
            || multiplier < playback::MIN_SPEED_MULTIPLIER
            || multiplier > playback::MAX_SPEED_MULTIPLIER
        {
            return Err(PlaybackError::InvalidSpeed {
                reason: format!(
                    "multiplier {multiplier} outside {}..={}",
                    playback::MIN_SPEED_MULTIPLIER,
                    playback::MAX_SPEED_MULTIPLIER
                ),
            });
        }
        self.state.speed_multiplier = multiplier;
        Ok(())
    }

    /// Set the speed from a chart display rate: 30 mm/sec is 1x, 60 mm/sec
    /// is 2x. Returns the resulting multiplier.
    pub fn set_speed_from_display_rate(&mut self, mm_per_second: f64) -> PlaybackResult<f64> {
        let multiplier = mm_per_second / playback::REFERENCE_DISPLAY_RATE_MM_PER_SEC;
        self.set_speed(multiplier)?;
        Ok(multiplier)
    }

    /// Advance the cursor by the measured elapsed wall time since the last
    /// tick, scaled by the speed multiplier and clamped to the recording
    /// duration. Returns `None` when not streaming.
    pub fn tick(&mut self) -> Option<TickAdvance> {
        if !self.state.is_streaming {
            return None;
        }

        let now = self.clock.now_nanos();
        let elapsed_seconds =
            now.saturating_sub(self.last_tick_nanos) as f64 / NANOS_PER_SECOND;
        self.last_tick_nanos = now;

        let previous_cursor = self.state.recording_cursor_seconds;
        let advanced = previous_cursor + elapsed_seconds * self.state.speed_multiplier;
        let new_cursor = advanced.min(self.duration_seconds);
        self.state.recording_cursor_seconds = new_cursor;

        let reached_end = new_cursor >= self.duration_seconds;
        if reached_end {
            self.state.is_streaming = false;
            tracing::info!(duration = self.duration_seconds, "end of recording reached");
        }

        Some(TickAdvance {
            previous_cursor,
            new_cursor,
            reached_end,
        })
    }

    pub fn cursor_seconds(&self) -> f64 {
        self.state.recording_cursor_seconds
    }

    pub fn is_streaming(&self) -> bool {
        self.state.is_streaming
    }

    pub fn speed_multiplier(&self) -> f64 {
        self.state.speed_multiplier
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }

    /// Read-only snapshot for components outside the tick path.
    pub fn state(&self) -> PlaybackState {
        self.state.clone()
    }
}

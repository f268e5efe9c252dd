//! EEG-Playback-Core: streaming and validation engine for EEG recording playback
//!
//! This library sits between a parsed EEG recording buffer and a rendering
//! surface. It streams the recording at a controllable playback speed while
//! continuously validating that the streamed samples are faithful to the
//! source and detecting clinically meaningful events on the recording
//! timeline. It provides:
//!
//! - An immutable recording buffer shared read-only by every component
//! - A timebase controller mapping wall-clock time to recording time
//! - A streaming engine slicing per-channel sample batches once per tick
//! - A data integrity monitor with periodic and final validation reports
//! - An ischemia start/stop event detector with a strict alternation rule
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use eeg_playback_core::config::SessionConfig;
//! use eeg_playback_core::playback::{PlaybackSession, SessionEvent};
//! use eeg_playback_core::recording::{SyntheticRecording, SyntheticRecordingConfig};
//! use eeg_playback_core::utils::time::SystemTimeProvider;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let recording = SyntheticRecording::generate(&SyntheticRecordingConfig::default())?;
//!     let config = SessionConfig::default();
//!
//!     let (mut session, events) =
//!         PlaybackSession::new(Arc::new(recording), &config, Arc::new(SystemTimeProvider))?;
//!     session.set_speed_from_display_rate(60.0)?; // 2x playback
//!     session.start();
//!
//!     while session.is_streaming() {
//!         std::thread::sleep(session.tick_interval());
//!         session.tick();
//!     }
//!
//!     for event in events.try_iter() {
//!         if let SessionEvent::FinalSummary(summary) = event {
//!             println!("integrity pass: {}", summary.overall_pass);
//!         }
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod error;
pub mod monitor;
pub mod playback;
pub mod recording;
pub mod utils;

// Re-export commonly used types for convenience
pub use error::{PlaybackError, PlaybackResult, StreamFault};

pub use recording::{ChannelSamples, RecordingBuffer, SyntheticRecording, SyntheticRecordingConfig};

pub use playback::{
    BatchSubscriber, PlaybackSession, PlaybackState, SampleBatch, SessionEvent, TickAdvance,
    TickDriver, TimebaseController,
};

pub use monitor::{
    EventKind, IntegrityCounters, IntegrityMonitor, IntegrityReport, IntegritySummary,
    IschemiaDetector, IschemiaEvent,
};

pub use utils::time::{MockTimeProvider, SystemTimeProvider, TimeProvider};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

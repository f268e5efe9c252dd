// src/error.rs
//! Unified error handling for the playback core
//!
//! Two families of failures exist in this system. Construction and control
//! errors (`PlaybackError`) abort the operation that caused them. Streaming
//! observations (`StreamFault`) are statistical data-quality signals: they are
//! tallied by the integrity monitor or surfaced on the session event channel,
//! and never halt playback. Streaming only stops on an explicit `stop()` or at
//! the natural end of the recording.

use thiserror::Error;

/// Errors that abort the operation that raised them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlaybackError {
    /// Recording buffer construction rejected the decoded input.
    #[error("invalid recording: {reason}")]
    InvalidRecording { reason: String },

    /// A channel's sample count disagrees with the declared duration and rate.
    #[error("channel {channel} has {actual} samples, expected {expected}")]
    ChannelLengthMismatch {
        channel: usize,
        actual: usize,
        expected: usize,
    },

    /// Speed multiplier or display rate outside the accepted range.
    #[error("invalid playback speed: {reason}")]
    InvalidSpeed { reason: String },

    /// Session configuration failed consistency validation.
    #[error("invalid configuration: {}", reasons.join("; "))]
    InvalidConfig { reasons: Vec<String> },

    /// Event detector received a transition its state machine forbids.
    #[error("detector fault for '{condition}': {reason}")]
    DetectorFault { condition: String, reason: String },
}

/// Non-fatal observations raised while streaming.
///
/// These are reported, counted, and forgotten; there is no retry policy
/// because none of them are transient I/O failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StreamFault {
    /// A streamed sample was NaN or infinite.
    #[error("non-finite sample at channel {channel}, index {index}")]
    InvalidSample { channel: usize, index: usize },

    /// A streamed sample diverged from the source buffer beyond epsilon.
    #[error("fidelity mismatch at channel {channel}, index {index}: streamed {streamed}, source {source}")]
    FidelityMismatch {
        channel: usize,
        index: usize,
        streamed: f64,
        r#source: f64,
    },

    /// A sample's position does not correspond to its expected time.
    #[error("index/time mismatch at channel {channel}, index {index}")]
    IndexMismatch { channel: usize, index: usize },

    /// A slice request ran past the buffer mid-stream. Truncation at the
    /// natural end of the recording is expected and does not raise this;
    /// seeing it with recording time remaining indicates a corrupt buffer.
    #[error("short read on channel {channel}: requested up to {requested_end}, only {available} available")]
    ShortRead {
        channel: usize,
        requested_end: usize,
        available: usize,
    },

    /// The detector state machine rejected a transition (e.g. a stop with no
    /// preceding start). Surfaced, never silently accepted.
    #[error("detector fault for '{condition}': {reason}")]
    DetectorFault { condition: String, reason: String },
}

/// Result alias for fallible playback operations.
pub type PlaybackResult<T> = Result<T, PlaybackError>;

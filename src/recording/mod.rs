// src/recording/mod.rs
//! Immutable in-memory representation of a decoded recording
//!
//! The file-parsing front end (an EDF decoder or similar) hands this module
//! per-channel sample arrays together with the native sample rate and the
//! total duration. Once constructed the buffer never changes; a new file load
//! replaces it wholesale. All downstream components share it read-only for
//! the lifetime of a session.

pub mod synthetic;

pub use synthetic::{SyntheticRecording, SyntheticRecordingConfig};

use crate::error::{PlaybackError, PlaybackResult};

/// One channel of the recording: a label and its ordered sample sequence.
///
/// Values are finite reals; NaN marks a sample the decoder flagged invalid.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelSamples {
    pub label: String,
    pub values: Vec<f64>,
}

impl ChannelSamples {
    pub fn new(label: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            values,
        }
    }
}

/// Immutable decoded recording shared by every playback component.
#[derive(Debug, Clone)]
pub struct RecordingBuffer {
    channels: Vec<ChannelSamples>,
    sample_rate_hz: f64,
    duration_seconds: f64,
}

impl RecordingBuffer {
    /// Build a buffer from decoded channels, enforcing the length invariant
    /// `len(values) == round(duration_seconds * sample_rate_hz)` per channel.
    pub fn new(
        channels: Vec<ChannelSamples>,
        sample_rate_hz: f64,
        duration_seconds: f64,
    ) -> PlaybackResult<Self> {
        if !(sample_rate_hz.is_finite() && sample_rate_hz > 0.0) {
            return Err(PlaybackError::InvalidRecording {
                reason: format!("sample rate must be positive, got {sample_rate_hz}"),
            });
        }
        if !(duration_seconds.is_finite() && duration_seconds > 0.0) {
            return Err(PlaybackError::InvalidRecording {
                reason: format!("duration must be positive, got {duration_seconds}"),
            });
        }
        if channels.is_empty() {
            return Err(PlaybackError::InvalidRecording {
                reason: "recording has no channels".to_string(),
            });
        }

        let expected = (duration_seconds * sample_rate_hz).round() as usize;
        for (index, channel) in channels.iter().enumerate() {
            if channel.values.len() != expected {
                return Err(PlaybackError::ChannelLengthMismatch {
                    channel: index,
                    actual: channel.values.len(),
                    expected,
                });
            }
        }

        Ok(Self {
            channels,
            sample_rate_hz,
            duration_seconds,
        })
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn channels(&self) -> &[ChannelSamples] {
        &self.channels
    }

    pub fn sample_rate_hz(&self) -> f64 {
        self.sample_rate_hz
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }

    /// Samples each channel holds, from the construction invariant.
    pub fn samples_per_channel(&self) -> usize {
        self.channels.first().map_or(0, |c| c.values.len())
    }

    /// Source sample at an absolute index, `None` past the channel end.
    pub fn sample(&self, channel: usize, index: usize) -> Option<f64> {
        self.channels.get(channel)?.values.get(index).copied()
    }

    /// Slice of a channel clamped to the available length.
    pub fn slice(&self, channel: usize, start: usize, end: usize) -> &[f64] {
        let values = &self.channels[channel].values;
        let end = end.min(values.len());
        let start = start.min(end);
        &values[start..end]
    }

    /// Recording time of an absolute sample index.
    pub fn index_to_seconds(&self, index: usize) -> f64 {
        index as f64 / self.sample_rate_hz
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel(len: usize) -> ChannelSamples {
        ChannelSamples::new("C1", (0..len).map(|i| i as f64).collect())
    }

    #[test]
    fn test_buffer_construction() {
        let buffer = RecordingBuffer::new(vec![channel(200), channel(200)], 100.0, 2.0).unwrap();
        assert_eq!(buffer.channel_count(), 2);
        assert_eq!(buffer.samples_per_channel(), 200);
        assert_eq!(buffer.duration_seconds(), 2.0);
    }

    #[test]
    fn test_length_invariant_enforced() {
        let err = RecordingBuffer::new(vec![channel(150)], 100.0, 2.0).unwrap_err();
        assert_eq!(
            err,
            PlaybackError::ChannelLengthMismatch {
                channel: 0,
                actual: 150,
                expected: 200,
            }
        );
    }

    #[test]
    fn test_rounded_length_accepted() {
        // 0.5s at 3 Hz rounds to 2 samples
        let buffer = RecordingBuffer::new(vec![channel(2)], 3.0, 0.5).unwrap();
        assert_eq!(buffer.samples_per_channel(), 2);
    }

    #[test]
    fn test_rejects_bad_rate_and_duration() {
        assert!(RecordingBuffer::new(vec![channel(10)], 0.0, 1.0).is_err());
        assert!(RecordingBuffer::new(vec![channel(10)], -5.0, 1.0).is_err());
        assert!(RecordingBuffer::new(vec![channel(10)], 10.0, 0.0).is_err());
        assert!(RecordingBuffer::new(vec![], 10.0, 1.0).is_err());
    }

    #[test]
    fn test_slice_truncates_at_end() {
        let buffer = RecordingBuffer::new(vec![channel(200)], 100.0, 2.0).unwrap();
        assert_eq!(buffer.slice(0, 190, 250).len(), 10);
        assert_eq!(buffer.slice(0, 250, 300).len(), 0);
    }

    #[test]
    fn test_index_to_seconds() {
        let buffer = RecordingBuffer::new(vec![channel(200)], 100.0, 2.0).unwrap();
        assert_eq!(buffer.index_to_seconds(100), 1.0);
    }
}

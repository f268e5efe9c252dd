// src/recording/synthetic.rs
//! Synthetic EEG-like recordings for tests, demos and benches

use crate::config::constants::synthetic;
use crate::error::PlaybackResult;
use crate::recording::{ChannelSamples, RecordingBuffer};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Configuration for synthetic recording generation
#[derive(Debug, Clone)]
pub struct SyntheticRecordingConfig {
    pub channel_count: usize,
    pub sample_rate_hz: f64,
    pub duration_seconds: f64,
    /// Peak amplitude of the deterministic sinusoid component.
    pub amplitude_microvolts: f64,
    /// Base oscillation frequency; each channel is offset slightly so the
    /// channels are distinguishable in a renderer.
    pub base_frequency_hz: f64,
    pub noise_amplitude_microvolts: f64,
    /// Fraction of samples replaced with NaN, for exercising validity checks.
    pub invalid_sample_ratio: f64,
    /// RNG seed; a fixed seed makes generation reproducible.
    pub seed: u64,
}

impl Default for SyntheticRecordingConfig {
    fn default() -> Self {
        Self {
            channel_count: crate::config::constants::signal::DEFAULT_CHANNEL_COUNT,
            sample_rate_hz: crate::config::constants::signal::DEFAULT_SAMPLE_RATE_HZ,
            duration_seconds: 30.0,
            amplitude_microvolts: synthetic::DEFAULT_AMPLITUDE_MICROVOLTS,
            base_frequency_hz: synthetic::DEFAULT_BASE_FREQUENCY_HZ,
            noise_amplitude_microvolts: synthetic::DEFAULT_NOISE_AMPLITUDE_MICROVOLTS,
            invalid_sample_ratio: 0.0,
            seed: 0xEE6,
        }
    }
}

/// Generator producing [`RecordingBuffer`]s from a seeded RNG
pub struct SyntheticRecording;

impl SyntheticRecording {
    /// Generate a recording according to the configuration.
    pub fn generate(config: &SyntheticRecordingConfig) -> PlaybackResult<RecordingBuffer> {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let samples_per_channel =
            (config.duration_seconds * config.sample_rate_hz).round() as usize;

        let mut channels = Vec::with_capacity(config.channel_count);
        for channel_idx in 0..config.channel_count {
            let frequency = config.base_frequency_hz + channel_idx as f64 * 0.5;
            let mut values = Vec::with_capacity(samples_per_channel);

            for sample_idx in 0..samples_per_channel {
                if config.invalid_sample_ratio > 0.0
                    && rng.gen::<f64>() < config.invalid_sample_ratio
                {
                    values.push(f64::NAN);
                    continue;
                }

                let t = sample_idx as f64 / config.sample_rate_hz;
                let tone =
                    config.amplitude_microvolts * (2.0 * std::f64::consts::PI * frequency * t).sin();
                let noise = config.noise_amplitude_microvolts * (rng.gen::<f64>() * 2.0 - 1.0);
                values.push(tone + noise);
            }

            channels.push(ChannelSamples::new(format!("EEG{}", channel_idx + 1), values));
        }

        RecordingBuffer::new(channels, config.sample_rate_hz, config.duration_seconds)
    }

    /// Small deterministic recording used throughout the test suite.
    pub fn ramp(channel_count: usize, sample_rate_hz: f64, duration_seconds: f64) -> RecordingBuffer {
        let samples_per_channel = (duration_seconds * sample_rate_hz).round() as usize;
        let channels = (0..channel_count)
            .map(|c| {
                ChannelSamples::new(
                    format!("EEG{}", c + 1),
                    (0..samples_per_channel)
                        .map(|i| (c * 1_000_000 + i) as f64)
                        .collect(),
                )
            })
            .collect();

        RecordingBuffer::new(channels, sample_rate_hz, duration_seconds)
            .expect("ramp recording satisfies the length invariant")
    }
}

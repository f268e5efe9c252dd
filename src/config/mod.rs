// src/config/mod.rs
//! Configuration management for playback sessions

pub mod constants;
pub mod loader;

pub use constants::*;
pub use loader::{ConfigError, ConfigLoader};

use serde::{Deserialize, Serialize};

/// Complete session configuration
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct SessionConfig {
    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default)]
    pub integrity: IntegrityConfig,

    #[serde(default)]
    pub detection: DetectionConfig,
}

/// Timebase and streaming settings
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PlaybackConfig {
    #[serde(default = "defaults::tick_interval_ms")]
    pub tick_interval_ms: u64,

    #[serde(default = "defaults::display_rate_mm_per_sec")]
    pub display_rate_mm_per_sec: f64,
}

/// Integrity monitor settings
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct IntegrityConfig {
    #[serde(default = "defaults::report_interval_secs")]
    pub report_interval_secs: f64,

    #[serde(default = "defaults::fidelity_epsilon")]
    pub fidelity_epsilon: f64,
}

/// Event detection settings: one entry per monitored condition window
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct DetectionConfig {
    #[serde(default)]
    pub windows: Vec<ConditionWindow>,
}

/// A scheduled condition window on the recording timeline
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ConditionWindow {
    pub label: String,
    pub start_seconds: f64,
    pub stop_seconds: f64,
}

/// Default value providers using constants
mod defaults {
    use crate::config::constants::*;

    pub fn tick_interval_ms() -> u64 {
        playback::DEFAULT_TICK_INTERVAL_MS
    }
    pub fn display_rate_mm_per_sec() -> f64 {
        playback::DEFAULT_DISPLAY_RATE_MM_PER_SEC
    }
    pub fn report_interval_secs() -> f64 {
        integrity::DEFAULT_REPORT_INTERVAL_SECS
    }
    pub fn fidelity_epsilon() -> f64 {
        integrity::DEFAULT_FIDELITY_EPSILON
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: defaults::tick_interval_ms(),
            display_rate_mm_per_sec: defaults::display_rate_mm_per_sec(),
        }
    }
}

impl Default for IntegrityConfig {
    fn default() -> Self {
        Self {
            report_interval_secs: defaults::report_interval_secs(),
            fidelity_epsilon: defaults::fidelity_epsilon(),
        }
    }
}

impl SessionConfig {
    /// Validate configuration consistency
    pub fn validate_consistency(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.playback.tick_interval_ms < playback::MIN_TICK_INTERVAL_MS
            || self.playback.tick_interval_ms > playback::MAX_TICK_INTERVAL_MS
        {
            errors.push(format!(
                "Tick interval {} ms outside supported range {}..={} ms",
                self.playback.tick_interval_ms,
                playback::MIN_TICK_INTERVAL_MS,
                playback::MAX_TICK_INTERVAL_MS
            ));
        }

        if self.playback.display_rate_mm_per_sec <= 0.0 {
            errors.push(format!(
                "Display rate must be positive, got {} mm/sec",
                self.playback.display_rate_mm_per_sec
            ));
        }

        if self.integrity.report_interval_secs < integrity::MIN_REPORT_INTERVAL_SECS {
            errors.push(format!(
                "Report interval {} s below minimum {} s",
                self.integrity.report_interval_secs,
                integrity::MIN_REPORT_INTERVAL_SECS
            ));
        }

        if self.integrity.fidelity_epsilon < 0.0 {
            errors.push("Fidelity epsilon must be non-negative".to_string());
        }

        for window in &self.detection.windows {
            if window.stop_seconds <= window.start_seconds {
                errors.push(format!(
                    "Condition window '{}' stops at {} s before it starts at {} s",
                    window.label, window.stop_seconds, window.start_seconds
                ));
            }
            if window.start_seconds < 0.0 {
                errors.push(format!(
                    "Condition window '{}' starts before the recording",
                    window.label
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Speed multiplier implied by the configured display rate
    pub fn speed_multiplier(&self) -> f64 {
        self.playback.display_rate_mm_per_sec / playback::REFERENCE_DISPLAY_RATE_MM_PER_SEC
    }
}

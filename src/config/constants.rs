// src/config/constants.rs
//! System-wide configuration constants

/// Recording and signal constraints
pub mod signal {
    pub const MIN_SAMPLE_RATE_HZ: f64 = 1.0;
    pub const MAX_SAMPLE_RATE_HZ: f64 = 10_000.0;
    pub const MAX_CHANNEL_COUNT: usize = 256;
    pub const MIN_CHANNEL_COUNT: usize = 1;

    pub const DEFAULT_SAMPLE_RATE_HZ: f64 = 256.0;
    pub const DEFAULT_CHANNEL_COUNT: usize = 8;
}

/// Playback timing constants
pub mod playback {
    /// Fixed tick interval driving the timebase. Actual cursor advancement
    /// uses measured elapsed wall time, so jitter in the driver does not
    /// accumulate as drift.
    pub const DEFAULT_TICK_INTERVAL_MS: u64 = 250;
    pub const MIN_TICK_INTERVAL_MS: u64 = 100;
    pub const MAX_TICK_INTERVAL_MS: u64 = 500;

    /// Display convention: 30 mm/sec of chart paper corresponds to 1x speed.
    pub const REFERENCE_DISPLAY_RATE_MM_PER_SEC: f64 = 30.0;
    pub const DEFAULT_DISPLAY_RATE_MM_PER_SEC: f64 = 30.0;

    pub const MIN_SPEED_MULTIPLIER: f64 = 0.01;
    pub const MAX_SPEED_MULTIPLIER: f64 = 100.0;
}

/// Data integrity monitoring constants
pub mod integrity {
    /// Periodic report cadence, in recording seconds (not wall seconds).
    pub const DEFAULT_REPORT_INTERVAL_SECS: f64 = 5.0;
    pub const MIN_REPORT_INTERVAL_SECS: f64 = 0.5;

    /// Tolerance for the fidelity check, loose enough to absorb reasonable
    /// reformatting of the source values.
    pub const DEFAULT_FIDELITY_EPSILON: f64 = 1e-9;
}

/// Synthetic recording generation constants
pub mod synthetic {
    pub const DEFAULT_AMPLITUDE_MICROVOLTS: f64 = 50.0;
    pub const DEFAULT_BASE_FREQUENCY_HZ: f64 = 10.0;
    pub const DEFAULT_NOISE_AMPLITUDE_MICROVOLTS: f64 = 5.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_bounds_ordered() {
        assert!(playback::MIN_TICK_INTERVAL_MS <= playback::DEFAULT_TICK_INTERVAL_MS);
        assert!(playback::DEFAULT_TICK_INTERVAL_MS <= playback::MAX_TICK_INTERVAL_MS);
    }

    #[test]
    fn test_reference_display_rate_is_unity() {
        // 30 mm/sec must map to a 1.0x multiplier
        assert_eq!(
            playback::DEFAULT_DISPLAY_RATE_MM_PER_SEC / playback::REFERENCE_DISPLAY_RATE_MM_PER_SEC,
            1.0
        );
    }
}

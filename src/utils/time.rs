// src/utils/time.rs
//! Clock abstraction for drift-free tick accounting
//!
//! Every component that measures elapsed wall time goes through
//! [`TimeProvider`] so that playback advances by *measured* elapsed time
//! rather than the nominal tick duration, and so tests can drive the clock
//! deterministically.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Nanoseconds per second, for cursor arithmetic.
pub const NANOS_PER_SECOND: f64 = 1_000_000_000.0;

/// Time provider trait for dependency injection and testing
pub trait TimeProvider: Send + Sync {
    fn now_nanos(&self) -> u64;

    /// Seconds between two instants taken from this provider.
    fn elapsed_seconds(&self, since_nanos: u64) -> f64 {
        self.now_nanos().saturating_sub(since_nanos) as f64 / NANOS_PER_SECOND
    }
}

/// System time provider using the actual system clock
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now_nanos(&self) -> u64 {
        current_timestamp_nanos()
    }
}

/// Mock time provider for deterministic testing
pub struct MockTimeProvider {
    current_time: AtomicU64,
}

impl MockTimeProvider {
    pub fn new(initial_time_nanos: u64) -> Self {
        Self {
            current_time: AtomicU64::new(initial_time_nanos),
        }
    }

    pub fn advance_by(&self, nanos: u64) {
        self.current_time.fetch_add(nanos, Ordering::Relaxed);
    }

    /// Advance the mock clock by a fractional number of seconds.
    pub fn advance_seconds(&self, seconds: f64) {
        self.advance_by((seconds * NANOS_PER_SECOND) as u64);
    }

    pub fn set_time(&self, nanos: u64) {
        self.current_time.store(nanos, Ordering::Relaxed);
    }
}

impl TimeProvider for MockTimeProvider {
    fn now_nanos(&self) -> u64 {
        self.current_time.load(Ordering::Relaxed)
    }
}

/// Centralized timestamp utility
pub fn current_timestamp_nanos() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64
}

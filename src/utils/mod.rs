//! Common utilities for the playback core
//!
//! Currently limited to time management: the injectable clock that keeps
//! tick accounting drift-free and tests deterministic.

pub mod time;

pub use time::{
    current_timestamp_nanos, MockTimeProvider, SystemTimeProvider, TimeProvider, NANOS_PER_SECOND,
};

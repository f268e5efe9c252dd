// src/monitor/mod.rs
//! Observers of the tick stream: integrity validation and event detection

pub mod detector;
pub mod integrity;

pub use detector::{EventKind, IschemiaDetector, IschemiaEvent};
pub use integrity::{IntegrityCounters, IntegrityMonitor, IntegrityReport, IntegritySummary};

// src/playback/driver.rs
//! Thread-based tick driver
//!
//! Runs a shared session at its configured tick cadence on a dedicated
//! thread. Sleep jitter is harmless because the timebase advances by measured
//! elapsed time; the interval only controls batch granularity. The session
//! mutex is held for exactly one tick at a time, so controls (`stop`,
//! `set_speed`) interleave between ticks, never inside one.

use crate::playback::PlaybackSession;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

/// Drives `PlaybackSession::tick` on a background thread.
pub struct TickDriver {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl TickDriver {
    /// Start ticking the session until it stops streaming or the driver is
    /// shut down. The session should already be started.
    pub fn spawn(session: Arc<Mutex<PlaybackSession>>) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let flag = running.clone();

        let handle = std::thread::spawn(move || {
            let interval = session.lock().tick_interval();
            while flag.load(Ordering::Relaxed) {
                std::thread::sleep(interval);
                let mut session = session.lock();
                session.tick();
                if !session.is_streaming() {
                    break;
                }
            }
            tracing::debug!("tick driver exiting");
        });

        Self {
            running,
            handle: Some(handle),
        }
    }

    /// Stop ticking and wait for the driver thread to exit. The session
    /// itself is left as-is; call `PlaybackSession::stop` to finalize it.
    pub fn shutdown(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for TickDriver {
    fn drop(&mut self) {
        self.shutdown();
    }
}

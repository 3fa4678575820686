//! Ticker Actor: dedicated thread generating frame ticks.
//!
//! The driver selects on the tick receiver and hands each tick to the
//! stream when a frame is pending. Ticks are dropped rather than queued
//! when the driver falls behind, so a slow consumer never sees a burst of
//! stale frames.

use crate::error::StreamError;
use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// A tick event sent at regular intervals.
#[derive(Debug, Clone, Copy)]
pub struct Tick {
    /// Frame number (monotonically increasing).
    pub frame: u64,
    /// When the tick was produced.
    pub at: Instant,
}

/// Ticker actor that generates regular timing events.
pub struct TickerActor {
    /// Handle to the ticker thread.
    handle: Option<JoinHandle<()>>,
    /// Flag to signal shutdown.
    shutdown: Arc<AtomicBool>,
    /// Receiver for tick events.
    tick_rx: Receiver<Tick>,
}

impl TickerActor {
    /// Spawn a ticker with the given interval (16ms for ~60 FPS).
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Spawn`] if the OS refuses the thread.
    pub fn spawn(interval: Duration) -> Result<Self, StreamError> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        // Small buffer: ticks must not queue up.
        let (tick_tx, tick_rx) = bounded(2);

        let handle = thread::Builder::new()
            .name("inkflow-ticker".to_string())
            .spawn(move || {
                Self::run_loop(&tick_tx, &shutdown_clone, interval);
            })
            .map_err(|source| StreamError::Spawn {
                name: "inkflow-ticker",
                source,
            })?;

        Ok(Self {
            handle: Some(handle),
            shutdown,
            tick_rx,
        })
    }

    /// The tick receiver, for use with `select!`.
    #[inline]
    pub const fn receiver(&self) -> &Receiver<Tick> {
        &self.tick_rx
    }

    /// Signal the ticker to shutdown.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Wait for the ticker thread to finish.
    pub fn join(mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    fn run_loop(tick_tx: &Sender<Tick>, shutdown: &AtomicBool, interval: Duration) {
        let mut frame = 0u64;
        let mut next_tick = Instant::now() + interval;

        while !shutdown.load(Ordering::Relaxed) {
            let now = Instant::now();
            if now < next_tick {
                thread::sleep((next_tick - now).min(Duration::from_millis(1)));
                continue;
            }

            // Full buffer means the driver is busy; skip this tick.
            let _ = tick_tx.try_send(Tick { frame, at: now });

            frame += 1;
            next_tick += interval;
            if next_tick < now {
                next_tick = now + interval;
            }
        }
        tracing::trace!(frames = frame, "ticker stopped");
    }
}

impl Drop for TickerActor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

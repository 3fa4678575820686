//! Pacing Scheduler: how far the display cursor moves and when.
//!
//! Two strategies share one interface:
//!
//! - **Realtime** snaps the cursor to the end of the target on every
//!   accepted update. Sources that already pace themselves token by token
//!   need nothing more.
//! - **Burst-smoothed** runs a frame loop that doses characters out at a
//!   fractional rate. Small backlogs bypass the loop and apply instantly so
//!   only genuinely large bursts are smoothed.
//!
//! The frame loop itself lives in the stream; this module owns the math.

use super::config::{PacingMode, RevealConfig};
use std::time::{Duration, Instant};

/// Characters per second contributed by one unit of `speed`.
pub const CHARS_PER_SPEED_UNIT: f64 = 6.0;

/// Window (in ms) at which the window factor is exactly 1.
const REFERENCE_WINDOW_MS: f64 = 120.0;

/// Shortest window considered when deriving the window factor.
const MIN_WINDOW_MS: f64 = 40.0;

/// Scale applied to the reveal rate for a smoothing window.
pub fn window_factor(window: Duration) -> f64 {
    let ms = (window.as_secs_f64() * 1000.0).max(MIN_WINDOW_MS);
    (REFERENCE_WINDOW_MS / ms).clamp(0.6, 1.8)
}

/// Reveal rate in chars per second.
pub fn reveal_rate(config: &RevealConfig) -> f64 {
    let speed = if config.speed.is_nan() {
        1.0
    } else {
        config.speed.clamp(1.0, 100.0)
    };
    speed * CHARS_PER_SPEED_UNIT * window_factor(config.smoothing_window)
}

/// What an update should do to the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Move the cursor to the end of the target now.
    Snap,
    /// Reveal through the frame loop.
    Smooth,
}

/// Choose how to reveal a backlog of `backlog` chars.
pub const fn plan(config: &RevealConfig, backlog: usize, loop_active: bool) -> Advance {
    match config.mode {
        PacingMode::Realtime => Advance::Snap,
        PacingMode::BurstSmoothed => {
            if loop_active || backlog > config.burst_threshold {
                Advance::Smooth
            } else {
                Advance::Snap
            }
        }
    }
}

/// Frame clock bookkeeping for one smoothing run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameClockState {
    last_tick: Option<Instant>,
    carry: f64,
}

impl FrameClockState {
    /// Fresh state.
    pub const fn new() -> Self {
        Self {
            last_tick: None,
            carry: 0.0,
        }
    }

    /// Forget the previous run; the next tick has `dt = 0`.
    pub const fn begin_run(&mut self) {
        self.last_tick = None;
        self.carry = 0.0;
    }

    /// Fractional chars currently owed (may be negative after a forced step).
    #[inline]
    pub const fn carry(&self) -> f64 {
        self.carry
    }

    /// Time of the previous tick in this run.
    #[inline]
    pub const fn last_tick(&self) -> Option<Instant> {
        self.last_tick
    }

    /// Compute how many chars the tick at `now` reveals.
    ///
    /// At least one char is revealed per tick. The full floor of the carry
    /// is subtracted before the `cap` is applied, so capping does not
    /// distort the fractional ledger.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    pub fn step(&mut self, now: Instant, rate: f64, cap: usize) -> usize {
        let dt = self
            .last_tick
            .map_or(Duration::ZERO, |prev| now.saturating_duration_since(prev));
        self.last_tick = Some(now);

        self.carry += dt.as_secs_f64() * rate;
        let mut raw = self.carry.floor();
        if raw <= 0.0 || raw.is_nan() {
            raw = 1.0;
        }
        self.carry -= raw;

        let raw = if raw >= usize::MAX as f64 {
            usize::MAX
        } else {
            raw as usize
        };
        raw.min(cap.max(1))
    }
}

/// Observability counters; reset with the stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Metrics {
    /// Number of frame loops started.
    pub smoothing_activations: u64,
    /// Chars revealed by frame ticks.
    pub smoothed_chars: u64,
    /// Updates applied by snapping to the target.
    pub instant_updates: u64,
}

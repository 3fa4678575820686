//! Completion Detector: "no more input is imminent".
//!
//! Catching up with the current target does not mean the source is done.
//! Each catch-up (re)arms a settle timer; growth before it fires disarms
//! it. When it does fire, completion is reported exactly once until the
//! detector is reset.

use crate::clock::{DelayTimer, TimerId};
use std::time::Duration;

/// Settle-timer state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompletionDetector {
    armed: Option<TimerId>,
    fired: bool,
}

impl CompletionDetector {
    /// Fresh detector.
    pub const fn new() -> Self {
        Self {
            armed: None,
            fired: false,
        }
    }

    /// Whether a settle timer is pending.
    #[inline]
    pub const fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Whether completion has been signaled.
    #[inline]
    pub const fn has_fired(&self) -> bool {
        self.fired
    }

    /// (Re)arm the settle timer, replacing any pending one.
    ///
    /// Returns `false` without scheduling anything once completion fired.
    pub fn arm<T: DelayTimer + ?Sized>(&mut self, timer: &mut T, delay: Duration) -> bool {
        if self.fired {
            return false;
        }
        self.disarm(timer);
        self.armed = Some(timer.schedule(delay));
        true
    }

    /// Cancel a pending settle timer.
    pub fn disarm<T: DelayTimer + ?Sized>(&mut self, timer: &mut T) {
        if let Some(id) = self.armed.take() {
            timer.cancel(id);
        }
    }

    /// Handle a fired timer. Returns `true` if this is the completion.
    pub fn on_timer(&mut self, id: TimerId) -> bool {
        if self.fired || self.armed != Some(id) {
            return false;
        }
        self.armed = None;
        self.fired = true;
        true
    }

    /// Cancel any pending timer and allow completion to fire again.
    pub fn reset<T: DelayTimer + ?Sized>(&mut self, timer: &mut T) {
        self.disarm(timer);
        self.fired = false;
    }
}

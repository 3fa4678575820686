//! Wall-clock scheduler for the driver thread.
//!
//! Frame requests are satisfied by the next ticker tick; timers are plain
//! deadlines the driver waits on with `crossbeam_channel::at`.

use crate::clock::{DelayTimer, FrameClock, FrameId, TimerId};
use std::time::{Duration, Instant};

/// [`FrameClock`] and [`DelayTimer`] backed by real time.
#[derive(Debug, Default)]
pub struct ThreadScheduler {
    next_id: u64,
    frame: Option<FrameId>,
    timers: Vec<(TimerId, Instant)>,
}

impl ThreadScheduler {
    /// Create an empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the pending frame request, if any.
    pub fn take_frame(&mut self) -> Option<FrameId> {
        self.frame.take()
    }

    /// Earliest pending timer deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.iter().map(|&(_, deadline)| deadline).min()
    }

    /// Remove and return timers due at `now`, earliest first.
    pub fn take_due(&mut self, now: Instant) -> Vec<TimerId> {
        let mut due: Vec<(TimerId, Instant)> = Vec::new();
        self.timers.retain(|&(id, deadline)| {
            if deadline <= now {
                due.push((id, deadline));
                false
            } else {
                true
            }
        });
        due.sort_by_key(|&(_, deadline)| deadline);
        due.into_iter().map(|(id, _)| id).collect()
    }

    fn next_raw(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl FrameClock for ThreadScheduler {
    fn request_frame(&mut self) -> FrameId {
        let id = FrameId::new(self.next_raw());
        self.frame = Some(id);
        id
    }

    fn cancel_frame(&mut self, id: FrameId) {
        if self.frame == Some(id) {
            self.frame = None;
        }
    }
}

impl DelayTimer for ThreadScheduler {
    fn schedule(&mut self, delay: Duration) -> TimerId {
        let id = TimerId::new(self.next_raw());
        self.timers.push((id, Instant::now() + delay));
        id
    }

    fn cancel(&mut self, id: TimerId) {
        self.timers.retain(|&(timer, _)| timer != id);
    }
}

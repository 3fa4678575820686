//! Manual scheduler: virtual time for tests and host-driven loops.

use super::{DelayTimer, FrameClock, FrameId, TimerId};
use std::time::{Duration, Instant};

/// A scheduler whose clock only moves when told to.
///
/// Frame requests and timers are recorded; the owner advances virtual
/// time and delivers due callbacks itself.
#[derive(Debug, Clone)]
pub struct ManualScheduler {
    now: Instant,
    next_id: u64,
    frames: Vec<FrameId>,
    timers: Vec<(TimerId, Instant)>,
    frames_requested: u64,
    timers_scheduled: u64,
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualScheduler {
    /// Create a scheduler whose virtual clock starts now.
    pub fn new() -> Self {
        Self {
            now: Instant::now(),
            next_id: 0,
            frames: Vec::new(),
            timers: Vec::new(),
            frames_requested: 0,
            timers_scheduled: 0,
        }
    }

    /// Current virtual time.
    #[inline]
    pub const fn now(&self) -> Instant {
        self.now
    }

    /// Move virtual time forward.
    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }

    /// Take the oldest pending frame request.
    pub fn take_frame(&mut self) -> Option<FrameId> {
        if self.frames.is_empty() {
            None
        } else {
            Some(self.frames.remove(0))
        }
    }

    /// Remove and return every timer whose deadline has passed, earliest first.
    pub fn take_due_timers(&mut self) -> Vec<TimerId> {
        let now = self.now;
        let mut due: Vec<(TimerId, Instant)> = Vec::new();
        self.timers.retain(|&(id, deadline)| {
            if deadline <= now {
                due.push((id, deadline));
                false
            } else {
                true
            }
        });
        due.sort_by_key(|&(id, deadline)| (deadline, id));
        due.into_iter().map(|(id, _)| id).collect()
    }

    /// Deadline of the earliest pending timer.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.iter().map(|&(_, deadline)| deadline).min()
    }

    /// Number of frame requests not yet taken or cancelled.
    pub fn pending_frames(&self) -> usize {
        self.frames.len()
    }

    /// Number of timers not yet fired or cancelled.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Total frame requests ever made.
    pub const fn frames_requested(&self) -> u64 {
        self.frames_requested
    }

    /// Total timers ever scheduled.
    pub const fn timers_scheduled(&self) -> u64 {
        self.timers_scheduled
    }

    fn next_raw(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl FrameClock for ManualScheduler {
    fn request_frame(&mut self) -> FrameId {
        let id = FrameId::new(self.next_raw());
        self.frames.push(id);
        self.frames_requested += 1;
        id
    }

    fn cancel_frame(&mut self, id: FrameId) {
        self.frames.retain(|&pending| pending != id);
    }
}

impl DelayTimer for ManualScheduler {
    fn schedule(&mut self, delay: Duration) -> TimerId {
        let id = TimerId::new(self.next_raw());
        self.timers.push((id, self.now + delay));
        self.timers_scheduled += 1;
        id
    }

    fn cancel(&mut self, id: TimerId) {
        self.timers.retain(|&(pending, _)| pending != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_are_fifo() {
        let mut sched = ManualScheduler::new();
        let a = sched.request_frame();
        let b = sched.request_frame();
        assert_eq!(sched.pending_frames(), 2);
        assert_eq!(sched.take_frame(), Some(a));
        assert_eq!(sched.take_frame(), Some(b));
        assert_eq!(sched.take_frame(), None);
        assert_eq!(sched.frames_requested(), 2);
    }

    #[test]
    fn test_cancel_frame() {
        let mut sched = ManualScheduler::new();
        let a = sched.request_frame();
        sched.cancel_frame(a);
        assert_eq!(sched.take_frame(), None);
    }

    #[test]
    fn test_timers_fire_when_due() {
        let mut sched = ManualScheduler::new();
        let late = sched.schedule(Duration::from_millis(200));
        let early = sched.schedule(Duration::from_millis(100));
        sched.advance(Duration::from_millis(99));
        assert!(sched.take_due_timers().is_empty());
        sched.advance(Duration::from_millis(150));
        assert_eq!(sched.take_due_timers(), vec![early, late]);
        assert_eq!(sched.pending_timers(), 0);
    }

    #[test]
    fn test_cancel_timer() {
        let mut sched = ManualScheduler::new();
        let id = sched.schedule(Duration::from_millis(10));
        sched.cancel(id);
        sched.advance(Duration::from_secs(1));
        assert!(sched.take_due_timers().is_empty());
        assert_eq!(sched.timers_scheduled(), 1);
    }
}

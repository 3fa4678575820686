//! Host capabilities: frame clock and delay timer.
//!
//! The reveal engine never calls a global timer. It asks an injected
//! [`Scheduler`] for "next frame" and "after delay" callbacks and receives
//! them back as [`TypewriterStream::on_frame`] and
//! [`TypewriterStream::on_timer`] calls carrying the issued id. Ids that
//! were cancelled or superseded are ignored by the stream, so a host may
//! deliver late callbacks without harm.
//!
//! [`TypewriterStream::on_frame`]: crate::reveal::TypewriterStream::on_frame
//! [`TypewriterStream::on_timer`]: crate::reveal::TypewriterStream::on_timer

mod manual;

pub use manual::ManualScheduler;

use std::time::Duration;

/// Identifier of a requested frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(u64);

impl FrameId {
    /// Create a frame id from a raw value.
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw value.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Identifier of a scheduled delay callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    /// Create a timer id from a raw value.
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw value.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Schedules "next frame" callbacks.
pub trait FrameClock {
    /// Request one callback on the next frame.
    fn request_frame(&mut self) -> FrameId;

    /// Cancel a pending frame callback. Unknown ids are ignored.
    fn cancel_frame(&mut self, id: FrameId);
}

/// Schedules delayed callbacks.
pub trait DelayTimer {
    /// Request one callback after `delay`.
    fn schedule(&mut self, delay: Duration) -> TimerId;

    /// Cancel a pending delayed callback. Unknown ids are ignored.
    fn cancel(&mut self, id: TimerId);
}

/// Everything a stream needs from its host.
pub trait Scheduler: FrameClock + DelayTimer + Send {}

impl<T: FrameClock + DelayTimer + Send> Scheduler for T {}

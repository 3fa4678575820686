//! Change notifications drained by hosts after each call into a stream.

use bitflags::bitflags;

bitflags! {
    /// What changed since the last [`take_events`](super::TypewriterStream::take_events).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StreamEvents: u8 {
        /// The visible text changed.
        const TEXT_CHANGED = 0b0000_0001;
        /// The fade segment list was recomputed.
        const SEGMENTS_CHANGED = 0b0000_0010;
        /// Completion was signaled.
        const COMPLETED = 0b0000_0100;
        /// An error was forwarded to the error channel.
        const ERROR = 0b0000_1000;
        /// The lifecycle state changed.
        const STATE_CHANGED = 0b0001_0000;
    }
}

impl StreamEvents {
    /// Whether a host needs to redraw.
    #[inline]
    pub const fn needs_redraw(self) -> bool {
        self.intersects(Self::TEXT_CHANGED.union(Self::SEGMENTS_CHANGED))
    }
}

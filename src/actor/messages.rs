//! Message types for driver communication.
//!
//! [`Control`] flows from the host into the driver thread, [`RevealEvent`]
//! flows back out.

use crate::reveal::StreamState;
use crate::source::{Push, Source};
use crate::text::Segment;

/// Commands sent to the driver thread.
#[derive(Debug)]
pub enum Control {
    /// Begin a new lifecycle consuming the source.
    Start(Source),

    /// Snapshot of the full target text.
    Update(String),

    /// A tagged push applied to the current lifecycle.
    Push(Push),

    /// Halt revealing.
    Pause,

    /// Continue after a pause.
    Resume,

    /// Reveal the whole target now.
    SkipToEnd,

    /// Clear everything and return to Idle.
    Reset,

    /// Stop the driver thread.
    Shutdown,
}

/// Events published by the driver thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevealEvent {
    /// The visible text changed.
    Text {
        /// Currently revealed text.
        visible: String,
        /// Display cursor, in chars.
        cursor: usize,
        /// Target length, in chars.
        target_len: usize,
    },

    /// Fade segments of the visible text changed.
    Segments(Vec<Segment>),

    /// The lifecycle state changed.
    State(StreamState),

    /// The stream settled. Sent once per lifecycle.
    Completed,

    /// A source or segmentation failure.
    Error(String),
}

impl RevealEvent {
    /// Whether this is the completion signal.
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

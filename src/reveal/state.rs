//! Lifecycle states of a reveal stream.

/// Lifecycle state of a [`TypewriterStream`](super::TypewriterStream).
///
/// ```text
/// Idle ──start/update──▶ Streaming ◀──resume── Paused
///   ▲                       │  └────pause────────▲
///   │                       ▼
///   └──────reset───────  Completed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StreamState {
    /// Nothing started, or reset.
    #[default]
    Idle,
    /// Consuming input and revealing.
    Streaming,
    /// Reveal halted; input is still accepted.
    Paused,
    /// Completion was signaled.
    Completed,
}

impl StreamState {
    /// Whether the cursor may advance in this state.
    #[inline]
    pub const fn is_revealing(self) -> bool {
        matches!(self, Self::Streaming | Self::Completed)
    }

    /// Whether a lifecycle is in progress.
    #[inline]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Streaming | Self::Paused)
    }
}

//! # Inkflow
//!
//! A cancellable, self-correcting typewriter reveal for streamed text.
//!
//! Inkflow progressively reveals text that arrives over time (model
//! tokens, chunked network responses, live-edited snapshots) at a
//! controlled pace, and signals completion once the text has settled.
//!
//! ## Core Concepts
//!
//! - **Diff resolution**: every new target is classified as append,
//!   identical or divergent against the previous one; divergence rolls the
//!   cursor back to the common prefix instead of showing stale text
//! - **Pacing**: realtime snaps to the target; burst-smoothed reveals large
//!   backlogs over frames with a per-frame cap
//! - **Settle detection**: completion fires once, after the text stops
//!   growing for a settle window
//! - **Unified input**: snapshots, push handles and async chunk streams all
//!   become tagged pushes on one channel
//! - **Actor model**: an optional driver thread owns the stream and talks
//!   to the host over channels
//!
//! ## Example
//!
//! ```rust
//! use inkflow::{RevealConfig, StreamState, TypewriterStream};
//! use std::time::Duration;
//!
//! let mut stream = TypewriterStream::manual(RevealConfig::default());
//! stream.update("Hello");
//! stream.update("Hello, world!");
//! assert_eq!(stream.visible_text(), "Hello, world!");
//!
//! // Let the settle window elapse on the virtual clock.
//! stream.scheduler_mut().advance(Duration::from_millis(140));
//! for id in stream.scheduler_mut().take_due_timers() {
//!     stream.on_timer(id);
//! }
//! assert_eq!(stream.state(), StreamState::Completed);
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod actor;
pub mod clock;
pub mod error;
pub mod reveal;
pub mod source;
pub mod text;

// Re-exports for convenience
pub use actor::{Control, Driver, DriverConfig, RevealEvent, ThreadScheduler};
pub use clock::{DelayTimer, FrameClock, FrameId, ManualScheduler, Scheduler, TimerId};
pub use error::{BoxError, SegmentationError, StreamError};
pub use reveal::{
    FadeConfig, Metrics, PacingMode, RevealConfig, StreamEvents, StreamState, TypewriterStream,
};
pub use source::{Push, PushHandle, Source};
pub use text::{classify, ChangeKind, Classification, Segment, UnicodeWordSegmenter, WordSegmenter};

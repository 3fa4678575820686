//! Source Adapter: normalize every input shape into tagged pushes.
//!
//! Three input shapes feed a stream:
//!
//! 1. **Snapshot**: the caller re-supplies the full text on each update
//!    (`TypewriterStream::update`), which becomes a [`Push::Replace`].
//! 2. **Push handle**: a producer on any thread sends replacements or
//!    deltas through a [`PushHandle`].
//! 3. **Chunks**: an asynchronous pull-based sequence consumed by a
//!    [`FeederActor`], each chunk becoming a [`Push::Delta`].
//!
//! All three run through the same diff/pacing path in the stream, so
//! pause, resume and smoothing behave identically for every shape.

mod feeder;
mod push;

pub use feeder::{FeedOutcome, FeederActor};
pub use push::{ChunkStream, Push, PushHandle, Source};

pub(crate) use push::{Envelope, SourceEvent};

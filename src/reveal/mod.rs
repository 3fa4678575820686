//! The reveal engine: pacing, completion detection and the stream
//! lifecycle built on top of them.
//!
//! [`TypewriterStream`] is the entry point. The remaining modules are the
//! pieces it composes, exposed for hosts that want to drive their own
//! loop.

pub mod completion;
pub mod config;
pub mod events;
pub mod pacing;
pub mod state;
mod stream;

pub use completion::CompletionDetector;
pub use config::{FadeConfig, PacingMode, RevealConfig};
pub use events::StreamEvents;
pub use pacing::{Advance, FrameClockState, Metrics};
pub use state::StreamState;
pub use stream::TypewriterStream;

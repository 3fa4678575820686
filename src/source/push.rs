//! The unified push channel.
//!
//! Every input shape ends up here: snapshot values become
//! [`Push::Replace`], chunk sequences become [`Push::Delta`]. Envelopes
//! carry the generation of the lifecycle that produced them so the stream
//! can drop pushes from producers that outlived a `start()` or `reset()`.

use crate::error::BoxError;
use crossbeam_channel::Sender;
use futures::stream::{BoxStream, Stream, StreamExt};
use std::fmt;

/// One tagged text update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Push {
    /// The full new target text.
    Replace(String),
    /// Text appended to the current target.
    Delta(String),
}

/// What a producer delivered.
#[derive(Debug)]
pub(crate) enum SourceEvent {
    Push(Push),
    /// The producer has nothing more to send.
    End,
    /// The producer failed; nothing more will follow.
    Failed(BoxError),
}

/// A source event stamped with its lifecycle generation.
#[derive(Debug)]
pub(crate) struct Envelope {
    pub(crate) generation: u64,
    pub(crate) event: SourceEvent,
}

/// Cloneable producer handle bound to one lifecycle of a stream.
///
/// Sends never block. After the stream is reset or restarted, pushes from
/// this handle are silently discarded.
#[derive(Debug, Clone)]
pub struct PushHandle {
    tx: Sender<Envelope>,
    generation: u64,
}

impl PushHandle {
    pub(crate) const fn new(tx: Sender<Envelope>, generation: u64) -> Self {
        Self { tx, generation }
    }

    /// Lifecycle generation this handle belongs to.
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Send a push. Returns `false` if the stream is gone.
    pub fn push(&self, push: Push) -> bool {
        self.send(SourceEvent::Push(push))
    }

    /// Replace the whole target.
    pub fn replace(&self, text: impl Into<String>) -> bool {
        self.push(Push::Replace(text.into()))
    }

    /// Append to the target.
    pub fn append(&self, delta: impl Into<String>) -> bool {
        self.push(Push::Delta(delta.into()))
    }

    /// Signal that no more pushes will follow.
    pub fn finish(&self) -> bool {
        self.send(SourceEvent::End)
    }

    /// Report a producer failure; completion is still scheduled.
    pub fn fail<E: Into<BoxError>>(&self, err: E) -> bool {
        self.send(SourceEvent::Failed(err.into()))
    }

    fn send(&self, event: SourceEvent) -> bool {
        self.tx
            .send(Envelope {
                generation: self.generation,
                event,
            })
            .is_ok()
    }
}

/// Ordered, pull-based sequence of text chunks.
pub type ChunkStream = BoxStream<'static, Result<String, BoxError>>;

/// Input a stream consumes after `start()`.
pub enum Source {
    /// Caller-driven: `update()` calls and [`PushHandle`]s.
    Snapshot,
    /// An asynchronous chunk sequence consumed on a feeder thread.
    Chunks(ChunkStream),
}

impl Source {
    /// Wrap any chunk stream.
    pub fn chunks<S, T, E>(stream: S) -> Self
    where
        S: Stream<Item = Result<T, E>> + Send + 'static,
        T: Into<String>,
        E: Into<BoxError>,
    {
        Self::Chunks(stream.map(|item| item.map(Into::into).map_err(Into::into)).boxed())
    }

    /// Whether this source is consumed asynchronously.
    pub const fn is_chunks(&self) -> bool {
        matches!(self, Self::Chunks(_))
    }
}

impl Default for Source {
    fn default() -> Self {
        Self::Snapshot
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Snapshot => f.write_str("Source::Snapshot"),
            Self::Chunks(_) => f.write_str("Source::Chunks(..)"),
        }
    }
}

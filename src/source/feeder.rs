//! Feeder Actor: dedicated thread consuming an asynchronous chunk source.
//!
//! The feeder pulls chunks in order and forwards each as a delta push to
//! the owning stream. It never touches stream state directly. Cancelling
//! its token interrupts a pending pull, so a restarted stream never has
//! two live consumers.

use super::push::{ChunkStream, Envelope, Push, SourceEvent};
use crate::error::StreamError;
use crossbeam_channel::Sender;
use futures::future::{select, Either};
use futures::StreamExt;
use std::pin::pin;
use std::thread::{self, JoinHandle};
use tokio_util::sync::CancellationToken;

/// How a chunk consumption ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedOutcome {
    /// The source ran out of chunks.
    Exhausted,
    /// The source yielded an error.
    Failed,
    /// The token was cancelled.
    Cancelled,
    /// The stream dropped its receiving end.
    Disconnected,
}

/// Pull every chunk from `chunks` and forward it, in order.
///
/// Each chunk is sent before the next one is awaited.
pub(crate) async fn consume(
    mut chunks: ChunkStream,
    tx: &Sender<Envelope>,
    generation: u64,
    token: &CancellationToken,
) -> FeedOutcome {
    let mut cancelled = pin!(token.cancelled());
    let mut chunk_count = 0u64;

    loop {
        let next = match select(cancelled.as_mut(), chunks.next()).await {
            Either::Left(((), _)) => {
                tracing::debug!(generation, chunk_count, "chunk consumption cancelled");
                return FeedOutcome::Cancelled;
            }
            Either::Right((next, _)) => next,
        };

        if token.is_cancelled() {
            return FeedOutcome::Cancelled;
        }

        let (event, outcome) = match next {
            Some(Ok(chunk)) => {
                chunk_count += 1;
                tracing::trace!(generation, len = chunk.len(), "chunk received");
                (SourceEvent::Push(Push::Delta(chunk)), None)
            }
            Some(Err(err)) => {
                tracing::warn!(generation, error = %err, "chunk source failed");
                (SourceEvent::Failed(err), Some(FeedOutcome::Failed))
            }
            None => {
                tracing::debug!(generation, chunk_count, "chunk source exhausted");
                (SourceEvent::End, Some(FeedOutcome::Exhausted))
            }
        };

        if tx.send(Envelope { generation, event }).is_err() {
            return FeedOutcome::Disconnected;
        }
        if let Some(outcome) = outcome {
            return outcome;
        }
    }
}

/// Feeder actor that consumes one chunk source on its own thread.
pub struct FeederActor {
    /// Handle to the feeder thread.
    handle: Option<JoinHandle<FeedOutcome>>,
    /// Cancels the consumption.
    token: CancellationToken,
}

impl FeederActor {
    /// Spawn a feeder for `chunks`, stamping pushes with `generation`.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Spawn`] if the OS refuses the thread.
    pub(crate) fn spawn(
        chunks: ChunkStream,
        tx: Sender<Envelope>,
        generation: u64,
    ) -> Result<Self, StreamError> {
        let token = CancellationToken::new();
        let child = token.clone();

        let handle = thread::Builder::new()
            .name("inkflow-feeder".to_string())
            .spawn(move || futures::executor::block_on(consume(chunks, &tx, generation, &child)))
            .map_err(|source| StreamError::Spawn {
                name: "inkflow-feeder",
                source,
            })?;

        Ok(Self {
            handle: Some(handle),
            token,
        })
    }

    /// Signal the feeder to stop.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Whether the feeder thread has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Wait for the feeder thread to finish.
    pub fn join(mut self) -> Option<FeedOutcome> {
        self.handle.take().and_then(|handle| handle.join().ok())
    }
}

impl Drop for FeederActor {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoxError;
    use crate::source::Source;
    use crossbeam_channel::unbounded;
    use futures::executor::block_on;
    use futures::stream;
    use std::time::Duration;

    fn chunk_stream(source: Source) -> ChunkStream {
        match source {
            Source::Chunks(chunks) => chunks,
            Source::Snapshot => unreachable!(),
        }
    }

    fn deltas(rx: &crossbeam_channel::Receiver<Envelope>) -> Vec<String> {
        rx.try_iter()
            .filter_map(|env| match env.event {
                SourceEvent::Push(Push::Delta(text)) => Some(text),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_consume_in_order() {
        let (tx, rx) = unbounded();
        let chunks = chunk_stream(Source::chunks(stream::iter(vec![
            Ok::<_, BoxError>("Built "),
            Ok("a Rust "),
            Ok("service."),
        ])));
        let token = CancellationToken::new();

        let outcome = block_on(consume(chunks, &tx, 3, &token));
        assert_eq!(outcome, FeedOutcome::Exhausted);

        let envelopes: Vec<Envelope> = rx.try_iter().collect();
        assert_eq!(envelopes.len(), 4);
        assert!(envelopes.iter().all(|env| env.generation == 3));
        assert!(matches!(envelopes[3].event, SourceEvent::End));
    }

    #[test]
    fn test_consume_forwards_failure() {
        let (tx, rx) = unbounded();
        let chunks = chunk_stream(Source::chunks(stream::iter(vec![
            Ok::<_, BoxError>("partial".to_string()),
            Err("upstream closed".into()),
            Ok("never".to_string()),
        ])));
        let token = CancellationToken::new();

        assert_eq!(block_on(consume(chunks, &tx, 1, &token)), FeedOutcome::Failed);
        let envelopes: Vec<Envelope> = rx.try_iter().collect();
        assert_eq!(envelopes.len(), 2);
        assert!(matches!(envelopes[1].event, SourceEvent::Failed(_)));
    }

    #[test]
    fn test_cancel_interrupts_pending_pull() {
        let (tx, rx) = unbounded();
        let chunks = chunk_stream(Source::chunks(stream::pending::<Result<String, BoxError>>()));
        let token = CancellationToken::new();
        token.cancel();

        assert_eq!(block_on(consume(chunks, &tx, 1, &token)), FeedOutcome::Cancelled);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_disconnected_receiver() {
        let (tx, rx) = unbounded();
        drop(rx);
        let chunks = chunk_stream(Source::chunks(stream::iter(vec![Ok::<_, BoxError>("x")])));
        let token = CancellationToken::new();
        assert_eq!(block_on(consume(chunks, &tx, 1, &token)), FeedOutcome::Disconnected);
    }

    #[test]
    fn test_feeder_thread() {
        let (tx, rx) = unbounded();
        let chunks = chunk_stream(Source::chunks(stream::iter(vec![
            Ok::<_, BoxError>("one"),
            Ok("two"),
        ])));
        let feeder = FeederActor::spawn(chunks, tx, 5).unwrap();

        let mut received = Vec::new();
        while let Ok(env) = rx.recv_timeout(Duration::from_secs(2)) {
            let end = matches!(env.event, SourceEvent::End);
            received.push(env);
            if end {
                break;
            }
        }
        assert_eq!(received.len(), 3);
        assert_eq!(feeder.join(), Some(FeedOutcome::Exhausted));
    }

    #[test]
    fn test_feeder_cancel() {
        let (tx, rx) = unbounded();
        let chunks = chunk_stream(Source::chunks(stream::pending::<Result<String, BoxError>>()));
        let feeder = FeederActor::spawn(chunks, tx, 1).unwrap();
        feeder.cancel();
        assert!(feeder.is_cancelled());
        assert_eq!(feeder.join(), Some(FeedOutcome::Cancelled));
        assert!(deltas(&rx).is_empty());
    }
}

//! Error types surfaced by the reveal engine.
//!
//! Only [`StreamError::SourceFailure`] is something a caller must react
//! to. Segmentation failures are recovered locally and forwarded for
//! observability; benign misuse never produces an error at all.

use thiserror::Error;

/// Boxed error produced by an asynchronous chunk source.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure of the word segmentation primitive.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SegmentationError {
    /// The segmenter does not support the requested locale.
    #[error("unsupported segmentation locale: {0}")]
    UnsupportedLocale(String),

    /// The segmenter is not available on this host.
    #[error("word segmentation unavailable")]
    Unavailable,

    /// Any other segmenter-specific failure.
    #[error("segmentation failed: {0}")]
    Failed(String),
}

/// Errors reported through a stream's error channel.
#[derive(Debug, Error)]
pub enum StreamError {
    /// A chunk source rejected mid-iteration.
    #[error("stream source failed: {0}")]
    SourceFailure(#[source] BoxError),

    /// Locale-aware segmentation failed; the whitespace fallback was used.
    #[error("word segmentation failed, using whitespace fallback: {0}")]
    Segmentation(#[from] SegmentationError),

    /// The host could not start a feeder or driver thread.
    #[error("failed to spawn {name} thread: {source}")]
    Spawn {
        /// Thread name.
        name: &'static str,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },
}

impl StreamError {
    /// Wrap an arbitrary source error.
    pub fn source_failure<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self::SourceFailure(err.into())
    }

    /// Whether this error is surfaced to callers as a hard failure.
    ///
    /// Segmentation errors are recovered locally and only reported for
    /// observability.
    pub const fn is_caller_visible(&self) -> bool {
        !matches!(self, Self::Segmentation(_))
    }
}

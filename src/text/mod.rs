//! Text primitives: target diffing and word segmentation.
//!
//! - [`diff`]: classify how a new target relates to the previous one
//! - [`segment`]: word boundaries of the displayed text for fade consumers

pub mod diff;
pub mod segment;

pub use diff::{classify, ChangeKind, Classification};
pub use segment::{
    segment_with_fallback, whitespace_segments, Segment, Segmentation, UnicodeWordSegmenter,
    WordSegmenter,
};

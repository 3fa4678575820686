//! Segmenter: word boundaries of the displayed text for fade consumers.
//!
//! The default segmenter follows Unicode word boundaries (UAX #29). A
//! host may plug in its own locale-aware implementation through
//! [`WordSegmenter`]; whenever that fails, [`whitespace_segments`]
//! provides the boundaries instead.

use crate::error::SegmentationError;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// One word or whitespace run of the displayed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Segment text.
    pub text: String,
    /// Position of the segment in the ordered list.
    pub index: usize,
    /// Display width in terminal columns.
    pub width: usize,
}

impl Segment {
    fn new(text: &str, index: usize) -> Self {
        Self {
            text: text.to_owned(),
            index,
            width: UnicodeWidthStr::width(text),
        }
    }

    /// Whether this segment is a whitespace run.
    pub fn is_whitespace(&self) -> bool {
        !self.text.is_empty() && self.text.chars().all(char::is_whitespace)
    }
}

/// Locale-aware word segmentation primitive.
pub trait WordSegmenter: Send {
    /// Split `text` into ordered segments covering it exactly.
    ///
    /// # Errors
    ///
    /// Returns an error if segmentation is unavailable for `locale` or
    /// fails for this input.
    fn segment(&self, text: &str, locale: Option<&str>) -> Result<Vec<Segment>, SegmentationError>;
}

/// Segmenter backed by Unicode word boundaries.
///
/// UAX #29 rules are locale-independent, so the locale hint is accepted
/// and ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeWordSegmenter;

impl WordSegmenter for UnicodeWordSegmenter {
    fn segment(
        &self,
        text: &str,
        _locale: Option<&str>,
    ) -> Result<Vec<Segment>, SegmentationError> {
        Ok(text
            .split_word_bounds()
            .enumerate()
            .map(|(index, word)| Segment::new(word, index))
            .collect())
    }
}

/// Split on runs of whitespace, keeping each run as its own segment.
pub fn whitespace_segments(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut in_space: Option<bool> = None;

    for (offset, ch) in text.char_indices() {
        let space = ch.is_whitespace();
        match in_space {
            Some(prev) if prev != space => {
                segments.push(Segment::new(&text[start..offset], segments.len()));
                start = offset;
            }
            _ => {}
        }
        in_space = Some(space);
    }

    if start < text.len() {
        segments.push(Segment::new(&text[start..], segments.len()));
    }
    segments
}

/// Outcome of [`segment_with_fallback`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segmentation {
    /// Produced segments.
    pub segments: Vec<Segment>,
    /// The failure that forced the whitespace fallback, if any.
    pub fallback: Option<SegmentationError>,
}

/// Segment with `segmenter`, falling back to whitespace splitting.
pub fn segment_with_fallback(
    segmenter: &dyn WordSegmenter,
    text: &str,
    locale: Option<&str>,
) -> Segmentation {
    match segmenter.segment(text, locale) {
        Ok(segments) => Segmentation {
            segments,
            fallback: None,
        },
        Err(err) => {
            tracing::warn!(error = %err, "word segmentation failed, falling back to whitespace split");
            Segmentation {
                segments: whitespace_segments(text),
                fallback: Some(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    impl WordSegmenter for Broken {
        fn segment(
            &self,
            _text: &str,
            locale: Option<&str>,
        ) -> Result<Vec<Segment>, SegmentationError> {
            Err(SegmentationError::UnsupportedLocale(locale.unwrap_or("und").to_string()))
        }
    }

    fn texts(segments: &[Segment]) -> Vec<&str> {
        segments.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn test_whitespace_split_keeps_runs() {
        let segments = whitespace_segments("Senior  Rust\tengineer");
        assert_eq!(texts(&segments), vec!["Senior", "  ", "Rust", "\t", "engineer"]);
        assert!(segments[1].is_whitespace());
        assert_eq!(segments[4].index, 4);
    }

    #[test]
    fn test_whitespace_split_edges() {
        assert!(whitespace_segments("").is_empty());
        assert_eq!(texts(&whitespace_segments("  lead")), vec!["  ", "lead"]);
        assert_eq!(texts(&whitespace_segments("trail ")), vec!["trail", " "]);
    }

    #[test]
    fn test_unicode_segmenter_covers_text() {
        let text = "Led a team of 5, shipping v2.0.";
        let segments = UnicodeWordSegmenter.segment(text, Some("en")).unwrap();
        let joined: String = segments.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(joined, text);
        assert!(segments.iter().enumerate().all(|(i, s)| s.index == i));
    }

    #[test]
    fn test_fallback_on_failure() {
        let result = segment_with_fallback(&Broken, "Hello brave world", Some("tlh"));
        assert_eq!(result.segments, whitespace_segments("Hello brave world"));
        assert_eq!(
            result.fallback,
            Some(SegmentationError::UnsupportedLocale("tlh".to_string()))
        );
    }

    #[test]
    fn test_segment_width() {
        let segments = whitespace_segments("日本 ok");
        assert_eq!(segments[0].width, 4);
        assert_eq!(segments[2].width, 2);
    }
}

//! Diff Resolver: classify how a new target relates to the previous one.
//!
//! The classification decides whether the pacing scheduler may keep
//! revealing forward or must first pull the display cursor back to the
//! shared prefix. All lengths and indices are counted in `char`s.

/// How the next target relates to the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// `next` extends `prev`.
    Append,
    /// `next == prev`.
    Identical,
    /// `next` rewrites part of `prev` (or shrinks it).
    Divergent,
}

/// Result of [`classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Classification {
    /// Relationship between the two texts.
    pub kind: ChangeKind,
    /// Length of the longest shared prefix, in chars.
    pub common_prefix: usize,
}

impl Classification {
    /// Whether the cursor may need to regress before revealing `next`.
    #[inline]
    pub const fn is_divergent(&self) -> bool {
        matches!(self.kind, ChangeKind::Divergent)
    }
}

/// Classify `next` against `prev`.
///
/// For `Append` and `Identical` the common prefix is the full length of
/// `prev`.
pub fn classify(prev: &str, next: &str) -> Classification {
    if next == prev {
        return Classification {
            kind: ChangeKind::Identical,
            common_prefix: prev.chars().count(),
        };
    }

    if next.len() > prev.len() && next.starts_with(prev) {
        return Classification {
            kind: ChangeKind::Append,
            common_prefix: prev.chars().count(),
        };
    }

    Classification {
        kind: ChangeKind::Divergent,
        common_prefix: common_prefix_len(prev, next),
    }
}

/// Number of leading chars shared by `a` and `b`.
pub fn common_prefix_len(a: &str, b: &str) -> usize {
    a.chars().zip(b.chars()).take_while(|(x, y)| x == y).count()
}

/// Byte offset of the `chars`-th char in `text`, clamped to its length.
#[inline]
pub fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map_or(text.len(), |(index, _)| index)
}

/// The first `chars` chars of `text`.
#[inline]
pub fn char_prefix(text: &str, chars: usize) -> &str {
    &text[..byte_offset(text, chars)]
}

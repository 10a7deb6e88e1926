//! # Text Normalization and Word-Boundary Marking
//!
//! Corpus lines and encoder inputs pass through two steps:
//! 1. [`normalize_text`]: canonical composition (NFC), whitespace collapse.
//! 2. [`mark_text`]: every word start is replaced by [`SENTINEL`].
//!
//! [`MarkedText`] is the unit of segmentation for the lattice engine;
//! it indexes the marked string by codepoint.

use core::ops::Range;

use unicode_normalization::UnicodeNormalization;

/// The word-boundary marker; stands in for every space,
/// including the implicit boundary at the start of the text.
///
/// This is "LOWER ONE EIGHTH BLOCK", which does not occur in natural text.
pub const SENTINEL: char = '\u{2581}';

/// [`SENTINEL`] as a `&str`; the sentinel-only vocabulary piece.
pub const SENTINEL_STR: &str = "\u{2581}";

/// Normalize text.
///
/// Applies NFC, collapses all whitespace runs to a single ASCII space,
/// and strips leading/trailing whitespace.
///
/// Whitespace is the Unicode `White_Space` property. The information
/// separators U+001C..=U+001F are not in it, so they are kept as text;
/// Python's `str.split()` treats them as whitespace.
///
/// Returns an empty string for all-whitespace input.
pub fn normalize_text(text: &str) -> String {
    let composed: String = text.nfc().collect();

    let mut out = String::with_capacity(composed.len());
    for word in composed.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

/// Mark word boundaries in normalized text.
///
/// Prepends [`SENTINEL`] and replaces every space with it.
/// Empty input maps to empty output; no sentinel is inserted.
pub fn mark_text(normalized: &str) -> String {
    if normalized.is_empty() {
        return String::new();
    }

    let mut out = String::with_capacity(normalized.len() + SENTINEL.len_utf8());
    out.push(SENTINEL);
    for c in normalized.chars() {
        out.push(if c == ' ' { SENTINEL } else { c });
    }
    out
}

/// Marked text, indexed by codepoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkedText {
    text: String,

    /// Byte offset of every codepoint, plus `text.len()`.
    offsets: Vec<usize>,
}

impl MarkedText {
    /// Normalize and mark raw text.
    ///
    /// ## Returns
    /// `None` if the text normalizes to nothing.
    pub fn from_raw(text: &str) -> Option<Self> {
        let normalized = normalize_text(text);
        if normalized.is_empty() {
            return None;
        }
        Some(Self::from_marked(mark_text(&normalized)))
    }

    /// Wrap an already-marked string.
    pub fn from_marked(text: String) -> Self {
        let mut offsets: Vec<usize> = text.char_indices().map(|(idx, _)| idx).collect();
        offsets.push(text.len());
        Self { text, offsets }
    }

    /// The marked string.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The number of codepoints.
    pub fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Is the text empty?
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The substring covering codepoints `[start, end)`.
    pub fn slice(
        &self,
        start: usize,
        end: usize,
    ) -> &str {
        &self.text[self.byte_range(start, end)]
    }

    /// The byte range covering codepoints `[start, end)`.
    pub fn byte_range(
        &self,
        start: usize,
        end: usize,
    ) -> Range<usize> {
        self.offsets[start]..self.offsets[end]
    }

    /// Does the codepoint at `idx` start a word?
    pub fn is_word_start(
        &self,
        idx: usize,
    ) -> bool {
        self.slice(idx, idx + 1) == SENTINEL_STR
    }

    /// The text as single-codepoint pieces.
    pub fn codepoints(&self) -> impl Iterator<Item = &str> {
        (0..self.len()).map(|idx| self.slice(idx, idx + 1))
    }
}

impl AsRef<str> for MarkedText {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

//! Structured text change deltas.
//!
//! Typing, auto-pairs, expansion, formatting and draft loading all report a [`TextDelta`].
//! State subscribers read it instead of diffing old and new text. Offsets are **character
//! offsets** (Unicode scalar values).

/// One committed buffer replacement.
///
/// Every mutation of a [`SourceBuffer`](crate::SourceBuffer) is a single contiguous
/// replacement, so one record describes it completely. `start` is a character offset into the
/// text as it was before the change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDelta {
    /// Where the replacement begins.
    pub start: usize,
    /// Text that was removed (may be empty).
    pub removed: String,
    /// Text that took its place (may be empty), line breaks already normalised.
    pub inserted: String,
    /// Buffer length in characters after the change.
    pub char_count: usize,
}

/// A pending replacement of `start..end` (pre-edit char offsets) with `text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEditSpec {
    /// Inclusive start character offset.
    pub start: usize,
    /// Exclusive end character offset.
    pub end: usize,
    /// Replacement text.
    pub text: String,
}

impl TextEditSpec {
    /// Apply this edit to a plain string.
    ///
    /// Offsets past the end of `text` are clamped.
    pub fn apply(&self, text: &str) -> String {
        let start = byte_index(text, self.start);
        let end = byte_index(text, self.end.max(self.start));
        let mut out = String::with_capacity(text.len() + self.text.len());
        out.push_str(&text[..start]);
        out.push_str(&self.text);
        out.push_str(&text[end..]);
        out
    }
}

/// Convert a character offset into a byte index of `text` (clamped to `text.len()`).
pub fn byte_index(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map(|(index, _)| index)
        .unwrap_or(text.len())
}

//! Source buffers
//!
//! One [`SourceBuffer`] per language slot. The text lives in a Rope, which gives O(log N) line
//! access for the gutter, popup placement and caret movement, and cheap edits at any offset.
//!
//! All offsets are **character offsets** (Unicode scalar values).
//!
//! Only `\n` separates lines. Incoming `\r\n` and lone `\r` are folded into `\n`, the same
//! as a browser textarea reports its value, and ropey is built without its CR and Unicode line
//! break features so that VT, FF, NEL, U+2028 and U+2029 stay ordinary characters.

use crate::delta::TextDelta;
use playground_lang::Language;
use ropey::Rope;
use std::borrow::Cow;
use std::ops::Range;

/// Fold `\r\n` and lone `\r` into `\n`.
pub fn normalize_line_breaks(text: &str) -> Cow<'_, str> {
    if !text.contains('\r') {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
}

/// The live text of one language buffer.
#[derive(Debug, Clone)]
pub struct SourceBuffer {
    language: Language,
    rope: Rope,
}

impl SourceBuffer {
    /// Create a buffer holding `text`.
    pub fn new(language: Language, text: &str) -> Self {
        Self {
            language,
            rope: Rope::from_str(&normalize_line_breaks(text)),
        }
    }

    /// Create an empty buffer.
    pub fn empty(language: Language) -> Self {
        Self::new(language, "")
    }

    /// Language slot this buffer is bound to.
    pub fn language(&self) -> Language {
        self.language
    }

    /// Get complete text
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Returns `true` if the buffer holds no text.
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Get total character count
    pub fn char_count(&self) -> usize {
        self.rope.len_chars()
    }

    /// Get total line count (an empty buffer has one line)
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Get line number and offset within line from character offset
    pub fn char_offset_to_position(&self, char_offset: usize) -> (usize, usize) {
        let char_offset = char_offset.min(self.rope.len_chars());

        let line_idx = self.rope.char_to_line(char_offset);
        let line_start_char = self.rope.line_to_char(line_idx);
        (line_idx, char_offset - line_start_char)
    }

    /// Get character offset from line number and column number (column is clamped to the line)
    pub fn position_to_char_offset(&self, line: usize, column: usize) -> usize {
        if line >= self.rope.len_lines() {
            return self.rope.len_chars();
        }

        let line_start_char = self.rope.line_to_char(line);
        line_start_char + column.min(self.line_len(line))
    }

    fn line_len(&self, line: usize) -> usize {
        let line_start_char = self.rope.line_to_char(line);
        if line + 1 < self.rope.len_lines() {
            self.rope.line_to_char(line + 1) - line_start_char - 1 // -1 for newline
        } else {
            self.rope.len_chars() - line_start_char
        }
    }

    /// Text between the start of the caret's line and the caret.
    pub fn line_before(&self, char_offset: usize) -> String {
        let char_offset = char_offset.min(self.rope.len_chars());
        let line_start = self.rope.line_to_char(self.rope.char_to_line(char_offset));
        self.rope.slice(line_start..char_offset).to_string()
    }

    /// Text between the caret and the end of its line (excluding newline).
    pub fn line_after(&self, char_offset: usize) -> String {
        let char_offset = char_offset.min(self.rope.len_chars());
        let line = self.rope.char_to_line(char_offset);
        let line_end = self.rope.line_to_char(line) + self.line_len(line);
        self.rope.slice(char_offset..line_end).to_string()
    }

    /// Copy out a character range (clamped to the buffer).
    pub fn slice(&self, range: Range<usize>) -> String {
        let (start, end) = self.clamp(range);
        self.rope.slice(start..end).to_string()
    }

    fn clamp(&self, range: Range<usize>) -> (usize, usize) {
        let len = self.rope.len_chars();
        let start = range.start.min(len);
        let end = range.end.clamp(start, len);
        (start, end)
    }

    /// Replace a character range with `text` and describe the change.
    ///
    /// The range is clamped to the buffer and line breaks in `text` are normalised. Returns
    /// `None` when nothing changed.
    pub fn replace(&mut self, range: Range<usize>, text: &str) -> Option<TextDelta> {
        let (start, end) = self.clamp(range);
        let text = normalize_line_breaks(text);
        if start == end && text.is_empty() {
            return None;
        }

        let removed = self.rope.slice(start..end).to_string();
        if removed == text {
            return None;
        }

        self.rope.remove(start..end);
        self.rope.insert(start, &text);

        Some(TextDelta {
            start,
            removed,
            inserted: text.into_owned(),
            char_count: self.rope.len_chars(),
        })
    }

    /// Replace the whole buffer.
    pub fn set_text(&mut self, text: &str) -> Option<TextDelta> {
        self.replace(0..self.rope.len_chars(), text)
    }
}

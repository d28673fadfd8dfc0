//! Editing Surface
//!
//! One [`EditingSurface`] owns one [`SourceBuffer`], its caret/selection, the suggestion popup
//! and the scroll offsets of the stacked layers.
//!
//! # Overview
//!
//! The surface is a small state machine with two modes:
//!
//! - **Idle**: keys edit the buffer; Tab expands an abbreviation or indents.
//! - **Suggesting**: a ranked candidate list is visible; Arrow-Up/Down cycle the selection,
//!   Enter/Tab commit it, Escape closes it.
//!
//! Every text-changing input recomputes the trailing token and re-enters `Suggesting` when at
//! least one candidate matches.
//!
//! All commands go through [`EditingSurface::execute`]. Each mutation queues layout fixups
//! (caret placement, caret reveal, scroll mirroring) that run once the mutation has committed,
//! right before `execute` returns.
//!
//! # Example
//!
//! ```rust
//! use playground_core::{EditingSurface, EditorConfig, Key, SurfaceCommand};
//! use playground_lang::Language;
//!
//! let mut surface = EditingSurface::new(Language::Script, "", &EditorConfig::default());
//! for ch in "clg".chars() {
//!     surface.execute(SurfaceCommand::Key(Key::Char(ch))).unwrap();
//! }
//! surface.execute(SurfaceCommand::Key(Key::Tab)).unwrap();
//!
//! assert_eq!(surface.text(), "console.log();");
//! assert_eq!(surface.cursor().offset, 12);
//! ```

use crate::buffer::{SourceBuffer, normalize_line_breaks};
use crate::config::EditorConfig;
use crate::delta::TextDelta;
use crate::format::{FormatError, FormatOptions, FormatOutcome, Formatter};
use crate::geometry::{LayerScroll, PopupMetrics, PopupPosition, ScrollOffset, Viewport};
use crate::intellicode::{self, Expansion, candidates_for_token, trailing_token};
use playground_highlight::{Highlighter, SyntaxPalette};
use playground_lang::{Language, closing_pair};
use std::ops::Range;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{trace, warn};
use unicode_segmentation::UnicodeSegmentation;

/// Caret and selection, in character offsets.
///
/// `offset` is the caret (selection head); `anchor` is the other end of the selection.
/// Invariant: both are `<= buffer.char_count()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CursorState {
    /// Caret offset.
    pub offset: usize,
    /// Selection anchor (equal to `offset` when nothing is selected).
    pub anchor: usize,
}

impl CursorState {
    /// Collapsed caret at `offset`.
    pub fn at(offset: usize) -> Self {
        Self {
            offset,
            anchor: offset,
        }
    }

    /// Selected range (start <= end).
    pub fn range(&self) -> Range<usize> {
        self.offset.min(self.anchor)..self.offset.max(self.anchor)
    }

    /// Returns `true` if nothing is selected.
    pub fn is_collapsed(&self) -> bool {
        self.offset == self.anchor
    }

    fn clamped(self, len: usize) -> Self {
        Self {
            offset: self.offset.min(len),
            anchor: self.anchor.min(len),
        }
    }
}

/// Visible suggestion popup.
///
/// Invariant: `selected_index < candidates.len()` and `candidates` is never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionState {
    /// Ranked candidates (table order).
    pub candidates: Vec<&'static str>,
    /// Highlighted candidate.
    pub selected_index: usize,
    /// Screen position of the popup.
    pub popup: PopupPosition,
}

impl SuggestionState {
    /// Currently highlighted candidate.
    pub fn selected(&self) -> &'static str {
        self.candidates[self.selected_index]
    }

    fn select_next(&mut self) {
        self.selected_index = (self.selected_index + 1) % self.candidates.len();
    }

    fn select_previous(&mut self) {
        let len = self.candidates.len();
        self.selected_index = (self.selected_index + len - 1) % len;
    }
}

/// Mode of the surface state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceMode {
    /// No popup.
    Idle,
    /// Suggestion popup visible.
    Suggesting,
}

/// Keyboard input the surface reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// A printable character.
    Char(char),
    /// Enter / Return.
    Enter,
    /// Tab.
    Tab,
    /// Escape.
    Escape,
    /// Arrow up.
    ArrowUp,
    /// Arrow down.
    ArrowDown,
    /// Arrow left.
    ArrowLeft,
    /// Arrow right.
    ArrowRight,
    /// Backspace.
    Backspace,
    /// Forward delete.
    Delete,
}

/// Commands accepted by [`EditingSurface::execute`].
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCommand {
    /// A key press.
    Key(Key),
    /// Insert literal text at the caret (paste, accessory bar), replacing the selection.
    InsertText {
        /// Text to insert.
        text: String,
    },
    /// The explicit expand button: same as Tab.
    Expand,
    /// Commit a suggestion picked with the pointer.
    CommitSuggestion {
        /// Index into the visible candidate list.
        index: usize,
    },
    /// Move the caret (collapses the selection).
    SetCursor {
        /// Target character offset.
        offset: usize,
    },
    /// Select `anchor..offset`.
    SetSelection {
        /// Selection anchor.
        anchor: usize,
        /// Caret end.
        offset: usize,
    },
    /// The text layer was scrolled by the user.
    Scroll {
        /// New scroll offset of the text layer.
        offset: ScrollOffset,
    },
    /// The host viewport changed size.
    Resize {
        /// New viewport.
        viewport: Viewport,
    },
    /// The text layer gained focus.
    Focus,
    /// The text layer lost focus; the popup closes after the grace period.
    Blur {
        /// When focus was lost.
        at: Instant,
    },
}

/// Command execution result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// Success, the buffer text is unchanged.
    Success,
    /// Success, the buffer text changed.
    Edited(TextDelta),
}

impl CommandResult {
    /// The text change, if any.
    pub fn text_delta(&self) -> Option<&TextDelta> {
        match self {
            CommandResult::Success => None,
            CommandResult::Edited(delta) => Some(delta),
        }
    }
}

/// Command error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Offset beyond the end of the buffer.
    #[error("invalid offset: {offset} (buffer has {len} chars)")]
    InvalidOffset {
        /// Requested offset.
        offset: usize,
        /// Buffer length in characters.
        len: usize,
    },
    /// No popup is visible.
    #[error("no suggestion popup is visible")]
    NoSuggestions,
    /// Candidate index out of range.
    #[error("invalid suggestion index: {index} of {len}")]
    InvalidSuggestion {
        /// Requested index.
        index: usize,
        /// Number of visible candidates.
        len: usize,
    },
}

/// Work deferred until the current mutation has committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LayoutFixup {
    /// Place the caret (clamped to the buffer).
    PlaceCursor(CursorState),
    /// Scroll the text layer so that the caret line is visible.
    RevealCursor,
    /// Mirror the text layer's scroll onto overlay and gutter.
    SyncScroll,
}

/// Stateful editor for one language buffer.
#[derive(Debug, Clone)]
pub struct EditingSurface {
    buffer: SourceBuffer,
    cursor: CursorState,
    suggestion: Option<SuggestionState>,
    scroll: LayerScroll,
    viewport: Viewport,
    metrics: PopupMetrics,
    indent: String,
    blur_grace: Duration,
    dismiss_at: Option<Instant>,
    focused: bool,
    pending_fixups: Vec<LayoutFixup>,
}

impl EditingSurface {
    /// Create a surface with the caret at the start of `text`.
    pub fn new(language: Language, text: &str, config: &EditorConfig) -> Self {
        Self {
            buffer: SourceBuffer::new(language, text),
            cursor: CursorState::default(),
            suggestion: None,
            scroll: LayerScroll::default(),
            viewport: Viewport::default(),
            metrics: config.popup,
            indent: config.indent.clone(),
            blur_grace: config.blur_grace(),
            dismiss_at: None,
            focused: false,
            pending_fixups: Vec::new(),
        }
    }

    /// Language slot of this surface.
    pub fn language(&self) -> Language {
        self.buffer.language()
    }

    /// The underlying buffer.
    pub fn buffer(&self) -> &SourceBuffer {
        &self.buffer
    }

    /// Current buffer text.
    pub fn text(&self) -> String {
        self.buffer.text()
    }

    /// Caret and selection.
    pub fn cursor(&self) -> CursorState {
        self.cursor
    }

    /// Visible popup, if any.
    pub fn suggestion(&self) -> Option<&SuggestionState> {
        self.suggestion.as_ref()
    }

    /// Current state-machine mode.
    pub fn mode(&self) -> SurfaceMode {
        if self.suggestion.is_some() {
            SurfaceMode::Suggesting
        } else {
            SurfaceMode::Idle
        }
    }

    /// Scroll offsets of the text layer, overlay and gutter.
    pub fn scroll(&self) -> LayerScroll {
        self.scroll
    }

    /// Returns `true` if the text layer has focus.
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Number of gutter rows.
    pub fn gutter_line_count(&self) -> usize {
        self.buffer.line_count().max(1)
    }

    /// HTML of the visible overlay layer.
    ///
    /// The trailing newline keeps the overlay as tall as the text layer when the buffer ends
    /// with an empty line.
    pub fn overlay_html(&self, highlighter: &Highlighter, palette: &SyntaxPalette) -> String {
        let mut html = highlighter.highlight(&self.buffer.text(), self.language(), palette);
        html.push('\n');
        html
    }

    /// Execute a command and run the layout fixups it queued.
    pub fn execute(&mut self, command: SurfaceCommand) -> Result<CommandResult, CommandError> {
        trace!(language = %self.language(), ?command, "surface command");
        let result = match command {
            SurfaceCommand::Key(key) => self.handle_key(key),
            SurfaceCommand::InsertText { text } => Ok(self.type_text(&text)),
            SurfaceCommand::Expand => Ok(self.tab()),
            SurfaceCommand::CommitSuggestion { index } => self.commit_suggestion(index),
            SurfaceCommand::SetCursor { offset } => {
                self.check_offset(offset)?;
                self.move_cursor(CursorState::at(offset));
                Ok(CommandResult::Success)
            }
            SurfaceCommand::SetSelection { anchor, offset } => {
                self.check_offset(anchor)?;
                self.check_offset(offset)?;
                self.move_cursor(CursorState { offset, anchor });
                Ok(CommandResult::Success)
            }
            SurfaceCommand::Scroll { offset } => {
                self.scroll.text = offset;
                self.pending_fixups.push(LayoutFixup::SyncScroll);
                Ok(CommandResult::Success)
            }
            SurfaceCommand::Resize { viewport } => {
                self.viewport = viewport;
                self.pending_fixups.push(LayoutFixup::RevealCursor);
                self.pending_fixups.push(LayoutFixup::SyncScroll);
                Ok(CommandResult::Success)
            }
            SurfaceCommand::Focus => {
                self.focused = true;
                self.dismiss_at = None;
                Ok(CommandResult::Success)
            }
            SurfaceCommand::Blur { at } => {
                self.focused = false;
                if self.suggestion.is_some() {
                    self.dismiss_at = Some(at + self.blur_grace);
                }
                Ok(CommandResult::Success)
            }
        };
        self.run_layout_fixups();
        result
    }

    /// Close the popup once the blur grace period has elapsed.
    ///
    /// Returns `true` if the popup was closed by this call.
    pub fn poll_timers(&mut self, now: Instant) -> bool {
        match self.dismiss_at {
            Some(deadline) if now >= deadline => {
                self.dismiss_at = None;
                self.suggestion.take().is_some()
            }
            _ => false,
        }
    }

    /// Replace the whole buffer programmatically (draft loading), keeping the caret offset
    /// where possible.
    pub fn set_text(&mut self, text: &str) -> Option<TextDelta> {
        let delta = self.buffer.set_text(text)?;
        self.suggestion = None;
        self.pending_fixups
            .push(LayoutFixup::PlaceCursor(CursorState::at(self.cursor.offset)));
        self.pending_fixups.push(LayoutFixup::SyncScroll);
        self.run_layout_fixups();
        Some(delta)
    }

    /// Manual "Format" action.
    ///
    /// On success the buffer is replaced only when the result differs beyond leading/trailing
    /// whitespace, and the caret offset is restored (clamped). On failure the buffer is left
    /// untouched and the error is returned for display.
    pub fn format_with(
        &mut self,
        formatter: &dyn Formatter,
        options: &FormatOptions,
    ) -> Result<FormatOutcome, FormatError> {
        let current = self.buffer.text();
        let parser = self.language().parser_kind();
        let formatted = match formatter.format(&current, parser, options) {
            Ok(formatted) => normalize_line_breaks(&formatted).into_owned(),
            Err(err) => {
                warn!(
                    language = %self.language(),
                    error = %err,
                    "format failed, buffer left untouched"
                );
                return Err(err);
            }
        };

        if formatted.trim() == current.trim() {
            return Ok(FormatOutcome::Unchanged);
        }

        let restore = self.cursor.offset;
        let Some(delta) = self.buffer.set_text(&formatted) else {
            return Ok(FormatOutcome::Unchanged);
        };
        self.suggestion = None;
        self.pending_fixups
            .push(LayoutFixup::PlaceCursor(CursorState::at(restore)));
        self.pending_fixups.push(LayoutFixup::SyncScroll);
        self.run_layout_fixups();
        Ok(FormatOutcome::Replaced(delta))
    }

    fn handle_key(&mut self, key: Key) -> Result<CommandResult, CommandError> {
        if let Some(suggestion) = self.suggestion.as_mut() {
            match key {
                Key::ArrowDown => {
                    suggestion.select_next();
                    return Ok(CommandResult::Success);
                }
                Key::ArrowUp => {
                    suggestion.select_previous();
                    return Ok(CommandResult::Success);
                }
                Key::Enter | Key::Tab => {
                    let index = suggestion.selected_index;
                    return self.commit_suggestion(index);
                }
                Key::Escape => {
                    self.suggestion = None;
                    return Ok(CommandResult::Success);
                }
                _ => {}
            }
        }

        let result = match key {
            Key::Tab => self.tab(),
            Key::Char(open) => match closing_pair(open) {
                Some(close) => self.insert_pair(open, close),
                None => self.type_text(open.encode_utf8(&mut [0; 4])),
            },
            Key::Enter => self.type_text("\n"),
            Key::Backspace => self.delete_backward(),
            Key::Delete => self.delete_forward(),
            Key::ArrowLeft => {
                self.move_horizontal(false);
                CommandResult::Success
            }
            Key::ArrowRight => {
                self.move_horizontal(true);
                CommandResult::Success
            }
            Key::ArrowUp => {
                self.move_vertical(-1);
                CommandResult::Success
            }
            Key::ArrowDown => {
                self.move_vertical(1);
                CommandResult::Success
            }
            Key::Escape => CommandResult::Success,
        };
        Ok(result)
    }

    /// Tab / Expand: commit the popup, else expand an abbreviation, else indent.
    fn tab(&mut self) -> CommandResult {
        if let Some(suggestion) = &self.suggestion {
            let name = suggestion.selected();
            return self.apply_candidate(name);
        }

        let text = self.buffer.text();
        let start = self.cursor.range().start;
        if let Some(expansion) = intellicode::expand(&text, start, self.language()) {
            return self.apply_expansion(expansion);
        }

        let indent = self.indent.clone();
        let range = self.cursor.range();
        let caret = range.start + indent.chars().count();
        self.edit(range, &indent, caret)
    }

    fn commit_suggestion(&mut self, index: usize) -> Result<CommandResult, CommandError> {
        let suggestion = self.suggestion.as_ref().ok_or(CommandError::NoSuggestions)?;
        let name = suggestion
            .candidates
            .get(index)
            .copied()
            .ok_or(CommandError::InvalidSuggestion {
                index,
                len: suggestion.candidates.len(),
            })?;
        Ok(self.apply_candidate(name))
    }

    fn apply_candidate(&mut self, name: &str) -> CommandResult {
        let text = self.buffer.text();
        let expansion =
            intellicode::expand_candidate(&text, self.cursor.range().start, self.language(), name);
        self.apply_expansion(expansion)
    }

    fn apply_expansion(&mut self, expansion: Expansion) -> CommandResult {
        let Expansion { edit, cursor } = expansion;
        self.suggestion = None;
        self.dismiss_at = None;
        self.edit(edit.start..edit.end, &edit.text, cursor)
    }

    fn insert_pair(&mut self, open: char, close: char) -> CommandResult {
        let range = self.cursor.range();
        let caret = range.start + 1;
        let pair: String = [open, close].iter().collect();
        let result = self.edit(range, &pair, caret);
        self.refresh_suggestions();
        result
    }

    /// Default text input: replace the selection and recompute suggestions.
    fn type_text(&mut self, text: &str) -> CommandResult {
        let text = normalize_line_breaks(text);
        let range = self.cursor.range();
        let caret = range.start + text.chars().count();
        let result = self.edit(range, &text, caret);
        self.refresh_suggestions();
        result
    }

    fn delete_backward(&mut self) -> CommandResult {
        let range = if self.cursor.is_collapsed() {
            let offset = self.cursor.offset;
            let before = self.buffer.line_before(offset);
            let len = match before.graphemes(true).next_back() {
                Some(grapheme) => grapheme.chars().count(),
                None => usize::from(offset > 0),
            };
            offset - len..offset
        } else {
            self.cursor.range()
        };
        let caret = range.start;
        let result = self.edit(range, "", caret);
        self.refresh_suggestions();
        result
    }

    fn delete_forward(&mut self) -> CommandResult {
        let range = if self.cursor.is_collapsed() {
            let offset = self.cursor.offset;
            let after = self.buffer.line_after(offset);
            let len = match after.graphemes(true).next() {
                Some(grapheme) => grapheme.chars().count(),
                None => usize::from(offset < self.buffer.char_count()),
            };
            offset..offset + len
        } else {
            self.cursor.range()
        };
        let caret = range.start;
        let result = self.edit(range, "", caret);
        self.refresh_suggestions();
        result
    }

    fn move_horizontal(&mut self, forward: bool) {
        let offset = if !self.cursor.is_collapsed() {
            let range = self.cursor.range();
            if forward { range.end } else { range.start }
        } else if forward {
            let after = self.buffer.line_after(self.cursor.offset);
            let step = after
                .graphemes(true)
                .next()
                .map(|g| g.chars().count())
                .unwrap_or(1);
            (self.cursor.offset + step).min(self.buffer.char_count())
        } else {
            let before = self.buffer.line_before(self.cursor.offset);
            let step = before
                .graphemes(true)
                .next_back()
                .map(|g| g.chars().count())
                .unwrap_or(1);
            self.cursor.offset.saturating_sub(step)
        };
        self.move_cursor(CursorState::at(offset));
    }

    fn move_vertical(&mut self, delta: isize) {
        let (line, column) = self.buffer.char_offset_to_position(self.cursor.offset);
        let target = line.saturating_add_signed(delta);
        let offset = if delta < 0 && line == 0 {
            0
        } else if target >= self.buffer.line_count() {
            self.buffer.char_count()
        } else {
            self.buffer.position_to_char_offset(target, column)
        };
        self.move_cursor(CursorState::at(offset));
    }

    fn move_cursor(&mut self, cursor: CursorState) {
        self.pending_fixups.push(LayoutFixup::PlaceCursor(cursor));
        self.pending_fixups.push(LayoutFixup::RevealCursor);
        self.pending_fixups.push(LayoutFixup::SyncScroll);
    }

    /// Replace `range`, then queue caret placement at `caret` (post-edit offset).
    fn edit(&mut self, range: Range<usize>, text: &str, caret: usize) -> CommandResult {
        let delta = self.buffer.replace(range, text);
        self.move_cursor(CursorState::at(caret));
        match delta {
            Some(delta) => CommandResult::Edited(delta),
            None => CommandResult::Success,
        }
    }

    /// Recompute the popup from the token before the caret.
    ///
    /// Runs after the caret fixup, because the token depends on the final caret offset.
    fn refresh_suggestions(&mut self) {
        self.run_layout_fixups();

        let offset = self.cursor.offset;
        let before = self.buffer.line_before(offset);
        let candidates = candidates_for_token(trailing_token(&before), self.language());
        if candidates.is_empty() {
            self.suggestion = None;
            return;
        }

        let (line, _) = self.buffer.char_offset_to_position(offset);
        let popup = self.metrics.popup_position(
            self.viewport,
            line,
            &before,
            self.scroll.text.top,
            candidates.len(),
        );
        self.dismiss_at = None;
        self.suggestion = Some(SuggestionState {
            candidates,
            selected_index: 0,
            popup,
        });
    }

    fn check_offset(&self, offset: usize) -> Result<(), CommandError> {
        let len = self.buffer.char_count();
        if offset > len {
            return Err(CommandError::InvalidOffset { offset, len });
        }
        Ok(())
    }

    /// Apply queued fixups in order, now that the preceding mutation has committed.
    fn run_layout_fixups(&mut self) {
        for fixup in std::mem::take(&mut self.pending_fixups) {
            match fixup {
                LayoutFixup::PlaceCursor(cursor) => {
                    self.cursor = cursor.clamped(self.buffer.char_count());
                }
                LayoutFixup::RevealCursor => {
                    let (line, _) = self.buffer.char_offset_to_position(self.cursor.offset);
                    self.scroll
                        .reveal_line(line, self.metrics.line_height, self.viewport.height);
                }
                LayoutFixup::SyncScroll => self.scroll.sync(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface(language: Language, text: &str, cursor: usize) -> EditingSurface {
        let mut surface = EditingSurface::new(language, text, &EditorConfig::default());
        surface
            .execute(SurfaceCommand::SetCursor { offset: cursor })
            .unwrap();
        surface
    }

    fn key(surface: &mut EditingSurface, key: Key) -> CommandResult {
        surface.execute(SurfaceCommand::Key(key)).unwrap()
    }

    #[test]
    fn test_auto_pair_places_cursor_between() {
        let mut s = surface(Language::Script, "ab", 1);
        key(&mut s, Key::Char('{'));
        assert_eq!(s.text(), "a{}b");
        assert_eq!(s.cursor().offset, 2);
    }

    #[test]
    fn test_auto_pair_replaces_selection() {
        let mut s = surface(Language::Script, "abcd", 0);
        s.execute(SurfaceCommand::SetSelection {
            anchor: 1,
            offset: 3,
        })
        .unwrap();
        key(&mut s, Key::Char('('));
        assert_eq!(s.text(), "a()d");
        assert_eq!(s.cursor(), CursorState::at(2));
    }

    #[test]
    fn test_auto_pair_does_not_skip_existing_closer() {
        let mut s = surface(Language::Script, "f()", 2);
        key(&mut s, Key::Char(')'));
        assert_eq!(s.text(), "f())");
        key(&mut s, Key::Char('('));
        assert_eq!(s.text(), "f()())");
        assert_eq!(s.cursor().offset, 4);
    }

    #[test]
    fn test_tab_indents_when_nothing_expands() {
        let mut s = surface(Language::Script, "x = 1", 0);
        key(&mut s, Key::Tab);
        assert_eq!(s.text(), "  x = 1");
        assert_eq!(s.cursor().offset, 2);
    }

    #[test]
    fn test_tab_indent_replaces_selection() {
        let mut s = surface(Language::Style, "a bc", 0);
        s.execute(SurfaceCommand::SetSelection {
            anchor: 4,
            offset: 1,
        })
        .unwrap();
        key(&mut s, Key::Tab);
        assert_eq!(s.text(), "a  ");
        assert_eq!(s.cursor().offset, 3);
    }

    #[test]
    fn test_typing_opens_and_closes_popup() {
        let mut s = surface(Language::Style, "", 0);
        key(&mut s, Key::Char('m'));
        assert_eq!(s.mode(), SurfaceMode::Suggesting);
        assert_eq!(s.suggestion().unwrap().candidates, vec!["margin"]);

        key(&mut s, Key::Char('q'));
        assert_eq!(s.mode(), SurfaceMode::Idle);
    }

    #[test]
    fn test_arrow_keys_wrap_selection() {
        let mut s = surface(Language::Script, "", 0);
        key(&mut s, Key::Char('a'));
        // async, await, addEventListener
        assert_eq!(s.suggestion().unwrap().candidates.len(), 3);

        key(&mut s, Key::ArrowUp);
        assert_eq!(s.suggestion().unwrap().selected_index, 2);
        key(&mut s, Key::ArrowDown);
        assert_eq!(s.suggestion().unwrap().selected_index, 0);
        key(&mut s, Key::ArrowDown);
        assert_eq!(s.suggestion().unwrap().selected(), "await");
    }

    #[test]
    fn test_escape_closes_popup_without_editing() {
        let mut s = surface(Language::Markup, "", 0);
        key(&mut s, Key::Char('d'));
        assert_eq!(key(&mut s, Key::Escape), CommandResult::Success);
        assert_eq!(s.mode(), SurfaceMode::Idle);
        assert_eq!(s.text(), "d");
    }

    #[test]
    fn test_enter_commits_markup_tag() {
        let mut s = surface(Language::Markup, "", 0);
        for ch in "sec".chars() {
            key(&mut s, Key::Char(ch));
        }
        key(&mut s, Key::Enter);
        assert_eq!(s.text(), "<section></section>");
        assert_eq!(s.cursor().offset, "<section>".len());
        assert_eq!(s.mode(), SurfaceMode::Idle);
    }

    #[test]
    fn test_enter_without_popup_inserts_newline() {
        let mut s = surface(Language::Script, "a;", 2);
        key(&mut s, Key::Enter);
        assert_eq!(s.text(), "a;\n");
        assert_eq!(s.cursor().offset, 3);
    }

    #[test]
    fn test_backspace_removes_whole_grapheme() {
        let text = "x👍🏽";
        let len = text.chars().count();
        let mut s = surface(Language::Markup, text, len);
        key(&mut s, Key::Backspace);
        assert_eq!(s.text(), "x");
        assert_eq!(s.cursor().offset, 1);
    }

    #[test]
    fn test_backspace_joins_lines() {
        let mut s = surface(Language::Script, "a\nb", 2);
        key(&mut s, Key::Backspace);
        assert_eq!(s.text(), "ab");
        assert_eq!(s.cursor().offset, 1);
    }

    #[test]
    fn test_backspace_at_start_is_noop() {
        let mut s = surface(Language::Script, "ab", 0);
        assert_eq!(key(&mut s, Key::Backspace), CommandResult::Success);
        assert_eq!(s.text(), "ab");
    }

    #[test]
    fn test_vertical_moves_clamp_column() {
        let mut s = surface(Language::Script, "abcdef\nxy\nlonger", 5);
        key(&mut s, Key::ArrowDown);
        assert_eq!(s.cursor().offset, 9);
        key(&mut s, Key::ArrowDown);
        assert_eq!(s.cursor().offset, 12);
        key(&mut s, Key::ArrowDown);
        assert_eq!(s.cursor().offset, 16);
    }

    #[test]
    fn test_blur_grace_allows_pointer_commit() {
        let mut s = surface(Language::Style, "", 0);
        s.execute(SurfaceCommand::Focus).unwrap();
        assert!(s.is_focused());
        key(&mut s, Key::Char('c'));
        let t0 = Instant::now();
        s.execute(SurfaceCommand::Blur { at: t0 }).unwrap();
        assert!(!s.is_focused());

        assert!(!s.poll_timers(t0 + Duration::from_millis(100)));
        s.execute(SurfaceCommand::CommitSuggestion { index: 0 })
            .unwrap();
        assert_eq!(s.text(), "color: ;");
        assert_eq!(s.cursor().offset, 7);
    }

    #[test]
    fn test_blur_grace_closes_popup() {
        let mut s = surface(Language::Style, "", 0);
        key(&mut s, Key::Char('c'));
        let t0 = Instant::now();
        s.execute(SurfaceCommand::Blur { at: t0 }).unwrap();

        assert!(s.poll_timers(t0 + Duration::from_millis(200)));
        assert_eq!(s.mode(), SurfaceMode::Idle);
        assert_eq!(
            s.execute(SurfaceCommand::CommitSuggestion { index: 0 }),
            Err(CommandError::NoSuggestions)
        );
    }

    #[test]
    fn test_set_cursor_out_of_range() {
        let mut s = surface(Language::Script, "ab", 0);
        assert_eq!(
            s.execute(SurfaceCommand::SetCursor { offset: 3 }),
            Err(CommandError::InvalidOffset { offset: 3, len: 2 })
        );
    }

    #[test]
    fn test_gutter_counts_trailing_line() {
        let s = surface(Language::Script, "a\nb\n", 0);
        assert_eq!(s.gutter_line_count(), 3);
        let empty = surface(Language::Script, "", 0);
        assert_eq!(empty.gutter_line_count(), 1);
    }
}

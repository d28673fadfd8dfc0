//! Screen-space geometry of the editing surface.
//!
//! The surface is two stacked layers plus a gutter:
//!
//! ```text
//! ┌────────┬──────────────────────────────┐
//! │ gutter │ highlighted overlay (visible)│
//! │  1     │ text layer (invisible, caret)│
//! └────────┴──────────────────────────────┘
//! ```
//!
//! The text layer owns the scroll offset; the overlay mirrors both axes and the gutter mirrors
//! the vertical axis, so glyphs line up exactly between the caret layer and the coloured layer.
//!
//! Caret x-positions are estimated from a fixed average glyph width, with wide (CJK) glyphs
//! counted as two cells via `unicode-width`.

use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthStr;

/// Pixel size of the host viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl Viewport {
    /// Create a viewport.
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 800.0)
    }
}

/// Fixed metrics used to place the suggestion popup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopupMetrics {
    /// Height of one text line.
    pub line_height: f32,
    /// Estimated width of one character cell.
    pub char_width: f32,
    /// X of the first text column (gutter + padding).
    pub origin_x: f32,
    /// Y offset of the first line (header + padding).
    pub origin_y: f32,
    /// Height of one popup row.
    pub row_height: f32,
    /// Popup header/padding height.
    pub chrome_height: f32,
    /// Maximum popup height.
    pub max_height: f32,
    /// Space kept free at the bottom of the viewport.
    pub bottom_margin: f32,
    /// Minimum popup y.
    pub min_y: f32,
    /// Horizontal space reserved for the popup at the right edge.
    pub width_reserve: f32,
}

impl Default for PopupMetrics {
    fn default() -> Self {
        Self {
            line_height: 26.0,
            char_width: 8.5,
            origin_x: 45.0,
            origin_y: 65.0,
            row_height: 48.0,
            chrome_height: 40.0,
            max_height: 250.0,
            bottom_margin: 80.0,
            min_y: 10.0,
            width_reserve: 280.0,
        }
    }
}

/// Top-left corner of the suggestion popup.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PopupPosition {
    /// Left edge in pixels.
    pub x: f32,
    /// Top edge in pixels.
    pub y: f32,
}

impl PopupMetrics {
    /// Height the popup occupies for `candidate_count` rows.
    pub fn popup_height(&self, candidate_count: usize) -> f32 {
        (candidate_count as f32 * self.row_height + self.chrome_height).min(self.max_height)
    }

    /// Place the popup below the caret line, flipping above it when it would overflow the
    /// bottom of the viewport.
    ///
    /// `line` is the zero-based caret line, `line_before` the text between line start and caret.
    pub fn popup_position(
        &self,
        viewport: Viewport,
        line: usize,
        line_before: &str,
        scroll_top: f32,
        candidate_count: usize,
    ) -> PopupPosition {
        let mut y = (line + 1) as f32 * self.line_height + self.origin_y - scroll_top;
        let height = self.popup_height(candidate_count);
        if y + height > viewport.height - self.bottom_margin {
            y -= height + self.chrome_height;
        }

        let columns = UnicodeWidthStr::width(line_before) as f32;
        let x = (self.origin_x + columns * self.char_width)
            .min(viewport.width - self.width_reserve);

        PopupPosition {
            x: x.max(0.0),
            y: y.max(self.min_y),
        }
    }
}

/// Scroll offset of one layer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollOffset {
    /// Vertical offset in pixels.
    pub top: f32,
    /// Horizontal offset in pixels.
    pub left: f32,
}

/// Scroll offsets of the three stacked layers.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayerScroll {
    /// Interactive text layer (source of truth).
    pub text: ScrollOffset,
    /// Highlighted overlay (mirrors both axes).
    pub overlay: ScrollOffset,
    /// Line-number gutter (mirrors the vertical axis).
    pub gutter_top: f32,
}

impl LayerScroll {
    /// Copy the text layer's offset onto the overlay and gutter.
    pub fn sync(&mut self) {
        self.overlay = self.text;
        self.gutter_top = self.text.top;
    }

    /// Returns `true` if overlay and gutter match the text layer.
    pub fn is_synced(&self) -> bool {
        self.overlay == self.text && self.gutter_top == self.text.top
    }

    /// Scroll the text layer vertically so that `line` is fully visible.
    pub fn reveal_line(&mut self, line: usize, line_height: f32, viewport_height: f32) {
        let line_top = line as f32 * line_height;
        let line_bottom = line_top + line_height;
        if line_top < self.text.top {
            self.text.top = line_top;
        } else if viewport_height > 0.0 && line_bottom > self.text.top + viewport_height {
            self.text.top = line_bottom - viewport_height;
        }
    }
}

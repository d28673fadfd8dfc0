#![warn(missing_docs)]
//! Playground Core - Headless Editing Surface
//!
//! # Overview
//!
//! `playground-core` holds everything a three-pane code playground needs in order to edit its
//! markup, style and script buffers, without rendering anything itself. The host draws the
//! gutter, the highlighted overlay and the suggestion popup from the state exposed here.
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  EditingSurface (commands, state machine)   │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  IntelliCode (expansion + suggestions)      │  ← Token engines
//! ├─────────────────────────────────────────────┤
//! │  Geometry (popup placement, layer scroll)   │  ← Layout
//! ├─────────────────────────────────────────────┤
//! │  SourceBuffer (Rope-based)                  │  ← Text Storage
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use playground_core::{EditingSurface, EditorConfig, Key, SurfaceCommand, SurfaceMode};
//! use playground_lang::Language;
//!
//! let mut surface = EditingSurface::new(Language::Script, "", &EditorConfig::default());
//! for ch in "con".chars() {
//!     surface.execute(SurfaceCommand::Key(Key::Char(ch))).unwrap();
//! }
//! assert_eq!(surface.mode(), SurfaceMode::Suggesting);
//! assert_eq!(surface.suggestion().unwrap().candidates, vec!["console.log", "const"]);
//!
//! surface.execute(SurfaceCommand::Key(Key::Enter)).unwrap();
//! assert_eq!(surface.text(), "console.log");
//! ```
//!
//! # Module Description
//!
//! - [`buffer`] - Rope based source buffer
//! - [`delta`] - Structured text change deltas
//! - [`intellicode`] - Abbreviation expansion and completion candidates
//! - [`geometry`] - Popup placement and layer scroll offsets
//! - [`surface`] - Editing surface state machine
//! - [`format`] - External formatter seam
//! - [`config`] - TOML configuration
//!
//! # Unicode Support
//!
//! - All offsets are character offsets (Unicode scalar values)
//! - Backspace, Delete and horizontal caret moves step over whole grapheme clusters
//! - CJK double-width characters count as two cells when placing the popup

pub mod buffer;
pub mod code;
pub mod config;
pub mod delta;
pub mod format;
pub mod geometry;
pub mod intellicode;
pub mod surface;

pub use buffer::SourceBuffer;
pub use code::CodeState;
pub use config::{ConfigError, EditorConfig, PlaygroundConfig, PreviewConfig};
pub use delta::{TextDelta, TextEditSpec};
pub use format::{FormatError, FormatOptions, FormatOutcome, Formatter, QuoteStyle};
pub use geometry::{LayerScroll, PopupMetrics, PopupPosition, ScrollOffset, Viewport};
pub use intellicode::{Expansion, expand, expand_candidate, suggest};
pub use surface::{
    CommandError, CommandResult, CursorState, EditingSurface, Key, SuggestionState,
    SurfaceCommand, SurfaceMode,
};

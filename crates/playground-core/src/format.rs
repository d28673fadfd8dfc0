//! Formatting collaborator.
//!
//! Formatting is an external service (`format(text, parser, options) -> text | error`). The
//! editing surface only hands over the whole buffer and decides what to do with the result.

use playground_lang::ParserKind;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Quote preference passed to the formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStyle {
    /// Prefer `"`.
    Double,
    /// Prefer `'`.
    Single,
}

/// Options handed to the formatter on every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    /// Preferred maximum line width.
    pub print_width: u16,
    /// Indentation width in spaces.
    pub tab_width: u8,
    /// Terminate statements with semicolons.
    pub use_semicolons: bool,
    /// Quote preference for strings.
    pub quote_style: QuoteStyle,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            print_width: 80,
            tab_width: 2,
            use_semicolons: true,
            quote_style: QuoteStyle::Double,
        }
    }
}

/// Recoverable formatter failure. The buffer is never touched when this is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// The source could not be parsed (usually incomplete code).
    #[error("cannot format incomplete {parser:?} source: {message}")]
    Syntax {
        /// Parser that rejected the input.
        parser: ParserKind,
        /// Message reported by the formatter.
        message: String,
    },
    /// The formatting service is not reachable / not configured.
    #[error("formatter unavailable: {0}")]
    Unavailable(String),
}

/// External formatting service.
pub trait Formatter {
    /// Format `source` with the given parser family.
    fn format(
        &self,
        source: &str,
        parser: ParserKind,
        options: &FormatOptions,
    ) -> Result<String, FormatError>;
}

impl<F> Formatter for F
where
    F: Fn(&str, ParserKind, &FormatOptions) -> Result<String, FormatError>,
{
    fn format(
        &self,
        source: &str,
        parser: ParserKind,
        options: &FormatOptions,
    ) -> Result<String, FormatError> {
        self(source, parser, options)
    }
}

/// What a manual "Format" action did to the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatOutcome {
    /// The result only differed in leading/trailing whitespace (or not at all).
    Unchanged,
    /// The buffer was replaced with the formatted text.
    Replaced(crate::TextDelta),
}

//! Abbreviation expansion and completion candidates.
//!
//! Both engines look only at the *trailing token*: the longest run of `[a-zA-Z0-9_!:-]`
//! immediately before the caret. There is no parsing involved.
//!
//! - [`expand`] is the Tab path: it only fires for a snippet trigger or (markup) a known tag.
//! - [`expand_candidate`] commits a named candidate with the full resolution order:
//!   snippet table, markup tag pair, style declaration, script literal.
//! - [`suggest`] filters the language's candidate table by case-insensitive prefix.

use crate::delta::{TextEditSpec, byte_index};
use playground_lang::{CURSOR_PLACEHOLDER, Language, is_token_char};
use std::borrow::Cow;

/// Longest suffix of `before` made of token characters (may be empty).
pub fn trailing_token(before: &str) -> &str {
    let start = before
        .char_indices()
        .rev()
        .take_while(|(_, ch)| is_token_char(*ch))
        .last()
        .map(|(index, _)| index)
        .unwrap_or(before.len());
    &before[start..]
}

/// Result of an abbreviation expansion: one text edit plus the caret placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    /// Replaces the trailing token with the expanded body.
    pub edit: TextEditSpec,
    /// Caret offset in the post-edit text.
    pub cursor: usize,
}

impl Expansion {
    /// Apply the edit to `text` (the same text the expansion was computed from).
    pub fn apply(&self, text: &str) -> String {
        self.edit.apply(text)
    }
}

/// Tab-key expansion of the token before `cursor`.
///
/// Returns `None` when the token is empty, or is neither a snippet trigger nor (markup only) a
/// known bare tag name.
pub fn expand(text: &str, cursor: usize, language: Language) -> Option<Expansion> {
    let before = &text[..byte_index(text, cursor)];
    let token = trailing_token(before);
    if token.is_empty() {
        return None;
    }
    if language.snippet(token).is_none() && !language.is_known_tag(token) {
        return None;
    }
    Some(expand_candidate(text, cursor, language, token))
}

/// Replace the token before `cursor` with the expansion of `name`.
///
/// Never fails: names without a dedicated rule are inserted literally.
pub fn expand_candidate(text: &str, cursor: usize, language: Language, name: &str) -> Expansion {
    let cursor_byte = byte_index(text, cursor);
    let cursor = text[..cursor_byte].chars().count();
    let token_len = trailing_token(&text[..cursor_byte]).chars().count();
    let start = cursor - token_len;

    let body = expansion_body(language, name);
    let (inserted, caret) = match body.find(CURSOR_PLACEHOLDER) {
        Some(at) => (
            body.replacen(CURSOR_PLACEHOLDER, "", 1),
            body[..at].chars().count(),
        ),
        None => (body.to_string(), body.chars().count()),
    };

    Expansion {
        edit: TextEditSpec {
            start,
            end: cursor,
            text: inserted,
        },
        cursor: start + caret,
    }
}

/// Body text (with placeholder) that `name` expands to in `language`.
pub fn expansion_body(language: Language, name: &str) -> Cow<'static, str> {
    if let Some(body) = language.snippet(name) {
        return Cow::Borrowed(body);
    }
    match language {
        Language::Markup => Cow::Owned(format!("<{name}>{CURSOR_PLACEHOLDER}</{name}>")),
        Language::Style => Cow::Owned(format!("{name}: {CURSOR_PLACEHOLDER};")),
        Language::Script => Cow::Owned(name.to_string()),
    }
}

/// Candidates whose prefix matches the token before `cursor`, case-insensitively.
///
/// Table order is preserved. An empty token yields no candidates.
pub fn suggest(text: &str, cursor: usize, language: Language) -> Vec<&'static str> {
    let before = &text[..byte_index(text, cursor)];
    candidates_for_token(trailing_token(before), language)
}

/// Filter the candidate table of `language` by `token`.
pub fn candidates_for_token(token: &str, language: Language) -> Vec<&'static str> {
    if token.is_empty() {
        return Vec::new();
    }
    let needle = token.to_lowercase();
    language
        .candidates()
        .iter()
        .copied()
        .filter(|candidate| candidate.to_lowercase().starts_with(&needle))
        .collect()
}

#![warn(missing_docs)]
//! `playground-lang` - data-driven language tables for the playground editor.
//!
//! This crate intentionally stays lightweight and does **not** depend on any highlighting or
//! editing machinery. It provides the static tables the editing surface consults on every
//! keystroke:
//!
//! - snippet (abbreviation) bodies keyed by a short trigger
//! - ranked completion candidates
//! - auto-closing pairs
//! - the parser kind handed to an external formatter

use serde::{Deserialize, Serialize};

/// Marker inside a snippet body that tells the engine where the caret lands after expansion.
pub const CURSOR_PLACEHOLDER: &str = "$CURSOR$";

/// One of the three independent source buffers of a playground.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Language {
    /// HTML markup.
    #[serde(rename = "html")]
    Markup,
    /// CSS styles.
    #[serde(rename = "css")]
    Style,
    /// JavaScript.
    #[serde(rename = "js")]
    Script,
}

impl Language {
    /// All languages, in pane order.
    pub const ALL: [Language; 3] = [Language::Markup, Language::Style, Language::Script];

    /// Short identifier (`html`, `css`, `js`).
    pub fn as_str(self) -> &'static str {
        match self {
            Language::Markup => "html",
            Language::Style => "css",
            Language::Script => "js",
        }
    }

    /// Parser family an external formatter should use for this buffer.
    pub fn parser_kind(self) -> ParserKind {
        match self {
            Language::Markup => ParserKind::Html,
            Language::Style => ParserKind::Css,
            Language::Script => ParserKind::Babel,
        }
    }

    /// Snippet table, in declaration order.
    pub fn snippets(self) -> &'static [Snippet] {
        match self {
            Language::Markup => MARKUP_SNIPPETS,
            Language::Style => STYLE_SNIPPETS,
            Language::Script => SCRIPT_SNIPPETS,
        }
    }

    /// Look up a snippet body by its exact trigger.
    pub fn snippet(self, trigger: &str) -> Option<&'static str> {
        self.snippets()
            .iter()
            .find(|snippet| snippet.trigger == trigger)
            .map(|snippet| snippet.body)
    }

    /// Ranked completion candidates (table order is the ranking).
    pub fn candidates(self) -> &'static [&'static str] {
        match self {
            Language::Markup => MARKUP_CANDIDATES,
            Language::Style => STYLE_CANDIDATES,
            Language::Script => SCRIPT_CANDIDATES,
        }
    }

    /// Returns `true` if `name` is a bare tag name that markup expansion can wrap.
    ///
    /// Only meaningful for [`Language::Markup`]; other languages never match.
    pub fn is_known_tag(self, name: &str) -> bool {
        self == Language::Markup && MARKUP_CANDIDATES.contains(&name)
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parser family understood by the external formatting service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParserKind {
    /// HTML parser.
    Html,
    /// CSS (PostCSS) parser.
    Css,
    /// JavaScript (Babel) parser.
    Babel,
}

/// A named abbreviation and the text it expands to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snippet {
    /// Short mnemonic typed before the caret.
    pub trigger: &'static str,
    /// Expansion; may contain a single [`CURSOR_PLACEHOLDER`].
    pub body: &'static str,
}

const fn snippet(trigger: &'static str, body: &'static str) -> Snippet {
    Snippet { trigger, body }
}

static MARKUP_SNIPPETS: &[Snippet] = &[
    snippet(
        "!",
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n  <meta charset=\"UTF-8\">\n  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n  <title>Document</title>\n</head>\n<body>\n  $CURSOR$\n</body>\n</html>",
    ),
    snippet(
        "viewport",
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">",
    ),
    snippet(
        "flex",
        "<div style=\"display: flex; justify-content: center; align-items: center;\">\n  $CURSOR$\n</div>",
    ),
    snippet(
        "grid",
        "<div style=\"display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 1rem;\">\n  $CURSOR$\n</div>",
    ),
];

static STYLE_SNIPPETS: &[Snippet] = &[
    snippet(
        "flex-center",
        "display: flex;\njustify-content: center;\nalign-items: center;",
    ),
    snippet(
        "glass",
        "background: rgba(255, 255, 255, 0.05);\nbackdrop-filter: blur(12px);\nborder: 1px solid rgba(255, 255, 255, 0.1);\nborder-radius: 1rem;",
    ),
];

static SCRIPT_SNIPPETS: &[Snippet] = &[
    snippet("clg", "console.log($CURSOR$);"),
    snippet("ae", "addEventListener('$CURSOR$', (e) => {\n  \n});"),
];

static MARKUP_CANDIDATES: &[&str] = &[
    "!", "div", "span", "p", "h1", "h2", "section", "main", "header", "footer", "article",
    "aside", "nav", "ul", "li", "form", "input", "button", "img", "a", "link", "script", "style",
    "meta",
];

static STYLE_CANDIDATES: &[&str] = &[
    "display",
    "flex",
    "grid",
    "position",
    "width",
    "height",
    "margin",
    "padding",
    "background",
    "color",
    "font-family",
    "font-size",
    "border",
    "border-radius",
    "opacity",
    "transition",
    "transform",
];

static SCRIPT_CANDIDATES: &[&str] = &[
    "console.log",
    "const",
    "let",
    "function",
    "return",
    "async",
    "await",
    "if",
    "else",
    "for",
    "document.querySelector",
    "addEventListener",
    "fetch",
    "JSON.parse",
    "map",
    "filter",
];

/// Characters that are inserted together with their closer.
pub const AUTO_PAIRS: [(char, char); 5] = [
    ('{', '}'),
    ('(', ')'),
    ('[', ']'),
    ('"', '"'),
    ('\'', '\''),
];

/// Returns the closing character for an auto-paired opener.
pub fn closing_pair(open: char) -> Option<char> {
    AUTO_PAIRS
        .iter()
        .find(|(o, _)| *o == open)
        .map(|(_, close)| *close)
}

/// Returns `true` if `ch` can be part of an abbreviation / completion token.
///
/// Tokens are the longest trailing run of `[a-zA-Z0-9_!:-]` before the caret.
pub fn is_token_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '_' | '!' | ':' | '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_placeholder_appears_at_most_once() {
        for language in Language::ALL {
            for snippet in language.snippets() {
                assert!(
                    snippet.body.matches(CURSOR_PLACEHOLDER).count() <= 1,
                    "{language}:{} has several placeholders",
                    snippet.trigger
                );
            }
        }
    }

    #[test]
    fn test_snippet_lookup_is_exact() {
        assert!(Language::Script.snippet("clg").is_some());
        assert!(Language::Script.snippet("CLG").is_none());
        assert!(Language::Markup.snippet("clg").is_none());
    }

    #[test]
    fn test_known_tags_only_for_markup() {
        assert!(Language::Markup.is_known_tag("div"));
        assert!(!Language::Markup.is_known_tag("blink"));
        assert!(!Language::Style.is_known_tag("div"));
    }

    #[test]
    fn test_closing_pairs() {
        assert_eq!(closing_pair('{'), Some('}'));
        assert_eq!(closing_pair('\''), Some('\''));
        assert_eq!(closing_pair('<'), None);
    }

    #[test]
    fn test_language_serde_uses_short_names() {
        let json = serde_json::to_string(&Language::Script).unwrap();
        assert_eq!(json, "\"js\"");
        let back: Language = serde_json::from_str("\"css\"").unwrap();
        assert_eq!(back, Language::Style);
    }

    #[test]
    fn test_token_chars() {
        for ch in ['a', 'Z', '0', '_', '!', ':', '-'] {
            assert!(is_token_char(ch));
        }
        for ch in [' ', '.', '(', '<', '\n', 'é'] {
            assert!(!is_token_char(ch));
        }
    }
}

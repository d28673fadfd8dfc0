//! `playground-highlight` - regex-based highlighting for the playground's three buffers.
//!
//! This is a lexical heuristic, *not* a parser. Each language has one ordered list of
//! [`RegexRule`]s compiled into a single alternation; the text is scanned once, left to right,
//! and the first alternative that matches at the leftmost position wins. Unterminated
//! constructs simply fail to match and stay uncoloured.
//!
//! All matching happens on the HTML-escaped text, so the rendered output is always safe to
//! inject as markup. Entities produced by escaping are never split across a span boundary.

#![warn(missing_docs)]

mod palette;

pub use palette::{SyntaxPalette, Theme};

use playground_lang::Language;
use regex::Regex;
use std::ops::Range;

/// Lexical class of a highlighted token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Comment (any language).
    Comment,
    /// Opening/closing tag name, including the escaped `<` / `</`.
    Tag,
    /// Bare attribute name before `=`.
    Attribute,
    /// Quoted string / template literal.
    String,
    /// Style selector right before `{`.
    Selector,
    /// Style property name.
    Property,
    /// Style property value (after the `:`).
    Value,
    /// Script keyword.
    Keyword,
    /// Identifier right before `(`.
    Call,
}

impl TokenKind {
    /// Palette colour used for this token kind.
    pub fn color(self, palette: &SyntaxPalette) -> &str {
        match self {
            TokenKind::Comment => &palette.comment,
            TokenKind::Tag | TokenKind::Selector | TokenKind::Property => &palette.tag,
            TokenKind::Attribute => &palette.attr,
            TokenKind::String | TokenKind::Value => &palette.string,
            TokenKind::Keyword => &palette.keyword,
            TokenKind::Call => &palette.variable,
        }
    }
}

/// A coloured region of the *escaped* text (byte offsets, half-open).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightSpan {
    /// Byte range in the escaped text.
    pub range: Range<usize>,
    /// Colour class.
    pub kind: TokenKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RuleClass {
    Token(TokenKind),
    /// `:value` run; split at the first `:` into property and value parts.
    Declaration,
}

/// A single alternative of a language grammar.
#[derive(Debug, Clone)]
pub struct RegexRule {
    pattern: &'static str,
    lookahead: Option<&'static str>,
    class: RuleClass,
}

impl RegexRule {
    /// A rule colouring every match of `pattern` as `kind`.
    pub fn new(pattern: &'static str, kind: TokenKind) -> Self {
        Self {
            pattern,
            lookahead: None,
            class: RuleClass::Token(kind),
        }
    }

    fn declaration(pattern: &'static str) -> Self {
        Self {
            pattern,
            lookahead: None,
            class: RuleClass::Declaration,
        }
    }

    /// Require `pattern` to follow the token without consuming it.
    ///
    /// The suffix is matched as part of the alternation, but scanning resumes right after the
    /// token, so the suffix can still start the next token.
    pub fn followed_by(mut self, pattern: &'static str) -> Self {
        self.lookahead = Some(pattern);
        self
    }
}

/// One compiled, ordered alternation of [`RegexRule`]s.
#[derive(Debug, Clone)]
pub struct Grammar {
    regex: Regex,
    classes: Vec<RuleClass>,
}

impl Grammar {
    /// Compile `rules` into one alternation; earlier rules take precedence.
    pub fn new(rules: Vec<RegexRule>, case_insensitive: bool) -> Result<Self, regex::Error> {
        let alternatives: Vec<String> = rules
            .iter()
            .map(|rule| match rule.lookahead {
                Some(suffix) => format!("({})(?:{})", rule.pattern, suffix),
                None => format!("({})", rule.pattern),
            })
            .collect();
        let flags = if case_insensitive { "(?i)" } else { "" };
        let pattern = format!("{flags}(?:{})", alternatives.join("|"));

        Ok(Self {
            regex: Regex::new(&pattern)?,
            classes: rules.iter().map(|rule| rule.class).collect(),
        })
    }

    /// Markup: comments, tag names, attribute names, quoted values.
    pub fn markup() -> Result<Self, regex::Error> {
        Self::new(
            vec![
                RegexRule::new(r"&lt;!--.*?--&gt;", TokenKind::Comment),
                RegexRule::new(r"&lt;/?[a-zA-Z0-9]+\b", TokenKind::Tag),
                RegexRule::new(r"(?:\s|^)[a-zA-Z0-9-]+", TokenKind::Attribute).followed_by("="),
                RegexRule::new(r#"".*?""#, TokenKind::String),
                RegexRule::new(r"'.*?'", TokenKind::String),
            ],
            true,
        )
    }

    /// Style: block comments, selectors, property names, `:value` runs.
    pub fn style() -> Result<Self, regex::Error> {
        Self::new(
            vec![
                RegexRule::new(r"/\*[\s\S]*?\*/", TokenKind::Comment),
                RegexRule::new(
                    r"(?:\.[a-zA-Z0-9_-]+|#[a-zA-Z0-9_-]+|[a-z-]+)",
                    TokenKind::Selector,
                )
                .followed_by(r"\s*\{"),
                RegexRule::new(r"[a-z-]+", TokenKind::Property).followed_by(r"\s*:"),
                RegexRule::declaration(r":\s*(?:&(?:amp|lt|gt);|[^;{}])+"),
            ],
            true,
        )
    }

    /// Script: comments, string/template literals, keywords, call sites.
    pub fn script() -> Result<Self, regex::Error> {
        Self::new(
            vec![
                RegexRule::new(r"//.*|/\*[\s\S]*?\*/", TokenKind::Comment),
                RegexRule::new(r#"".*?"|'.*?'|`[\s\S]*?`"#, TokenKind::String),
                RegexRule::new(
                    r"\b(?:const|let|var|function|return|if|else|for|while|async|await|this|try|catch|import|export|class|new)\b",
                    TokenKind::Keyword,
                ),
                RegexRule::new(r"\b[a-zA-Z0-9_]+", TokenKind::Call).followed_by(r"\("),
            ],
            false,
        )
    }

    /// Tokenize already-escaped text in a single left-to-right pass.
    pub fn spans(&self, escaped: &str) -> Vec<HighlightSpan> {
        let mut spans = Vec::new();
        let mut pos = 0;

        while pos < escaped.len() {
            let Some(caps) = self.regex.captures_at(escaped, pos) else {
                break;
            };
            let Some((index, token)) = self
                .classes
                .iter()
                .enumerate()
                .find_map(|(i, _)| caps.get(i + 1).map(|m| (i, m)))
            else {
                break;
            };

            match self.classes[index] {
                RuleClass::Token(kind) => spans.push(HighlightSpan {
                    range: token.range(),
                    kind,
                }),
                RuleClass::Declaration => {
                    push_declaration(&mut spans, token.start(), token.as_str());
                }
            }

            // Every alternative consumes at least one byte.
            pos = token.end().max(pos + 1);
        }

        spans
    }
}

fn push_declaration(spans: &mut Vec<HighlightSpan>, start: usize, text: &str) {
    let Some((property, _)) = text.split_once(':') else {
        spans.push(HighlightSpan {
            range: start..start + text.len(),
            kind: TokenKind::Value,
        });
        return;
    };
    let colon = start + property.len();
    if !property.is_empty() {
        spans.push(HighlightSpan {
            range: start..colon,
            kind: TokenKind::Property,
        });
    }
    if colon + 1 < start + text.len() {
        spans.push(HighlightSpan {
            range: colon + 1..start + text.len(),
            kind: TokenKind::Value,
        });
    }
}

/// The three language grammars, compiled once and reused on every keystroke.
#[derive(Debug, Clone)]
pub struct Highlighter {
    markup: Grammar,
    style: Grammar,
    script: Grammar,
}

impl Highlighter {
    /// Compile the markup, style and script grammars.
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            markup: Grammar::markup()?,
            style: Grammar::style()?,
            script: Grammar::script()?,
        })
    }

    /// Grammar used for `language`.
    pub fn grammar(&self, language: Language) -> &Grammar {
        match language {
            Language::Markup => &self.markup,
            Language::Style => &self.style,
            Language::Script => &self.script,
        }
    }

    /// Render `text` as HTML with inline colour spans.
    ///
    /// Empty input renders as an empty string.
    pub fn highlight(&self, text: &str, language: Language, palette: &SyntaxPalette) -> String {
        if text.is_empty() {
            return String::new();
        }
        let escaped = escape_html(text);
        let spans = self.grammar(language).spans(&escaped);
        render_html(&escaped, &spans, palette)
    }
}

/// Escape the three HTML-sensitive characters (`&`, `<`, `>`).
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            other => out.push(other),
        }
    }
    out
}

/// Wrap each span of `escaped` in `<span style="color: ...">`; the rest is copied verbatim.
///
/// `spans` must be sorted and non-overlapping, as produced by [`Grammar::spans`].
pub fn render_html(escaped: &str, spans: &[HighlightSpan], palette: &SyntaxPalette) -> String {
    let mut out = String::with_capacity(escaped.len() + spans.len() * 32);
    let mut last = 0;
    for span in spans {
        out.push_str(&escaped[last..span.range.start]);
        out.push_str("<span style=\"color: ");
        out.push_str(span.kind.color(palette));
        out.push_str("\">");
        out.push_str(&escaped[span.range.clone()]);
        out.push_str("</span>");
        last = span.range.end;
    }
    out.push_str(&escaped[last..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(grammar: &Grammar, escaped: &str) -> Vec<(String, TokenKind)> {
        grammar
            .spans(escaped)
            .into_iter()
            .map(|span| (escaped[span.range].to_string(), span.kind))
            .collect()
    }

    #[test]
    fn test_markup_tokens() {
        let grammar = Grammar::markup().unwrap();
        let escaped = escape_html(r#"<!-- hi --><div id="x" class='y'></div>"#);
        assert_eq!(
            kinds(&grammar, &escaped),
            vec![
                ("&lt;!-- hi --&gt;".to_string(), TokenKind::Comment),
                ("&lt;div".to_string(), TokenKind::Tag),
                (" id".to_string(), TokenKind::Attribute),
                ("\"x\"".to_string(), TokenKind::String),
                (" class".to_string(), TokenKind::Attribute),
                ("'y'".to_string(), TokenKind::String),
                ("&lt;/div".to_string(), TokenKind::Tag),
            ]
        );
    }

    #[test]
    fn test_style_selector_property_value() {
        let grammar = Grammar::style().unwrap();
        let escaped = escape_html("#x{color:red;}");
        assert_eq!(
            kinds(&grammar, &escaped),
            vec![
                ("#x".to_string(), TokenKind::Selector),
                ("color".to_string(), TokenKind::Property),
                ("red".to_string(), TokenKind::Value),
            ]
        );
    }

    #[test]
    fn test_style_value_keeps_later_colons() {
        let highlighter = Highlighter::new().unwrap();
        let palette = SyntaxPalette::default();
        let html = highlighter.highlight(
            "a { background: url(http://x.test/a.png); }",
            Language::Style,
            &palette,
        );
        assert!(html.contains("url(http://x.test/a.png)"));
    }

    #[test]
    fn test_style_value_keeps_entities_whole() {
        let grammar = Grammar::style().unwrap();
        let escaped = escape_html("p { content: a&b<c>; }");
        assert_eq!(
            kinds(&grammar, &escaped),
            vec![
                ("p".to_string(), TokenKind::Selector),
                ("content".to_string(), TokenKind::Property),
                (" a&amp;b&lt;c&gt;".to_string(), TokenKind::Value),
            ]
        );
    }

    #[test]
    fn test_script_keyword_wins_over_call_site() {
        let grammar = Grammar::script().unwrap();
        let escaped = escape_html("if (ok) run(1); // done");
        assert_eq!(
            kinds(&grammar, &escaped),
            vec![
                ("if".to_string(), TokenKind::Keyword),
                ("run".to_string(), TokenKind::Call),
                ("// done".to_string(), TokenKind::Comment),
            ]
        );
    }

    #[test]
    fn test_script_strings_hide_keywords() {
        let grammar = Grammar::script().unwrap();
        let escaped = escape_html("const s = \"return x\";");
        let tokens = kinds(&grammar, &escaped);
        assert_eq!(tokens[0], ("const".to_string(), TokenKind::Keyword));
        assert_eq!(tokens[1], ("\"return x\"".to_string(), TokenKind::String));
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn test_unterminated_string_degrades() {
        let highlighter = Highlighter::new().unwrap();
        let palette = SyntaxPalette::default();
        let html = highlighter.highlight("let s = \"open\nlet t = 1;", Language::Script, &palette);
        assert!(html.contains("\"open"));
        assert_eq!(html.matches(&palette.keyword).count(), 2);
    }

    #[test]
    fn test_highlight_escapes_user_markup() {
        let highlighter = Highlighter::new().unwrap();
        let palette = SyntaxPalette::default();
        let html = highlighter.highlight("x < 1 && y > 2", Language::Script, &palette);
        assert_eq!(html, "x &lt; 1 &amp;&amp; y &gt; 2");
    }

    #[test]
    fn test_empty_input_renders_empty() {
        let highlighter = Highlighter::new().unwrap();
        assert_eq!(
            highlighter.highlight("", Language::Markup, &SyntaxPalette::default()),
            ""
        );
    }
}

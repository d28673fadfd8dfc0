//! The three source texts of a playground, as handed to / from persistence.

use playground_lang::Language;
use serde::{Deserialize, Serialize};

/// Snapshot of the markup, style and script buffers.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CodeState {
    /// Markup buffer.
    pub html: String,
    /// Style buffer.
    pub css: String,
    /// Script buffer.
    pub js: String,
}

impl CodeState {
    /// Create a snapshot from three texts.
    pub fn new(html: impl Into<String>, css: impl Into<String>, js: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            css: css.into(),
            js: js.into(),
        }
    }

    /// Text of one language slot.
    pub fn get(&self, language: Language) -> &str {
        match language {
            Language::Markup => &self.html,
            Language::Style => &self.css,
            Language::Script => &self.js,
        }
    }

    /// Replace the text of one language slot.
    pub fn set(&mut self, language: Language, text: impl Into<String>) {
        let slot = match language {
            Language::Markup => &mut self.html,
            Language::Style => &mut self.css,
            Language::Script => &mut self.js,
        };
        *slot = text.into();
    }

    /// Starter project shown for a fresh session or "new project".
    pub fn starter() -> Self {
        Self::new(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n  <meta charset=\"UTF-8\">\n  <title>Playground</title>\n</head>\n<body>\n  <div class=\"card\">\n    <h1>Playground</h1>\n    <p>Edit HTML, CSS and JS side by side.</p>\n    <div class=\"badge\">Live</div>\n  </div>\n</body>\n</html>",
            "body {\n  color: #333;\n  font-family: 'Inter', sans-serif;\n  display: flex;\n  justify-content: center;\n  align-items: center;\n  min-height: 100vh;\n  margin: 0;\n}\n\n.card {\n  padding: 3rem;\n  border-radius: 2rem;\n  background: rgba(0,0,0,0.05);\n  text-align: center;\n  max-width: 400px;\n}\n\n.badge {\n  display: inline-block;\n  margin-top: 2rem;\n  padding: 0.5rem 1.5rem;\n  border-radius: 1rem;\n  font-weight: 900;\n  text-transform: uppercase;\n}",
            "// Welcome to the playground!\nconsole.log(\"Ready.\");\n\nconst status = \"ONLINE\";\ndocument.querySelector('.badge').innerText = status;",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_access() {
        let mut code = CodeState::default();
        code.set(Language::Style, "p {}");
        assert_eq!(code.get(Language::Style), "p {}");
        assert_eq!(code.get(Language::Markup), "");
    }

    #[test]
    fn test_json_shape() {
        let code = CodeState::new("<p>", "p{}", "1");
        let json = serde_json::to_value(&code).unwrap();
        assert_eq!(json["html"], "<p>");
        assert_eq!(json["css"], "p{}");
        assert_eq!(json["js"], "1");
    }
}

//! Document Assembler
//!
//! Concatenates the three buffers into one standalone document:
//!
//! ```text
//! <!DOCTYPE html>
//! <html lang="en">
//!   <head>
//!     <meta charset="UTF-8">
//!     relay script
//!     <style> baseline reset + style buffer </style>
//!   </head>
//!   <body>
//!     markup buffer
//!     <script>try { script buffer } catch (err) { console.error(err.message); }</script>
//!   </body>
//! </html>
//! ```
//!
//! Buffers are inserted verbatim. Isolation is the sandbox's job, not the assembler's.

use crate::relay::RELAY_SCRIPT;
use playground_core::CodeState;

/// Baseline styles applied before the user's stylesheet.
pub const BASELINE_RESET: &str = "body {
        margin: 0;
        padding: 1rem;
        font-family: sans-serif;
        background: #ffffff;
        color: #000000;
        min-height: 100vh;
      }";

/// An assembled preview document. Never patched, only rebuilt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledDocument {
    source: CodeState,
    html: String,
}

impl AssembledDocument {
    /// Buffers the document was built from.
    pub fn source(&self) -> &CodeState {
        &self.source
    }

    /// The complete document text.
    pub fn as_str(&self) -> &str {
        &self.html
    }

    /// The user script as wrapped in the document.
    pub fn wrapped_script(&self) -> String {
        wrap_script(&self.source.js)
    }
}

/// Wrap user script so that a thrown error is relayed instead of aborting silently.
pub fn wrap_script(script: &str) -> String {
    format!("try {{ {script} }} catch (err) {{ console.error(err.message); }}")
}

/// Build the preview document for `code`.
pub fn assemble(code: &CodeState) -> AssembledDocument {
    let html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="UTF-8">
    {relay}
    <style>
      {reset}
      {css}
    </style>
  </head>
  <body>
    {markup}
    <script>{script}</script>
  </body>
</html>
"#,
        relay = RELAY_SCRIPT,
        reset = BASELINE_RESET,
        css = code.css,
        markup = code.html,
        script = wrap_script(&code.js),
    );

    AssembledDocument {
        source: code.clone(),
        html,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections_in_order() {
        let doc = assemble(&CodeState::new("<p id=\"a\">hi</p>", "p{color:red}", "go()"));
        let text = doc.as_str();

        let relay = text.find("playground-console").unwrap();
        let reset = text.find("min-height: 100vh").unwrap();
        let css = text.find("p{color:red}").unwrap();
        let markup = text.find("<p id=\"a\">hi</p>").unwrap();
        let script = text.find("try { go() } catch (err)").unwrap();

        assert!(text.starts_with("<!DOCTYPE html>"));
        assert!(relay < reset && reset < css && css < markup && markup < script);
    }

    #[test]
    fn test_buffers_are_verbatim() {
        let markup = "<script>alert('x')</script><!-- $CURSOR$ -->";
        let doc = assemble(&CodeState::new(markup, "", ""));
        assert!(doc.as_str().contains(markup));
        assert_eq!(doc.source().html, markup);
    }

    #[test]
    fn test_empty_buffers_still_produce_document() {
        let doc = assemble(&CodeState::default());
        assert!(doc.as_str().contains("<body>"));
        assert_eq!(
            doc.wrapped_script(),
            "try {  } catch (err) { console.error(err.message); }"
        );
    }
}

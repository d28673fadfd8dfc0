use serde::{Deserialize, Serialize};

/// The six syntax colours a theme provides to the highlighter.
///
/// Values are CSS colour strings and are written into `style` attributes verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxPalette {
    /// Script keywords.
    pub keyword: String,
    /// Strings, attribute values and style values.
    pub string: String,
    /// Comments.
    pub comment: String,
    /// Tag names, selectors and style properties.
    pub tag: String,
    /// Markup attribute names.
    pub attr: String,
    /// Call sites.
    pub variable: String,
}

impl SyntaxPalette {
    /// Build a palette from six CSS colour strings.
    pub fn new(
        keyword: impl Into<String>,
        string: impl Into<String>,
        comment: impl Into<String>,
        tag: impl Into<String>,
        attr: impl Into<String>,
        variable: impl Into<String>,
    ) -> Self {
        Self {
            keyword: keyword.into(),
            string: string.into(),
            comment: comment.into(),
            tag: tag.into(),
            attr: attr.into(),
            variable: variable.into(),
        }
    }
}

impl Default for SyntaxPalette {
    fn default() -> Self {
        Self::new("#ff79c6", "#50fa7b", "#6272a4", "#8be9fd", "#ffb86c", "#bd93f9")
    }
}

/// What the editing surface needs from the (external) theme catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    /// Display name.
    pub name: String,
    /// Light themes get a dark caret.
    #[serde(default)]
    pub is_light: bool,
    /// Syntax colours.
    pub syntax: SyntaxPalette,
}

impl Theme {
    /// Caret colour for the invisible text layer.
    pub fn caret_color(&self) -> &'static str {
        if self.is_light { "#0f172a" } else { "#22d3ee" }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "Obsidian Neon".to_string(),
            is_light: false,
            syntax: SyntaxPalette::default(),
        }
    }
}

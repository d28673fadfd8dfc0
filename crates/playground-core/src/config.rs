//! Playground configuration.
//!
//! Every field has a default, so a config file only needs the keys it changes:
//!
//! ```rust
//! use playground_core::PlaygroundConfig;
//!
//! let config = PlaygroundConfig::from_toml_str(
//!     r#"
//!     [preview]
//!     debounce_ms = 300
//!     "#,
//! )
//! .unwrap();
//! assert_eq!(config.preview.debounce_ms, 300);
//! assert_eq!(config.preview.console_capacity, 50);
//! ```

use crate::format::FormatOptions;
use crate::geometry::PopupMetrics;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Configuration loading error.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML document is malformed or has wrongly typed values.
    #[error("invalid playground config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A value is well-typed but unusable.
    #[error("invalid value for `{key}`: {reason}")]
    Invalid {
        /// Offending key.
        key: &'static str,
        /// Why it was rejected.
        reason: &'static str,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaygroundConfig {
    /// Editing surface settings.
    pub editor: EditorConfig,
    /// Live preview settings.
    pub preview: PreviewConfig,
    /// Options passed to the formatting collaborator.
    pub format: FormatOptions,
}

impl PlaygroundConfig {
    /// Parse a TOML document; missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the playground cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.preview.console_capacity == 0 {
            return Err(ConfigError::Invalid {
                key: "preview.console_capacity",
                reason: "must be at least 1",
            });
        }
        if self.editor.popup.line_height <= 0.0 {
            return Err(ConfigError::Invalid {
                key: "editor.popup.line_height",
                reason: "must be positive",
            });
        }
        Ok(())
    }
}

/// Editing surface settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Text inserted by Tab when nothing expands.
    pub indent: String,
    /// Grace period after blur before the suggestion popup closes.
    pub blur_grace_ms: u64,
    /// Popup placement metrics.
    pub popup: PopupMetrics,
}

impl EditorConfig {
    /// Blur grace period as a [`Duration`].
    pub fn blur_grace(&self) -> Duration {
        Duration::from_millis(self.blur_grace_ms)
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            indent: "  ".to_string(),
            blur_grace_ms: 200,
            popup: PopupMetrics::default(),
        }
    }
}

/// Live preview settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Quiet period after the last edit before the document is reassembled.
    pub debounce_ms: u64,
    /// Maximum number of console messages kept (oldest evicted first).
    pub console_capacity: usize,
}

impl PreviewConfig {
    /// Debounce quiet period as a [`Duration`].
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 600,
            console_capacity: 50,
        }
    }
}

//! Sandboxed execution host seam.

use crate::assembler::AssembledDocument;
use crate::relay::RelayPort;

/// Capabilities granted to the preview document.
///
/// Top-level navigation, same-origin access and form submission are never granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SandboxPolicy {
    /// Allow script execution.
    pub allow_scripts: bool,
    /// Allow `alert`/`confirm`/`prompt`.
    pub allow_modals: bool,
}

impl SandboxPolicy {
    /// Value of the `sandbox` attribute of the preview frame.
    pub fn to_attribute(&self) -> String {
        let mut tokens = Vec::new();
        if self.allow_scripts {
            tokens.push("allow-scripts");
        }
        if self.allow_modals {
            tokens.push("allow-modals");
        }
        tokens.join(" ")
    }
}

impl Default for SandboxPolicy {
    fn default() -> Self {
        Self {
            allow_scripts: true,
            allow_modals: true,
        }
    }
}

/// An isolated context that renders assembled documents.
///
/// `load` replaces whatever was running with `document`, from scratch. Console activity of
/// the running document must only reach the host through `relay`.
pub trait ExecutionHost {
    /// Replace the running document.
    fn load(&mut self, document: &AssembledDocument, policy: &SandboxPolicy, relay: &RelayPort);
}

//! Draft persistence over a key-value store.
//!
//! Two logical keys are used:
//!
//! - [`LAST_SESSION_KEY`]: one [`CodeState`] snapshot, overwritten while the user edits.
//! - [`PROJECTS_KEY`]: a JSON array of [`Project`]s, newest first.
//!
//! Values that fail to decode are treated as absent. A corrupted store never prevents the
//! playground from starting.

use playground_core::CodeState;
use playground_preview::Clock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, warn};

/// Key of the last-session snapshot.
pub const LAST_SESSION_KEY: &str = "playground.last-session";
/// Key of the saved project list.
pub const PROJECTS_KEY: &str = "playground.projects";

/// Persistence failure.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store rejected the operation.
    #[error("key-value store failure: {0}")]
    Backend(String),
    /// A value could not be encoded.
    #[error("cannot encode draft: {0}")]
    Encode(#[from] serde_json::Error),
}

/// String key-value storage (browser local storage or equivalent).
pub trait KeyValueStore {
    /// Read `key`.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    /// Write `key`.
    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError>;
    /// Delete `key`.
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// In-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// A named, saved draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Identifier (creation time in epoch milliseconds, as a string).
    pub id: String,
    /// Display name.
    pub name: String,
    /// The three buffers.
    pub code: CodeState,
    /// Creation time in epoch milliseconds.
    pub timestamp: i64,
}

/// Typed access to drafts kept in a [`KeyValueStore`].
#[derive(Debug, Clone, Default)]
pub struct DraftStore<S> {
    store: S,
}

impl<S: KeyValueStore> DraftStore<S> {
    /// Wrap a store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Last-session snapshot, if one was saved and decodes.
    pub fn last_session(&self) -> Result<Option<CodeState>, StoreError> {
        let Some(raw) = self.store.get(LAST_SESSION_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(code) => Ok(Some(code)),
            Err(err) => {
                warn!(error = %err, "ignoring corrupted last session");
                Ok(None)
            }
        }
    }

    /// Overwrite the last-session snapshot.
    pub fn save_last_session(&mut self, code: &CodeState) -> Result<(), StoreError> {
        let raw = serde_json::to_string(code)?;
        self.store.set(LAST_SESSION_KEY, raw)
    }

    /// Saved projects, newest first.
    pub fn projects(&self) -> Result<Vec<Project>, StoreError> {
        let Some(raw) = self.store.get(PROJECTS_KEY)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(projects) => Ok(projects),
            Err(err) => {
                warn!(error = %err, "ignoring corrupted project list");
                Ok(Vec::new())
            }
        }
    }

    /// Look up a project by id.
    pub fn project(&self, id: &str) -> Result<Option<Project>, StoreError> {
        Ok(self.projects()?.into_iter().find(|p| p.id == id))
    }

    /// Save `code` as a new project at the front of the list.
    pub fn save_project(
        &mut self,
        name: &str,
        code: &CodeState,
        clock: &dyn Clock,
    ) -> Result<Project, StoreError> {
        let timestamp = clock.now_millis();
        let project = Project {
            id: timestamp.to_string(),
            name: name.to_string(),
            code: code.clone(),
            timestamp,
        };

        let mut projects = self.projects()?;
        projects.insert(0, project.clone());
        self.write_projects(&projects)?;
        debug!(id = %project.id, name, "saved project");
        Ok(project)
    }

    /// Delete a project. Returns `false` if no project had that id.
    pub fn delete_project(&mut self, id: &str) -> Result<bool, StoreError> {
        let mut projects = self.projects()?;
        let before = projects.len();
        projects.retain(|p| p.id != id);
        if projects.len() == before {
            return Ok(false);
        }
        self.write_projects(&projects)?;
        debug!(id, "deleted project");
        Ok(true)
    }

    fn write_projects(&mut self, projects: &[Project]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(projects)?;
        self.store.set(PROJECTS_KEY, raw)
    }
}

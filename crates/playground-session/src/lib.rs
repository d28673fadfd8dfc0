#![warn(missing_docs)]
//! Playground Session - Application State
//!
//! Ties the editing surfaces, the live preview and draft persistence together behind one
//! state aggregate with version tracking and change notifications.
//!
//! - [`state`] - the [`Playground`] aggregate and its change notifications
//! - [`drafts`] - saved projects and the last-session snapshot over a key-value store

pub mod drafts;
pub mod state;

pub use drafts::{
    DraftStore, KeyValueStore, LAST_SESSION_KEY, MemoryStore, PROJECTS_KEY, Project, StoreError,
};
pub use state::{
    ActivePanes, ModalKind, Pane, Playground, PlaygroundError, StateChange, StateChangeCallback,
    StateChangeType, TickOutcome,
};

//! Playground State
//!
//! One [`Playground`] owns everything the host UI renders: the three editing surfaces, the
//! preview pipeline and its console, pane visibility, the open modal and the theme.
//!
//! # Overview
//!
//! All mutation goes through named operations ([`execute`](Playground::execute),
//! [`set_buffer`](Playground::set_buffer), [`append_log`](Playground::append_log),
//! [`open_modal`](Playground::open_modal), ...). Each operation that changes observable state
//! increments the version number and notifies subscribers with a [`StateChange`].
//!
//! Time is always passed in. Hosts call [`tick`](Playground::tick) from their event loop to
//! fire the preview debounce and the suggestion blur timer, and to pump relayed console
//! messages.
//!
//! # Example
//!
//! ```rust
//! use playground_core::{Key, PlaygroundConfig, SurfaceCommand};
//! use playground_lang::Language;
//! use playground_preview::{AssembledDocument, ExecutionHost, ManualClock, RelayPort, SandboxPolicy};
//! use playground_session::Playground;
//! use std::time::{Duration, Instant};
//!
//! struct NullHost;
//! impl ExecutionHost for NullHost {
//!     fn load(&mut self, _: &AssembledDocument, _: &SandboxPolicy, _: &RelayPort) {}
//! }
//!
//! let mut playground =
//!     Playground::new(NullHost, ManualClock::new(0), PlaygroundConfig::default()).unwrap();
//! playground.subscribe(|change| {
//!     println!("{:?} -> v{}", change.change_type, change.new_version);
//! });
//!
//! let now = Instant::now();
//! playground
//!     .execute(Language::Script, SurfaceCommand::Key(Key::Char('x')), now)
//!     .unwrap();
//! assert_eq!(playground.snapshot().js, "x");
//!
//! let outcome = playground.tick(now + Duration::from_millis(600));
//! assert!(outcome.assembled);
//! ```

use crate::drafts::{DraftStore, KeyValueStore, Project, StoreError};
use playground_core::{
    CodeState, CommandError, CommandResult, EditingSurface, FormatError, FormatOutcome,
    Formatter, PlaygroundConfig, SurfaceCommand, TextDelta,
};
use playground_highlight::{Highlighter, Theme};
use playground_lang::Language;
use playground_preview::{
    AssembledDocument, Clock, ConsoleLog, ConsoleMessage, ExecutionHost, PreviewPipeline,
};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, warn};

/// Playground operation failure.
#[derive(Debug, Error)]
pub enum PlaygroundError {
    /// The highlighter grammars failed to compile.
    #[error("highlighter grammar: {0}")]
    Grammar(#[from] regex::Error),
    /// An editing command was rejected.
    #[error(transparent)]
    Command(#[from] CommandError),
    /// The formatter rejected the buffer; the buffer is unchanged.
    #[error(transparent)]
    Format(#[from] FormatError),
    /// Draft persistence failed.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// No saved project has this id.
    #[error("no saved project with id `{0}`")]
    UnknownProject(String),
}

/// Panes that can be shown side by side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pane {
    /// Markup editor.
    Markup,
    /// Style editor.
    Style,
    /// Script editor.
    Script,
    /// Live preview.
    Preview,
}

impl From<Language> for Pane {
    fn from(language: Language) -> Self {
        match language {
            Language::Markup => Pane::Markup,
            Language::Style => Pane::Style,
            Language::Script => Pane::Script,
        }
    }
}

/// Visibility of each pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivePanes {
    /// Markup editor visible.
    pub html: bool,
    /// Style editor visible.
    pub css: bool,
    /// Script editor visible.
    pub js: bool,
    /// Preview visible.
    pub preview: bool,
}

impl ActivePanes {
    /// Returns `true` if `pane` is visible.
    pub fn is_visible(&self, pane: Pane) -> bool {
        match pane {
            Pane::Markup => self.html,
            Pane::Style => self.css,
            Pane::Script => self.js,
            Pane::Preview => self.preview,
        }
    }

    fn toggle(&mut self, pane: Pane) {
        let flag = match pane {
            Pane::Markup => &mut self.html,
            Pane::Style => &mut self.css,
            Pane::Script => &mut self.js,
            Pane::Preview => &mut self.preview,
        };
        *flag = !*flag;
    }
}

impl Default for ActivePanes {
    fn default() -> Self {
        Self {
            html: true,
            css: true,
            js: true,
            preview: true,
        }
    }
}

/// Modal dialogs (the home menu counts as one).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKind {
    /// Start screen.
    Home,
    /// Settings.
    Settings,
    /// Saved project list.
    Projects,
    /// "Save project" name prompt.
    Save,
}

/// State change type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateChangeType {
    /// Buffer text modified
    BufferModified,
    /// Caret, selection or suggestion popup changed
    CursorMoved,
    /// All three buffers replaced (draft loaded / new project)
    DraftLoaded,
    /// A new preview document was installed
    PreviewAssembled,
    /// Console messages appended or cleared
    ConsoleChanged,
    /// Pane visibility changed
    PanesChanged,
    /// Active editor changed
    ActiveEditorChanged,
    /// Modal opened or closed
    ModalChanged,
    /// Theme changed
    ThemeChanged,
}

/// State change record
#[derive(Debug, Clone)]
pub struct StateChange {
    /// Change type
    pub change_type: StateChangeType,
    /// Buffer the change applies to, if any
    pub language: Option<Language>,
    /// Old version number
    pub old_version: u64,
    /// New version number
    pub new_version: u64,
    /// The replacement behind a [`StateChangeType::BufferModified`] change. Wholesale draft
    /// loads report [`StateChangeType::DraftLoaded`] without one.
    pub text_delta: Option<Arc<TextDelta>>,
}

impl StateChange {
    /// Create a new state change record.
    pub fn new(change_type: StateChangeType, old_version: u64, new_version: u64) -> Self {
        Self {
            change_type,
            language: None,
            old_version,
            new_version,
            text_delta: None,
        }
    }

    /// Attach the affected buffer.
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }

    /// Attach a structured text delta to this change record.
    pub fn with_text_delta(mut self, delta: Arc<TextDelta>) -> Self {
        self.text_delta = Some(delta);
        self
    }
}

/// State change callback function type
pub type StateChangeCallback = Box<dyn FnMut(&StateChange) + Send>;

/// What one [`Playground::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickOutcome {
    /// A preview document was assembled and installed.
    pub assembled: bool,
    /// Number of relayed console messages appended.
    pub relayed: usize,
    /// A suggestion popup was closed by the blur timer.
    pub popup_closed: bool,
}

/// The application-state aggregate.
pub struct Playground<H, C> {
    surfaces: [EditingSurface; 3],
    highlighter: Highlighter,
    theme: Theme,
    active_editor: Language,
    panes: ActivePanes,
    modal: Option<ModalKind>,
    preview: PreviewPipeline<H, C>,
    config: PlaygroundConfig,
    state_version: u64,
    callbacks: Vec<StateChangeCallback>,
}

fn slot(language: Language) -> usize {
    match language {
        Language::Markup => 0,
        Language::Style => 1,
        Language::Script => 2,
    }
}

impl<H: ExecutionHost, C: Clock> Playground<H, C> {
    /// Create a playground with empty buffers and the home menu open.
    pub fn new(host: H, clock: C, config: PlaygroundConfig) -> Result<Self, PlaygroundError> {
        Self::with_code(host, clock, config, &CodeState::default())
    }

    /// Create a playground holding `code`.
    pub fn with_code(
        host: H,
        clock: C,
        config: PlaygroundConfig,
        code: &CodeState,
    ) -> Result<Self, PlaygroundError> {
        let surface =
            |language: Language| EditingSurface::new(language, code.get(language), &config.editor);
        Ok(Self {
            surfaces: [
                surface(Language::Markup),
                surface(Language::Style),
                surface(Language::Script),
            ],
            highlighter: Highlighter::new()?,
            theme: Theme::default(),
            active_editor: Language::Markup,
            panes: ActivePanes::default(),
            modal: Some(ModalKind::Home),
            preview: PreviewPipeline::new(host, clock, &config.preview),
            config,
            state_version: 0,
            callbacks: Vec::new(),
        })
    }

    /// Restore the last session from `drafts`, falling back to the starter project.
    pub fn restore<S: KeyValueStore>(
        host: H,
        clock: C,
        config: PlaygroundConfig,
        drafts: &DraftStore<S>,
    ) -> Result<Self, PlaygroundError> {
        let code = match drafts.last_session() {
            Ok(Some(code)) => code,
            Ok(None) => CodeState::starter(),
            Err(err) => {
                warn!(error = %err, "cannot read last session, starting fresh");
                CodeState::starter()
            }
        };
        Self::with_code(host, clock, config, &code)
    }

    /// Initial preview assembly, without waiting for the quiet period.
    pub fn start(&mut self) {
        let code = self.snapshot();
        self.preview.start(&code);
        self.mark_modified(StateChangeType::PreviewAssembled);
    }

    /// Current configuration.
    pub fn config(&self) -> &PlaygroundConfig {
        &self.config
    }

    /// Surface of one buffer.
    pub fn surface(&self, language: Language) -> &EditingSurface {
        &self.surfaces[slot(language)]
    }

    /// The three buffers as a persistence snapshot.
    pub fn snapshot(&self) -> CodeState {
        CodeState::new(
            self.surface(Language::Markup).text(),
            self.surface(Language::Style).text(),
            self.surface(Language::Script).text(),
        )
    }

    /// Highlighted overlay HTML of one buffer, in the current theme.
    pub fn overlay_html(&self, language: Language) -> String {
        self.surface(language)
            .overlay_html(&self.highlighter, &self.theme.syntax)
    }

    /// Run an editing command against one buffer.
    pub fn execute(
        &mut self,
        language: Language,
        command: SurfaceCommand,
        now: Instant,
    ) -> Result<CommandResult, PlaygroundError> {
        let surface = &mut self.surfaces[slot(language)];
        let cursor_before = surface.cursor();
        let popup_before = surface.suggestion().cloned();

        let result = surface.execute(command)?;

        let cursor_changed =
            surface.cursor() != cursor_before || surface.suggestion() != popup_before.as_ref();
        match &result {
            CommandResult::Edited(delta) => self.buffer_changed(language, delta.clone(), now),
            CommandResult::Success if cursor_changed => {
                let change = self.bump(StateChangeType::CursorMoved).with_language(language);
                self.notify_callbacks(&change);
            }
            CommandResult::Success => {}
        }
        Ok(result)
    }

    /// Replace one buffer programmatically.
    pub fn set_buffer(
        &mut self,
        language: Language,
        text: &str,
        now: Instant,
    ) -> Option<TextDelta> {
        let delta = self.surfaces[slot(language)].set_text(text)?;
        self.buffer_changed(language, delta.clone(), now);
        Some(delta)
    }

    /// Run the formatter over one buffer. On failure the buffer is untouched.
    pub fn format(
        &mut self,
        language: Language,
        formatter: &dyn Formatter,
        now: Instant,
    ) -> Result<FormatOutcome, PlaygroundError> {
        let options = self.config.format.clone();
        let outcome = self.surfaces[slot(language)].format_with(formatter, &options)?;
        if let FormatOutcome::Replaced(delta) = &outcome {
            self.buffer_changed(language, delta.clone(), now);
        }
        Ok(outcome)
    }

    /// Replace all three buffers at once.
    pub fn load_code(&mut self, code: &CodeState, now: Instant) {
        for language in Language::ALL {
            self.surfaces[slot(language)].set_text(code.get(language));
        }
        self.mark_modified(StateChangeType::DraftLoaded);
        self.preview.schedule(now);
    }

    /// Drive timers and pump the relay.
    pub fn tick(&mut self, now: Instant) -> TickOutcome {
        let mut outcome = TickOutcome::default();

        for language in Language::ALL {
            if self.surfaces[slot(language)].poll_timers(now) {
                outcome.popup_closed = true;
                let change = self.bump(StateChangeType::CursorMoved).with_language(language);
                self.notify_callbacks(&change);
            }
        }

        if self.preview.is_pending() {
            let code = self.snapshot();
            if self.preview.poll(now, &code).is_some() {
                outcome.assembled = true;
                self.mark_modified(StateChangeType::PreviewAssembled);
            }
        }

        outcome.relayed = self.preview.pump();
        if outcome.relayed > 0 {
            self.mark_modified(StateChangeType::ConsoleChanged);
        }
        outcome
    }

    /// The console log.
    pub fn console(&self) -> &ConsoleLog {
        self.preview.console()
    }

    /// Append a console message.
    pub fn append_log(&mut self, message: ConsoleMessage) {
        self.preview.append_log(message);
        self.mark_modified(StateChangeType::ConsoleChanged);
    }

    /// Clear the console.
    pub fn clear_log(&mut self) {
        if self.preview.console().is_empty() {
            return;
        }
        self.preview.clear_log();
        self.mark_modified(StateChangeType::ConsoleChanged);
    }

    /// The preview pipeline.
    pub fn preview(&self) -> &PreviewPipeline<H, C> {
        &self.preview
    }

    /// Document currently installed in the preview.
    pub fn document(&self) -> Option<&AssembledDocument> {
        self.preview.document()
    }

    /// Pane visibility.
    pub fn panes(&self) -> ActivePanes {
        self.panes
    }

    /// Show or hide a pane.
    pub fn toggle_pane(&mut self, pane: Pane) {
        self.panes.toggle(pane);
        self.mark_modified(StateChangeType::PanesChanged);
    }

    /// Buffer shown on narrow layouts.
    pub fn active_editor(&self) -> Language {
        self.active_editor
    }

    /// Switch the buffer shown on narrow layouts.
    pub fn set_active_editor(&mut self, language: Language) {
        if self.active_editor == language {
            return;
        }
        self.active_editor = language;
        self.mark_modified(StateChangeType::ActiveEditorChanged);
    }

    /// Open modal, if any.
    pub fn modal(&self) -> Option<ModalKind> {
        self.modal
    }

    /// Open a modal, replacing any open one.
    pub fn open_modal(&mut self, kind: ModalKind) {
        if self.modal == Some(kind) {
            return;
        }
        self.modal = Some(kind);
        self.mark_modified(StateChangeType::ModalChanged);
    }

    /// Close the open modal.
    pub fn close_modal(&mut self) {
        if self.modal.take().is_some() {
            self.mark_modified(StateChangeType::ModalChanged);
        }
    }

    /// Current theme.
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Caret colour for the current theme.
    pub fn caret_color(&self) -> &'static str {
        self.theme.caret_color()
    }

    /// Switch theme; the preview is reassembled after the quiet period.
    pub fn set_theme(&mut self, theme: Theme, now: Instant) {
        if self.theme == theme {
            return;
        }
        self.theme = theme;
        self.mark_modified(StateChangeType::ThemeChanged);
        self.preview.schedule(now);
    }

    /// Save the buffers as the last session, unless the home menu is showing.
    ///
    /// Returns `true` if a snapshot was written.
    pub fn persist_session<S: KeyValueStore>(
        &self,
        drafts: &mut DraftStore<S>,
    ) -> Result<bool, PlaygroundError> {
        if self.modal == Some(ModalKind::Home) {
            return Ok(false);
        }
        drafts.save_last_session(&self.snapshot())?;
        Ok(true)
    }

    /// Save the buffers as a named project, then reset to the starter project on the home menu.
    pub fn save_project<S: KeyValueStore>(
        &mut self,
        drafts: &mut DraftStore<S>,
        name: &str,
        now: Instant,
    ) -> Result<Project, PlaygroundError> {
        let project = drafts.save_project(name, &self.snapshot(), self.preview.clock())?;
        self.load_code(&CodeState::starter(), now);
        self.open_modal(ModalKind::Home);
        Ok(project)
    }

    /// Load a saved project and switch to the editor.
    pub fn load_project<S: KeyValueStore>(
        &mut self,
        drafts: &DraftStore<S>,
        id: &str,
        now: Instant,
    ) -> Result<(), PlaygroundError> {
        let project = drafts
            .project(id)?
            .ok_or_else(|| PlaygroundError::UnknownProject(id.to_string()))?;
        debug!(id, name = %project.name, "loading project");
        self.load_code(&project.code, now);
        self.close_modal();
        Ok(())
    }

    /// Start over from the starter project in the markup editor.
    pub fn new_project(&mut self, now: Instant) {
        self.load_code(&CodeState::starter(), now);
        self.set_active_editor(Language::Markup);
        self.close_modal();
    }

    /// Get current version number
    pub fn version(&self) -> u64 {
        self.state_version
    }

    /// Check if state has changed since a version
    pub fn has_changed_since(&self, version: u64) -> bool {
        self.state_version > version
    }

    /// Subscribe to state change notifications
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&StateChange) + Send + 'static,
    {
        self.callbacks.push(Box::new(callback));
    }

    fn buffer_changed(&mut self, language: Language, delta: TextDelta, now: Instant) {
        let change = self
            .bump(StateChangeType::BufferModified)
            .with_language(language)
            .with_text_delta(Arc::new(delta));
        self.notify_callbacks(&change);
        self.preview.schedule(now);
    }

    fn mark_modified(&mut self, change_type: StateChangeType) {
        let change = self.bump(change_type);
        self.notify_callbacks(&change);
    }

    fn bump(&mut self, change_type: StateChangeType) -> StateChange {
        let old_version = self.state_version;
        self.state_version += 1;
        StateChange::new(change_type, old_version, self.state_version)
    }

    /// Notify all callbacks
    fn notify_callbacks(&mut self, change: &StateChange) {
        for callback in &mut self.callbacks {
            callback(change);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use playground_preview::{ManualClock, RelayPort, SandboxPolicy};
    use std::sync::Mutex;

    struct NullHost;

    impl ExecutionHost for NullHost {
        fn load(&mut self, _: &AssembledDocument, _: &SandboxPolicy, _: &RelayPort) {}
    }

    fn playground() -> Playground<NullHost, ManualClock> {
        Playground::new(NullHost, ManualClock::new(0), PlaygroundConfig::default()).unwrap()
    }

    #[test]
    fn test_version_tracking() {
        let mut playground = playground();
        assert_eq!(playground.version(), 0);

        playground.toggle_pane(Pane::Preview);
        assert_eq!(playground.version(), 1);
        assert!(playground.has_changed_since(0));
        assert!(!playground.has_changed_since(1));
        assert!(!playground.panes().is_visible(Pane::Preview));
        assert!(playground.panes().is_visible(Pane::from(Language::Style)));
    }

    #[test]
    fn test_noop_operations_keep_version() {
        let mut playground = playground();
        playground.set_active_editor(Language::Markup);
        playground.open_modal(ModalKind::Home);
        playground.clear_log();
        playground.set_theme(Theme::default(), Instant::now());
        assert_eq!(playground.version(), 0);
    }

    #[test]
    fn test_modal_transitions() {
        let mut playground = playground();
        assert_eq!(playground.modal(), Some(ModalKind::Home));
        playground.open_modal(ModalKind::Projects);
        assert_eq!(playground.modal(), Some(ModalKind::Projects));
        playground.close_modal();
        playground.close_modal();
        assert_eq!(playground.modal(), None);
        assert_eq!(playground.version(), 2);
    }

    #[test]
    fn test_subscribers_see_buffer_delta() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();

        let mut playground = playground();
        playground.subscribe(move |change| {
            let inserted = change.text_delta.as_ref().map(|delta| delta.inserted.clone());
            sink.lock()
                .unwrap()
                .push((change.change_type, change.language, inserted));
        });

        let now = Instant::now();
        let delta = playground.set_buffer(Language::Style, "p{}", now).unwrap();
        assert!(delta.removed.is_empty());
        assert_eq!(delta.char_count, 3);
        playground
            .execute(Language::Style, SurfaceCommand::SetCursor { offset: 2 }, now)
            .unwrap();
        playground
            .execute(Language::Style, SurfaceCommand::SetCursor { offset: 2 }, now)
            .unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                (
                    StateChangeType::BufferModified,
                    Some(Language::Style),
                    Some("p{}".to_string())
                ),
                (StateChangeType::CursorMoved, Some(Language::Style), None),
            ]
        );
    }

    #[test]
    fn test_command_error_is_wrapped() {
        let mut playground = playground();
        let err = playground
            .execute(
                Language::Script,
                SurfaceCommand::SetCursor { offset: 9 },
                Instant::now(),
            )
            .unwrap_err();
        assert!(matches!(err, PlaygroundError::Command(_)));
    }

    #[test]
    fn test_light_theme_caret() {
        let mut playground = playground();
        assert_eq!(playground.caret_color(), "#22d3ee");
        let light = Theme {
            name: "Paper".to_string(),
            is_light: true,
            ..Theme::default()
        };
        playground.set_theme(light, Instant::now());
        assert_eq!(playground.caret_color(), "#0f172a");
        assert!(playground.preview().is_pending());
    }
}

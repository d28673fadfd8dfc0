//! Drive a playground from the command line and print what the preview would show.
//!
//! ```text
//! RUST_LOG=debug cargo run -p playground-session --example assemble_preview
//! ```

use playground_core::{CodeState, Key, PlaygroundConfig, SurfaceCommand};
use playground_lang::Language;
use playground_preview::{
    AssembledDocument, ConsoleKind, ExecutionHost, RelayEnvelope, RelayError, RelayPort,
    SandboxPolicy, SystemClock,
};
use playground_session::{DraftStore, MemoryStore, Playground};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

/// Prints the document instead of rendering it. [`PrintHost::run`] then relays the script
/// buffer as one log line, the way a frame executes once it has loaded.
#[derive(Default)]
struct PrintHost {
    loaded: Option<(RelayPort, String)>,
}

impl PrintHost {
    fn run(&self) -> Result<(), RelayError> {
        match &self.loaded {
            Some((relay, script)) if !script.is_empty() => {
                relay.post(&RelayEnvelope::new(ConsoleKind::Log, script.as_str()))
            }
            _ => Ok(()),
        }
    }
}

impl ExecutionHost for PrintHost {
    fn load(&mut self, document: &AssembledDocument, policy: &SandboxPolicy, relay: &RelayPort) {
        println!("--- sandbox=\"{}\" ---", policy.to_attribute());
        println!("{}", document.as_str());
        let script = document.source().js.trim().to_string();
        self.loaded = Some((relay.clone(), script));
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => PlaygroundConfig::from_toml_str(&std::fs::read_to_string(path)?)?,
        None => PlaygroundConfig::default(),
    };

    let mut drafts = DraftStore::new(MemoryStore::new());
    let mut playground = Playground::with_code(
        PrintHost::default(),
        SystemClock,
        config,
        &CodeState::new(r#"<div id="x"></div>"#, "#x{color:red;}", ""),
    )?;
    playground.close_modal();
    playground.start();

    let now = Instant::now();
    for ch in "clg".chars() {
        playground.execute(Language::Script, SurfaceCommand::Key(Key::Char(ch)), now)?;
    }
    playground.execute(Language::Script, SurfaceCommand::Key(Key::Tab), now)?;
    playground.execute(
        Language::Script,
        SurfaceCommand::InsertText {
            text: "1".to_string(),
        },
        now,
    )?;

    let debounce = playground.config().preview.debounce();
    let fired = now + debounce + Duration::from_millis(1);
    let assembled = playground.tick(fired).assembled;
    playground.preview().host().run()?;
    let relayed = playground.tick(fired).relayed;
    println!("assembled: {assembled}, relayed: {relayed}");
    for message in playground.console().iter() {
        println!("[{}] {}", message.kind, message.text);
    }

    playground.persist_session(&mut drafts)?;
    Ok(())
}

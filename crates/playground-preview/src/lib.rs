#![warn(missing_docs)]
//! Playground Preview - Live Preview Pipeline
//!
//! # Overview
//!
//! Turns the three playground buffers into one standalone document, hands it to an isolated
//! execution host, and collects console activity relayed back out of it.
//!
//! - [`assembler`] - pure concatenation of buffers, baseline reset and relay script
//! - [`relay`] - message envelope, relay script and the non-blocking host listener
//! - [`console`] - bounded console log (oldest evicted first)
//! - [`debounce`] - quiet-period debouncer
//! - [`sandbox`] - execution host seam and sandbox policy
//! - [`pipeline`] - the whole flow behind one type
//! - [`clock`] - epoch-millisecond timestamps
//!
//! # Example
//!
//! ```rust
//! use playground_core::{CodeState, PreviewConfig};
//! use playground_preview::{
//!     AssembledDocument, ConsoleKind, ExecutionHost, ManualClock, PreviewPipeline, RelayEnvelope,
//!     RelayPort, SandboxPolicy,
//! };
//!
//! struct EchoHost;
//!
//! impl ExecutionHost for EchoHost {
//!     fn load(&mut self, document: &AssembledDocument, _: &SandboxPolicy, relay: &RelayPort) {
//!         let line = document.source().js.clone();
//!         relay.post(&RelayEnvelope::new(ConsoleKind::Log, line)).unwrap();
//!     }
//! }
//!
//! let mut pipeline = PreviewPipeline::new(EchoHost, ManualClock::new(0), &PreviewConfig::default());
//! pipeline.start(&CodeState::new("", "", "hello"));
//! pipeline.pump();
//! assert_eq!(pipeline.console().iter().next().unwrap().text, "hello");
//! ```

pub mod assembler;
pub mod clock;
pub mod console;
pub mod debounce;
pub mod pipeline;
pub mod relay;
pub mod sandbox;

pub use assembler::{AssembledDocument, BASELINE_RESET, assemble};
pub use clock::{Clock, ManualClock, SystemClock};
pub use console::{ConsoleKind, ConsoleLog, ConsoleMessage};
pub use debounce::Debouncer;
pub use pipeline::PreviewPipeline;
pub use relay::{
    PROTOCOL_TAG, RELAY_SCRIPT, RelayEnvelope, RelayError, RelayListener, RelayPort,
    UNSERIALIZABLE, relay_channel, render_argument,
};
pub use sandbox::{ExecutionHost, SandboxPolicy};

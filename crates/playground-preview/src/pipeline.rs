//! Preview pipeline: debounce, assemble, install, relay.
//!
//! ```text
//! edit ─► schedule(now) ─► poll(now, code) ─► assemble ─► clear console ─► host.load
//!                                                              ▲
//! sandbox ──RelayPort──► RelayListener ──pump()──► ConsoleLog ─┘
//! ```

use crate::assembler::{AssembledDocument, assemble};
use crate::clock::Clock;
use crate::console::{ConsoleLog, ConsoleMessage};
use crate::debounce::Debouncer;
use crate::relay::{RelayListener, RelayPort, relay_channel};
use crate::sandbox::{ExecutionHost, SandboxPolicy};
use playground_core::{CodeState, PreviewConfig};
use tracing::debug;

/// Owns the sandbox host, the relay channel and the console log of one preview pane.
pub struct PreviewPipeline<H, C> {
    host: H,
    clock: C,
    policy: SandboxPolicy,
    debouncer: Debouncer,
    port: RelayPort,
    listener: RelayListener,
    console: ConsoleLog,
    document: Option<AssembledDocument>,
    assemblies: u64,
}

impl<H: ExecutionHost, C: Clock> PreviewPipeline<H, C> {
    /// Create a pipeline; nothing is assembled until [`start`](Self::start) or a poll fires.
    pub fn new(host: H, clock: C, config: &PreviewConfig) -> Self {
        let (port, listener) = relay_channel();
        Self {
            host,
            clock,
            policy: SandboxPolicy::default(),
            debouncer: Debouncer::new(config.debounce()),
            port,
            listener,
            console: ConsoleLog::new(config.console_capacity),
            document: None,
            assemblies: 0,
        }
    }

    /// Initial assembly, without waiting for the quiet period.
    pub fn start(&mut self, code: &CodeState) -> &AssembledDocument {
        self.debouncer.cancel();
        self.assemble_now(code)
    }

    /// Note a buffer, theme or draft change at `now`; restarts the quiet period.
    pub fn schedule(&mut self, now: std::time::Instant) {
        self.debouncer.touch(now);
    }

    /// Returns `true` if a reassembly is waiting for its quiet period.
    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Reassemble from `code` if the quiet period has elapsed at `now`.
    ///
    /// `code` is read only when the timer fires, so a burst of edits is assembled once from
    /// its final state.
    pub fn poll(
        &mut self,
        now: std::time::Instant,
        code: &CodeState,
    ) -> Option<&AssembledDocument> {
        if !self.debouncer.poll(now) {
            return None;
        }
        Some(self.assemble_now(code))
    }

    /// Assemble and install immediately.
    ///
    /// The console is cleared (including relay messages of the previous document that were
    /// not pumped yet) right before the new document is loaded.
    pub fn assemble_now(&mut self, code: &CodeState) -> &AssembledDocument {
        let document = assemble(code);
        let stale = self.listener.discard_pending();
        self.console.clear();
        self.assemblies += 1;
        debug!(
            assembly = self.assemblies,
            bytes = document.as_str().len(),
            stale,
            "installing preview document"
        );
        self.host.load(&document, &self.policy, &self.port);
        self.document.insert(document)
    }

    /// Move relayed messages into the console log. Never blocks.
    pub fn pump(&mut self) -> usize {
        self.listener.drain_into(&mut self.console, &self.clock)
    }

    /// Append a message directly (host-originated notices).
    pub fn append_log(&mut self, message: ConsoleMessage) {
        self.console.push(message);
    }

    /// Manual "clear console".
    pub fn clear_log(&mut self) {
        self.console.clear();
    }

    /// The console log.
    pub fn console(&self) -> &ConsoleLog {
        &self.console
    }

    /// Document currently installed in the sandbox.
    pub fn document(&self) -> Option<&AssembledDocument> {
        self.document.as_ref()
    }

    /// Number of documents installed so far.
    pub fn assembly_count(&self) -> u64 {
        self.assemblies
    }

    /// Sandbox policy applied to loads.
    pub fn policy(&self) -> &SandboxPolicy {
        &self.policy
    }

    /// The relay endpoint handed to the sandbox.
    pub fn port(&self) -> &RelayPort {
        &self.port
    }

    /// Timestamp source of relayed messages.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// The execution host.
    pub fn host(&self) -> &H {
        &self.host
    }
}

impl<H, C> std::fmt::Debug for PreviewPipeline<H, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewPipeline")
            .field("policy", &self.policy)
            .field("pending", &self.debouncer.is_pending())
            .field("console_len", &self.console.len())
            .field("assemblies", &self.assemblies)
            .finish_non_exhaustive()
    }
}

//! Console relay protocol.
//!
//! The sandboxed document cannot call into the host. Instead, the injected [`RELAY_SCRIPT`]
//! overrides `console.log`, `console.warn`, `console.error` and `window.onerror`, and posts one
//! message per call to the parent:
//!
//! ```json
//! {"type": "playground-console", "method": "log", "content": "1 {\"a\":2}"}
//! ```
//!
//! On the host side a [`RelayPort`] stands in for the parent window's message endpoint and a
//! [`RelayListener`] drains it without blocking, in arrival order. `content` is display text
//! only; nothing received here is ever evaluated.

use crate::clock::Clock;
use crate::console::{ConsoleKind, ConsoleLog, ConsoleMessage};
use crossbeam_channel::{Receiver, Sender, TrySendError, unbounded};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{trace, warn};

/// Value of the `type` field of every relayed message.
pub const PROTOCOL_TAG: &str = "playground-console";

/// Relayed in place of an argument that cannot be serialized.
pub const UNSERIALIZABLE: &str = "[Circular]";

/// Script injected into the `<head>` of every assembled document.
pub const RELAY_SCRIPT: &str = r#"<script>
  (function() {
    const send = (method, args) => {
      window.parent.postMessage({
        type: 'playground-console',
        method: method,
        content: args.map(arg => {
          try { return typeof arg === 'object' ? JSON.stringify(arg) : String(arg); }
          catch (e) { return "[Circular]"; }
        }).join(' ')
      }, '*');
    };
    console.log = (...args) => send('log', args);
    console.warn = (...args) => send('warn', args);
    console.error = (...args) => send('error', args);
    window.onerror = (msg, url, line) => { send('error', [msg + " (L" + line + ")"]); return false; };
  })();
</script>"#;

/// Relay failure.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The message is not a JSON object of the expected shape.
    #[error("malformed relay message: {0}")]
    Malformed(#[from] serde_json::Error),
    /// The message belongs to some other protocol.
    #[error("foreign message type `{0}`")]
    ForeignTag(String),
    /// The method is not one of `log`, `warn`, `error`.
    #[error("unknown console method `{0}`")]
    UnknownMethod(String),
    /// The listener side of the channel is gone.
    #[error("relay listener disconnected")]
    Disconnected,
}

/// Wire shape of one relayed message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayEnvelope {
    /// Protocol tag, see [`PROTOCOL_TAG`].
    #[serde(rename = "type")]
    pub tag: String,
    /// Console method name.
    pub method: String,
    /// Joined argument text.
    pub content: String,
}

impl RelayEnvelope {
    /// Envelope for `kind` carrying `content`.
    pub fn new(kind: ConsoleKind, content: impl Into<String>) -> Self {
        Self {
            tag: PROTOCOL_TAG.to_string(),
            method: kind.as_method().to_string(),
            content: content.into(),
        }
    }

    /// Envelope for an uncaught error at `line`.
    pub fn uncaught(message: &str, line: u32) -> Self {
        Self::new(ConsoleKind::Error, format!("{message} (L{line})"))
    }

    /// Envelope for a console call with `args`, stringified the way the relay script does.
    pub fn from_args<I, S>(kind: ConsoleKind, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let parts: Vec<String> = args.into_iter().map(|a| a.as_ref().to_string()).collect();
        Self::new(kind, parts.join(" "))
    }

    /// Parse a raw message and check tag and method.
    pub fn parse(raw: &str) -> Result<(ConsoleKind, String), RelayError> {
        let envelope: RelayEnvelope = serde_json::from_str(raw)?;
        if envelope.tag != PROTOCOL_TAG {
            return Err(RelayError::ForeignTag(envelope.tag));
        }
        let kind = ConsoleKind::from_method(&envelope.method)
            .ok_or(RelayError::UnknownMethod(envelope.method))?;
        Ok((kind, envelope.content))
    }
}

/// Stringify one console argument: strings verbatim, everything else as JSON.
pub fn render_argument<T: Serialize + ?Sized>(arg: &T) -> String {
    match serde_json::to_value(arg) {
        Ok(serde_json::Value::String(text)) => text,
        Ok(value) => value.to_string(),
        Err(_) => UNSERIALIZABLE.to_string(),
    }
}

/// Create a connected port/listener pair.
pub fn relay_channel() -> (RelayPort, RelayListener) {
    let (sender, receiver) = unbounded();
    (RelayPort { sender }, RelayListener { receiver })
}

/// Sandbox-side end of the relay: the parent window's message endpoint.
#[derive(Debug, Clone)]
pub struct RelayPort {
    sender: Sender<String>,
}

impl RelayPort {
    /// Post an envelope.
    pub fn post(&self, envelope: &RelayEnvelope) -> Result<(), RelayError> {
        let raw = serde_json::to_string(envelope)?;
        self.post_raw(raw)
    }

    /// Post an arbitrary message; anything may arrive on a real message endpoint.
    pub fn post_raw(&self, raw: impl Into<String>) -> Result<(), RelayError> {
        self.sender.try_send(raw.into()).map_err(|err| match err {
            TrySendError::Full(_) | TrySendError::Disconnected(_) => RelayError::Disconnected,
        })
    }
}

/// Host-side end of the relay.
#[derive(Debug)]
pub struct RelayListener {
    receiver: Receiver<String>,
}

impl RelayListener {
    /// Move every pending message into `log`, oldest first, without blocking.
    ///
    /// Messages with a foreign tag, an unknown method or a malformed body are skipped.
    /// Returns the number of messages appended.
    pub fn drain_into(&self, log: &mut ConsoleLog, clock: &dyn Clock) -> usize {
        let mut appended = 0;
        for raw in self.receiver.try_iter() {
            match RelayEnvelope::parse(&raw) {
                Ok((kind, text)) => {
                    trace!(%kind, "relayed console message");
                    log.push(ConsoleMessage {
                        kind,
                        text,
                        timestamp: clock.now_millis(),
                    });
                    appended += 1;
                }
                Err(RelayError::ForeignTag(tag)) => {
                    trace!(%tag, "ignoring message from another protocol");
                }
                Err(err) => warn!(error = %err, "dropping relay message"),
            }
        }
        appended
    }

    /// Discard every pending message.
    pub fn discard_pending(&self) -> usize {
        self.receiver.try_iter().count()
    }
}

//! Bounded console log fed by the relay listener.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// Console method a message was relayed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleKind {
    /// `console.log`
    Log,
    /// `console.warn`
    Warn,
    /// `console.error` or an uncaught error.
    Error,
}

impl ConsoleKind {
    /// Parse a relayed method name. Unknown names yield `None`.
    pub fn from_method(method: &str) -> Option<Self> {
        match method {
            "log" => Some(ConsoleKind::Log),
            "warn" => Some(ConsoleKind::Warn),
            "error" => Some(ConsoleKind::Error),
            _ => None,
        }
    }

    /// Method name on the wire.
    pub fn as_method(self) -> &'static str {
        match self {
            ConsoleKind::Log => "log",
            ConsoleKind::Warn => "warn",
            ConsoleKind::Error => "error",
        }
    }
}

impl fmt::Display for ConsoleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_method())
    }
}

/// One relayed console line. `text` is display-only content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleMessage {
    /// Originating method.
    pub kind: ConsoleKind,
    /// Joined, already stringified arguments.
    pub text: String,
    /// Receipt time in epoch milliseconds.
    pub timestamp: i64,
}

/// Ordered console messages, oldest evicted first once `capacity` is reached.
#[derive(Debug, Clone)]
pub struct ConsoleLog {
    messages: VecDeque<ConsoleMessage>,
    capacity: usize,
}

impl ConsoleLog {
    /// Default capacity.
    pub const DEFAULT_CAPACITY: usize = 50;

    /// Create an empty log holding at most `capacity` messages (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            messages: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a message, dropping the oldest when full.
    pub fn push(&mut self, message: ConsoleMessage) {
        while self.messages.len() >= self.capacity {
            self.messages.pop_front();
        }
        self.messages.push_back(message);
    }

    /// Remove all messages.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Messages, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &ConsoleMessage> {
        self.messages.iter()
    }

    /// Number of messages held.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns `true` if the log is empty.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Maximum number of messages held.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns `true` if any held message is an error (the console badge).
    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(|m| m.kind == ConsoleKind::Error)
    }

    /// Number of held messages of `kind`.
    pub fn count(&self, kind: ConsoleKind) -> usize {
        self.messages.iter().filter(|m| m.kind == kind).count()
    }
}

impl Default for ConsoleLog {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(kind: ConsoleKind, text: &str) -> ConsoleMessage {
        ConsoleMessage {
            kind,
            text: text.to_string(),
            timestamp: 0,
        }
    }

    #[test]
    fn test_evicts_oldest() {
        let mut log = ConsoleLog::new(2);
        log.push(message(ConsoleKind::Log, "a"));
        log.push(message(ConsoleKind::Log, "b"));
        log.push(message(ConsoleKind::Warn, "c"));

        let texts: Vec<_> = log.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["b", "c"]);
    }

    #[test]
    fn test_error_badge() {
        let mut log = ConsoleLog::default();
        log.push(message(ConsoleKind::Warn, "w"));
        assert!(!log.has_errors());
        log.push(message(ConsoleKind::Error, "e"));
        assert!(log.has_errors());
        assert_eq!(log.count(ConsoleKind::Error), 1);
        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn test_zero_capacity_keeps_one() {
        let mut log = ConsoleLog::new(0);
        log.push(message(ConsoleKind::Log, "a"));
        log.push(message(ConsoleKind::Log, "b"));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_kind_wire_names() {
        assert_eq!(ConsoleKind::from_method("warn"), Some(ConsoleKind::Warn));
        assert_eq!(ConsoleKind::from_method("info"), None);
        assert_eq!(
            serde_json::to_string(&ConsoleKind::Error).unwrap(),
            "\"error\""
        );
    }
}

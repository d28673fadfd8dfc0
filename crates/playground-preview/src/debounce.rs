//! Quiet-period debouncer driven by explicit timestamps.

use std::time::{Duration, Instant};

/// Fires once after `quiet` has elapsed since the most recent [`Debouncer::touch`].
#[derive(Debug, Clone)]
pub struct Debouncer {
    quiet: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    /// Create an idle debouncer.
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            deadline: None,
        }
    }

    /// Quiet period.
    pub fn quiet(&self) -> Duration {
        self.quiet
    }

    /// Register an event at `now`, superseding any pending deadline.
    pub fn touch(&mut self, now: Instant) {
        self.deadline = Some(now + self.quiet);
    }

    /// Returns `true` if an event is waiting for its quiet period.
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Drop the pending deadline.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Returns `true` exactly once per burst, when `now` has reached the deadline.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touch_restarts_quiet_period() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(600));

        debouncer.touch(start);
        debouncer.touch(start + Duration::from_millis(500));
        assert!(!debouncer.poll(start + Duration::from_millis(700)));
        assert!(debouncer.poll(start + Duration::from_millis(1100)));
        assert!(!debouncer.poll(start + Duration::from_millis(5000)));
    }

    #[test]
    fn test_cancel() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(10));
        debouncer.touch(start);
        debouncer.cancel();
        assert!(!debouncer.is_pending());
        assert!(!debouncer.poll(start + Duration::from_secs(1)));
    }
}

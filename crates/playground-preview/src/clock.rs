//! Wall-clock source for console and draft timestamps.

use chrono::Utc;
use std::cell::Cell;

/// Milliseconds since the Unix epoch.
pub trait Clock {
    /// Current time in epoch milliseconds.
    fn now_millis(&self) -> i64;
}

/// The system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    millis: Cell<i64>,
}

impl ManualClock {
    /// Start at `millis`.
    pub fn new(millis: i64) -> Self {
        Self {
            millis: Cell::new(millis),
        }
    }

    /// Move forward by `millis`.
    pub fn advance(&self, millis: i64) {
        self.millis.set(self.millis.get() + millis);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.millis.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_millis(&self) -> i64 {
        (**self).now_millis()
    }
}

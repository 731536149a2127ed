//! Deadline-based timers driven by the host event loop.
//!
//! # Responsibility
//! - `DebounceTimer`: owned single-shot timer; every `schedule` replaces the
//!   previous deadline (cancel-and-restart).
//! - `IntervalTimer`: owned periodic timer used for display refresh.
//!
//! # Invariants
//! - Timers never fire on their own; the owner polls them with the current
//!   time and acts on the result, so callbacks can never overlap.
//! - A cancelled timer never fires until it is scheduled/started again.

use std::time::Duration;

fn duration_ms(value: Duration) -> i64 {
    i64::try_from(value.as_millis()).unwrap_or(i64::MAX)
}

/// Trailing-edge single-shot timer.
#[derive(Debug, Clone)]
pub struct DebounceTimer {
    delay_ms: i64,
    deadline: Option<i64>,
}

impl DebounceTimer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay_ms: duration_ms(delay),
            deadline: None,
        }
    }

    /// Arms (or re-arms) the timer to fire `delay` after `now_ms`.
    pub fn schedule(&mut self, now_ms: i64) {
        self.deadline = Some(now_ms.saturating_add(self.delay_ms));
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<i64> {
        self.deadline
    }

    /// Returns `true` exactly once when the deadline has been reached,
    /// disarming the timer.
    pub fn take_due(&mut self, now_ms: i64) -> bool {
        match self.deadline {
            Some(deadline) if now_ms >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Fixed-period timer.
#[derive(Debug, Clone)]
pub struct IntervalTimer {
    period_ms: i64,
    next_due: Option<i64>,
}

impl IntervalTimer {
    pub fn new(period: Duration) -> Self {
        Self {
            period_ms: duration_ms(period).max(1),
            next_due: None,
        }
    }

    /// Starts the interval; first fire is one period after `now_ms`.
    pub fn start(&mut self, now_ms: i64) {
        self.next_due = Some(now_ms.saturating_add(self.period_ms));
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn next_due(&self) -> Option<i64> {
        self.next_due
    }

    /// Returns `true` when at least one period has elapsed and re-arms one
    /// period after `now_ms`. Missed periods collapse into one fire.
    pub fn take_due(&mut self, now_ms: i64) -> bool {
        match self.next_due {
            Some(due) if now_ms >= due => {
                self.next_due = Some(now_ms.saturating_add(self.period_ms));
                true
            }
            _ => false,
        }
    }
}

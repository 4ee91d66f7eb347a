//! Polled software timers.
//!
//! A [`SoftTimer`] never runs code on its own. The task that owns it calls
//! [`SoftTimer::poll`] from its loop and reacts when it returns `true`, so a
//! firing can never race the state it guards and never runs in interrupt
//! context.

use embassy_time::{Duration, Instant};

/// One-shot or periodic timer owned by a single task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoftTimer {
    /// `None` for one-shot timers.
    period: Option<Duration>,
    deadline: Option<Instant>,
}

impl SoftTimer {
    /// A disarmed timer.
    pub const fn new() -> Self {
        Self {
            period: None,
            deadline: None,
        }
    }

    /// Fire once, `delay` after `now`.
    pub fn arm_oneshot(&mut self, now: Instant, delay: Duration) {
        self.period = None;
        self.deadline = now.checked_add(delay);
    }

    /// Fire every `period`, the first time `period` after `now`.
    ///
    /// A zero period would fire on every poll, so it arms a one-shot instead.
    pub fn arm_periodic(&mut self, now: Instant, period: Duration) {
        self.period = if period.as_ticks() == 0 {
            None
        } else {
            Some(period)
        };
        self.deadline = now.checked_add(period);
    }

    /// Stop the timer. Disarming a disarmed timer is a no-op.
    pub fn disarm(&mut self) {
        self.period = None;
        self.deadline = None;
    }

    /// Whether a firing is pending.
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Whether the timer re-arms itself after firing.
    pub fn is_periodic(&self) -> bool {
        self.period.is_some()
    }

    /// Time of the next firing.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns `true` at most once per call when the deadline has passed.
    ///
    /// One-shot timers disarm themselves. Periodic timers move the deadline
    /// forward by whole periods past `now`, so a late poll fires once rather
    /// than once per missed period.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(deadline) = self.deadline else {
            return false;
        };
        if now < deadline {
            return false;
        }

        match self.period {
            None => self.deadline = None,
            Some(period) => {
                let mut next = deadline.checked_add(period);
                while let Some(n) = next {
                    if n > now {
                        break;
                    }
                    next = n.checked_add(period);
                }
                self.deadline = next;
            }
        }
        true
    }
}

impl Default for SoftTimer {
    fn default() -> Self {
        Self::new()
    }
}

//! Deferred layout re-measurement timer.
//!
//! After a visibility change the output column needs to be re-measured so that
//! its minimum height keeps all content reachable. The measurement is deferred
//! by a short delay to let the layout settle, and it is idempotent: if a fresh
//! change reschedules the timer before it fires, running the late check anyway
//! is harmless (last write wins).
//!
//! The timer is driven by explicit [`Instant`]s instead of reading the clock
//! itself, so tests can step a virtual clock deterministically.

use std::time::{Duration, Instant};

/// A cancellable one-shot timer for the deferred min-height check.
#[derive(Debug)]
pub struct ReflowTimer {
    delay: Duration,
    due: Option<Instant>,
}

impl ReflowTimer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, due: None }
    }

    /// Arm (or re-arm) the timer relative to `now`.
    pub fn schedule(&mut self, now: Instant) {
        self.due = Some(now + self.delay);
    }

    /// Disarm without firing.
    pub fn cancel(&mut self) {
        self.due = None;
    }

    pub fn is_pending(&self) -> bool {
        self.due.is_some()
    }

    /// Returns `true` exactly once after the deadline has passed.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.due {
            Some(due) if now >= due => {
                self.due = None;
                true
            }
            _ => false,
        }
    }
}

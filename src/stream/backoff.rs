//! Reconnect backoff schedule
//!
//! Capped multiplicative backoff, deliberately deterministic: no jitter, so
//! retry timing stays testable and the status line can promise an exact
//! countdown.

use std::time::Duration;

/// Tracks the delay and attempt count between connection failures.
///
/// `reset` is called on every successful connect; `next_delay` is called
/// once per scheduled retry and grows the following delay.
#[derive(Debug, Clone)]
pub struct Backoff {
    base: Duration,
    cap: Duration,
    factor: f64,
    next: Duration,
    attempt: u32,
}

impl Backoff {
    pub fn new(base: Duration, cap: Duration, factor: f64) -> Self {
        Self {
            base,
            cap,
            factor,
            next: base,
            attempt: 0,
        }
    }

    /// Back to the base delay with zero attempts spent.
    pub fn reset(&mut self) {
        self.next = self.base;
        self.attempt = 0;
    }

    /// The delay to wait before the next attempt.
    ///
    /// Advances the schedule: the following delay is multiplied by the
    /// growth factor and re-capped, and the attempt counter increments.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.next;
        self.next = self.next.mul_f64(self.factor).min(self.cap);
        self.attempt += 1;
        delay
    }

    /// Retries scheduled since the last reset.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }
}

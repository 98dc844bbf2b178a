//! Bounded retry for role mutations.
//!
//! A failed grant or revoke is retried exactly once. The wait before the retry
//! is `in_flight × base_delay`, where `in_flight` counts the retries currently
//! waiting on the same monitor (including the new one). Calls that fail together
//! therefore fan out instead of hitting the platform again in lockstep.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

/// Total attempts per mutation: the original call plus one retry.
pub const MAX_ATTEMPTS: u32 = 2;

/// Delay unit per in-flight retry.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(7);

/// Retry policy for role mutations.
///
/// # Examples
///
/// ```
/// use rolecall_core::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::default();
/// assert_eq!(policy.next_delay(1, 1), Some(Duration::from_secs(7)));
/// assert_eq!(policy.next_delay(1, 2), Some(Duration::from_secs(14)));
/// assert_eq!(policy.next_delay(2, 1), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    base_delay: Duration,
}

impl RetryPolicy {
    /// Policy with a custom delay unit.
    pub const fn new(base_delay: Duration) -> Self {
        Self { base_delay }
    }

    /// Delay unit per in-flight retry.
    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// Attempts allowed per mutation.
    pub fn max_attempts(&self) -> u32 {
        MAX_ATTEMPTS
    }

    /// Whether another attempt is allowed after `attempts_made` attempts.
    pub fn should_retry(&self, attempts_made: u32) -> bool {
        attempts_made < MAX_ATTEMPTS
    }

    /// Wait for a retry registered as number `in_flight` on its monitor.
    pub fn delay_for(&self, in_flight: u32) -> Duration {
        self.base_delay.saturating_mul(in_flight.max(1))
    }

    /// Delay before the next attempt, or `None` once attempts are exhausted.
    ///
    /// `attempts_made` counts attempts already issued for this call;
    /// `in_flight` is the retry counter value after this call's retry was
    /// registered.
    pub fn next_delay(&self, attempts_made: u32, in_flight: u32) -> Option<Duration> {
        self.should_retry(attempts_made)
            .then(|| self.delay_for(in_flight))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_DELAY)
    }
}

/// Count of retries waiting out their delay on one monitor.
#[derive(Debug, Default)]
pub struct RetryCounter {
    in_flight: AtomicU32,
}

impl RetryCounter {
    /// Empty counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a retry. The slot releases its place when dropped.
    pub fn enter(&self) -> RetrySlot<'_> {
        let position = self.in_flight.fetch_add(1, Ordering::AcqRel) + 1;
        RetrySlot {
            counter: self,
            position,
        }
    }

    /// Retries currently registered.
    pub fn in_flight(&self) -> u32 {
        self.in_flight.load(Ordering::Acquire)
    }
}

/// A registered retry. Drop it once the delay has elapsed.
#[derive(Debug)]
pub struct RetrySlot<'a> {
    counter: &'a RetryCounter,
    position: u32,
}

impl RetrySlot<'_> {
    /// In-flight count observed when this slot registered, itself included.
    pub fn position(&self) -> u32 {
        self.position
    }
}

impl Drop for RetrySlot<'_> {
    fn drop(&mut self) {
        self.counter.in_flight.fetch_sub(1, Ordering::AcqRel);
    }
}

//! RetryPolicy - Backoff for Database Calls
//!
//! TigerStyle: one wrapper, applied to every relational operation.
//!
//! ```text
//! attempt 1 ──fail──> sleep base·2⁰ + jitter
//! attempt 2 ──fail──> sleep base·2¹ + jitter
//! attempt 3 ──fail──> propagate last error
//! ```
//!
//! Only transient errors (`StorageError::is_transient`) are retried.
//! Conflicts, permission failures and query errors propagate immediately.

use std::future::Future;
use std::time::Duration;

use rand::Rng;

use super::error::StorageResult;
use crate::constants::{
    STORAGE_RETRY_ATTEMPTS_COUNT_MAX, STORAGE_RETRY_BACKOFF_MULTIPLIER,
    STORAGE_RETRY_DELAY_MS_BASE, STORAGE_RETRY_JITTER_FRACTION_MAX,
};

/// Exponential backoff with additive jitter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    attempts_max: u32,
    delay_base: Duration,
    multiplier: u32,
    jitter_fraction_max: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts_max: STORAGE_RETRY_ATTEMPTS_COUNT_MAX,
            delay_base: Duration::from_millis(STORAGE_RETRY_DELAY_MS_BASE),
            multiplier: STORAGE_RETRY_BACKOFF_MULTIPLIER,
            jitter_fraction_max: STORAGE_RETRY_JITTER_FRACTION_MAX,
        }
    }
}

impl RetryPolicy {
    /// Policy with `attempts_max` attempts starting at `delay_base`.
    ///
    /// # Panics
    /// Panics if `attempts_max` is zero.
    #[must_use]
    pub fn new(attempts_max: u32, delay_base: Duration) -> Self {
        // Precondition
        assert!(attempts_max > 0, "at least one attempt is required");

        Self {
            attempts_max,
            delay_base,
            ..Self::default()
        }
    }

    /// Policy that tries once and never sleeps.
    #[must_use]
    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Set the per-attempt multiplier.
    #[must_use]
    pub fn with_multiplier(mut self, multiplier: u32) -> Self {
        assert!(multiplier >= 1, "multiplier must be at least 1");
        self.multiplier = multiplier;
        self
    }

    /// Set the jitter bound as a fraction of the attempt delay.
    #[must_use]
    pub fn with_jitter(mut self, fraction_max: f64) -> Self {
        assert!(
            (0.0..=1.0).contains(&fraction_max),
            "jitter fraction {fraction_max} outside [0, 1]"
        );
        self.jitter_fraction_max = fraction_max;
        self
    }

    /// Maximum number of attempts.
    #[must_use]
    pub fn attempts_max(&self) -> u32 {
        self.attempts_max
    }

    /// Delay after failed `attempt` (1-based), before jitter.
    #[must_use]
    pub fn backoff(&self, attempt: u32) -> Duration {
        assert!(attempt >= 1, "attempts are 1-based");

        let factor = self.multiplier.saturating_pow(attempt - 1);
        self.delay_base.saturating_mul(factor)
    }

    /// Delay after failed `attempt`, with jitter in
    /// `[0, jitter_fraction_max]` of the backoff added.
    #[must_use]
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let backoff = self.backoff(attempt);
        let fraction = rand::thread_rng().gen_range(0.0..=self.jitter_fraction_max);
        let delay = backoff + backoff.mul_f64(fraction);

        // Postcondition
        assert!(delay >= backoff, "jitter must not shorten the backoff");

        delay
    }

    /// Run `operation` until it succeeds, fails permanently, or the attempt
    /// budget is spent. The last error is returned on exhaustion.
    pub async fn run<T, F, Fut>(&self, operation: &str, mut f: F) -> StorageResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = StorageResult<T>>,
    {
        let mut attempt = 0;

        loop {
            attempt += 1;

            let error = match f().await {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };

            if !error.is_transient() {
                return Err(error);
            }

            if attempt >= self.attempts_max {
                tracing::error!(
                    operation,
                    attempts = attempt,
                    error = %error,
                    "storage operation failed, retry budget exhausted"
                );
                return Err(error);
            }

            let delay = self.delay_after(attempt);
            tracing::warn!(
                operation,
                attempt,
                attempts_max = self.attempts_max,
                delay_ms = delay.as_millis() as u64,
                error = %error,
                "storage operation failed, retrying"
            );
            tokio::time::sleep(delay).await;
        }
    }
}

//! Exponential-backoff retry around any fallible async operation.

use std::{future::Future, time::Duration};

use tracing::warn;

use crate::{Error, Result};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BACKOFF_BASE: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Zero behaves like one.
    pub max_attempts: u32,
    pub backoff_base: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff_base: DEFAULT_BACKOFF_BASE,
        }
    }
}

impl RetryPolicy {
    /// Wait before the attempt following `attempt` (0-based): `base * 2^attempt`.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.backoff_base
            .saturating_mul(2u32.saturating_pow(attempt))
    }
}

/// Default retry decision, based on the error text.
///
/// Client errors are never retried: the text mentions `401`, `403`, or
/// any `4`. Service-unavailable (`503`) and timeouts are retried.
/// Anything else is retried while `attempt < 2`.
///
/// The bare `4` check also matches unrelated digits (ports, counts), which
/// suppresses retries for those errors.
#[must_use]
pub fn default_should_retry(error: &Error, attempt: u32) -> bool {
    let message = error.to_string().to_lowercase();
    if message.contains("401") || message.contains("403") || message.contains('4') {
        return false;
    }
    if message.contains("503") || message.contains("timeout") {
        return true;
    }
    attempt < 2
}

/// Run `op` until it succeeds, `should_retry` declines, or attempts run out.
///
/// `should_retry` receives the error and the 0-based index of the attempt
/// that produced it. Failure is always [`Error::ApiCallFailed`] carrying
/// the last error. There is no sleep after the final attempt.
pub async fn retry<T, F, Fut, P>(policy: &RetryPolicy, should_retry: P, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
    P: Fn(&Error, u32) -> bool,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0u32;

    loop {
        let err = match op().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        let attempts = attempt + 1;
        if attempts >= max_attempts || !should_retry(&err, attempt) {
            return Err(Error::ApiCallFailed {
                attempts,
                last_error: Box::new(err),
            });
        }

        let delay = policy.delay_for(attempt);
        warn!(
            attempt = attempts,
            max_attempts,
            delay_ms = delay.as_millis() as u64,
            error = %err,
            "API call failed, retrying"
        );
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}

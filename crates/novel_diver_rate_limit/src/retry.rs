//! Exponential backoff around a fallible async operation.

use crate::RetryPolicy;
use novel_diver_error::is_rate_limit_message;
use std::fmt::Display;
use std::future::Future;
use tokio_retry2::{Retry, RetryError};
use tracing::{debug, instrument, warn};

/// Run `operation`, retrying while its error text looks like a rate limit.
///
/// Makes at most `max_retries + 1` attempts. Errors whose message carries no
/// rate-limit indicator are returned at once, without sleeping. Once retries
/// run out the last error is returned.
pub async fn retry_with_backoff<T, E, F, Fut>(policy: &RetryPolicy, operation: F) -> Result<T, E>
where
    E: Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    retry_with_backoff_if(policy, operation, |err: &E| {
        is_rate_limit_message(&err.to_string())
    })
    .await
}

/// Like [`retry_with_backoff`], but `is_retryable` decides which errors back off.
///
/// Use this when the error type already knows whether it is a rate limit, so
/// that unrelated text in its message cannot trigger a retry.
#[instrument(skip_all, fields(max_retries = *policy.max_retries(), base_delay_secs = *policy.base_delay_secs()))]
pub async fn retry_with_backoff_if<T, E, F, Fut, P>(
    policy: &RetryPolicy,
    mut operation: F,
    is_retryable: P,
) -> Result<T, E>
where
    E: Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
{
    let total_attempts = policy.max_retries() + 1;
    let mut delays = policy.delays().collect::<Vec<_>>().into_iter();
    let mut attempt = 0u32;
    let is_retryable = &is_retryable;

    Retry::spawn(policy.delays(), || {
        attempt += 1;
        let current = attempt;
        let next_delay = delays.next();
        let call = operation();
        async move {
            match call.await {
                Ok(value) => {
                    debug!(attempt = current, "Operation succeeded");
                    Ok(value)
                }
                Err(err) if is_retryable(&err) => {
                    match next_delay {
                        Some(delay) => warn!(
                            error = %err,
                            attempt = current,
                            total_attempts,
                            delay_secs = delay.as_secs_f64(),
                            "Rate limit hit, backing off"
                        ),
                        None => warn!(error = %err, attempts = current, "Rate limit retries exhausted"),
                    }
                    Err(RetryError::Transient {
                        err,
                        retry_after: None,
                    })
                }
                Err(err) => {
                    debug!(error = %err, attempt = current, "Not a rate limit, failing immediately");
                    Err(RetryError::Permanent(err))
                }
            }
        }
    })
    .await
}

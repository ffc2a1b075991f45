//! Bounded retry with exponential backoff for remote calls.

use std::time::Duration;

use tracing::{debug, warn};

use crate::error::FetchError;

/// Run `operation` until it succeeds, fails permanently, or `max_attempts`
/// is reached.
///
/// Only errors for which `FetchError::is_transient` holds are retried. The
/// delay starts at `initial_backoff` and doubles after every failure. `sleep`
/// is injected so callers and tests control how waiting happens.
///
/// Running out of attempts returns `FetchError::RetriesExhausted` carrying
/// the last error message.
pub fn retry_with_backoff<T, F, S>(
    operation_name: &str,
    max_attempts: u32,
    initial_backoff: Duration,
    mut sleep: S,
    mut operation: F,
) -> Result<T, FetchError>
where
    F: FnMut() -> Result<T, FetchError>,
    S: FnMut(Duration),
{
    let max_attempts = max_attempts.max(1);
    let mut backoff = initial_backoff;
    let mut attempt = 0;

    loop {
        attempt += 1;
        if attempt > 1 {
            debug!(operation = operation_name, attempt, "Retrying remote call");
        }

        let err = match operation() {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if !err.is_transient() {
            return Err(err);
        }

        if attempt >= max_attempts {
            warn!(operation = operation_name, attempt, error = %err, "Giving up after retries");
            return Err(FetchError::RetriesExhausted {
                operation: operation_name.to_string(),
                attempts: attempt,
                last: err.to_string(),
            });
        }

        warn!(
            operation = operation_name,
            attempt,
            backoff_ms = backoff.as_millis() as u64,
            error = %err,
            "Remote call failed, will retry after backoff"
        );
        sleep(backoff);
        backoff = backoff.saturating_mul(2);
    }
}

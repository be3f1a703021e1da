/***************************************/
/*        3rd party libraries          */
/***************************************/
use log::warn;
use std::thread::sleep;
use std::time::Duration;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::store::StoreError;

/// Retry policy for transient store failures (connection loss, poisoned
/// lock). Non-transient errors pass straight through.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    /// First backoff in milliseconds; doubles on every retry.
    pub backoff_ms: u64,
}

/// Runs `f` until it succeeds, fails with a hard error, or the retry
/// budget is spent. Each transient failure is logged and backed off
/// exponentially before the next attempt.
pub fn with_retries<T>(
    policy: RetryPolicy,
    mut f: impl FnMut() -> Result<T, StoreError>,
) -> Result<T, StoreError> {
    let mut delay = policy.backoff_ms;
    let mut attempt = 0;
    loop {
        match f() {
            Err(e) if e.is_transient() && attempt < policy.max_retries => {
                attempt += 1;
                warn!(
                    "transient store failure (attempt {}/{}), retrying in {}ms: {}",
                    attempt, policy.max_retries, delay, e
                );
                sleep(Duration::from_millis(delay));
                delay = delay.saturating_mul(2);
            }
            other => return other,
        }
    }
}

//! Readiness polling with exponential backoff
//!
//! Provisioning calls return before the resource is usable. Callers poll a
//! check until it reports ready, giving up after `max_retries` attempts.

use crate::error::{CloudError, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// Backoff settings for readiness polling
#[derive(Debug, Clone, PartialEq)]
pub struct WaitConfig {
    pub max_retries: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub multiplier: f64,
}

impl Default for WaitConfig {
    // about 20 minutes in total, long enough for an RDS instance to come up
    fn default() -> Self {
        Self {
            max_retries: 45,
            initial_delay_ms: 5_000,
            max_delay_ms: 30_000,
            multiplier: 1.5,
        }
    }
}

impl WaitConfig {
    /// Delay before the next attempt (milliseconds)
    pub fn delay_for_attempt(&self, attempt: u32) -> u64 {
        let delay = self.initial_delay_ms as f64 * self.multiplier.powi(attempt as i32);
        (delay as u64).min(self.max_delay_ms)
    }
}

/// Poll `check` until it yields a value.
///
/// `Ok(None)` means "not ready yet"; an `Err` from the check is terminal and
/// returned as is. Running out of attempts is a [`CloudError::Timeout`].
pub async fn poll_until<T, F, Fut>(what: &str, config: &WaitConfig, mut check: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>>>,
{
    for attempt in 0..config.max_retries {
        if let Some(value) = check().await? {
            tracing::debug!("{} ready after {} attempt(s)", what, attempt + 1);
            return Ok(value);
        }

        if attempt + 1 < config.max_retries {
            let delay_ms = config.delay_for_attempt(attempt);
            tracing::debug!("{} not ready, retrying in {}ms", what, delay_ms);
            sleep(Duration::from_millis(delay_ms)).await;
        }
    }

    Err(CloudError::Timeout(format!(
        "{} was not ready after {} attempts",
        what, config.max_retries
    )))
}

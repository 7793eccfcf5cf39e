//! Bounded retry loop for one-shot startup steps (clearing a stale webhook).

use std::{future::Future, time::Duration};

use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::Result;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(5),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BootstrapReport {
    pub attempts: u32,
    pub succeeded: bool,
}

/// Run `action` until it succeeds or `policy.max_attempts` is exhausted.
///
/// Never fails: exhaustion is logged and reported, and startup continues.
pub async fn run<F, Fut>(step: &str, policy: RetryPolicy, mut action: F) -> BootstrapReport
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<()>>,
{
    let max_attempts = policy.max_attempts.max(1);

    for attempt in 1..=max_attempts {
        match action().await {
            Ok(()) => {
                info!(step, attempt, "bootstrap step succeeded");
                return BootstrapReport {
                    attempts: attempt,
                    succeeded: true,
                };
            }
            Err(e) if e.is_transport() => {
                warn!(step, attempt, max_attempts, error = %e, "network error during bootstrap step");
            }
            Err(e) => {
                warn!(step, attempt, max_attempts, error = %e, "unexpected error during bootstrap step");
            }
        }

        if attempt < max_attempts {
            sleep(policy.delay).await;
        }
    }

    error!(step, attempts = max_attempts, "bootstrap step failed after all attempts; continuing");
    BootstrapReport {
        attempts: max_attempts,
        succeeded: false,
    }
}

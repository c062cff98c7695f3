//! Bounded polling over a caller-supplied condition.
//!
//! The lowest layer of the convergence core: sleep, recheck, give up at the
//! deadline. Conditions read live page state and are allowed to fail while
//! the page is mid-render; an `Err` poll counts as "not yet", never as a
//! reason to abort the wait.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tracing::trace;

use crate::Result;

/// Default gap between condition polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// How long to keep polling, and how often.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Total budget for the wait.
    pub timeout: Duration,
    /// Gap between polls. Never zero.
    pub interval: Duration,
}

impl PollPolicy {
    /// Policy with the given timeout and the default 100ms interval.
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Override the poll interval. Clamped to at least 1ms.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval.max(Duration::from_millis(1));
        self
    }
}

/// Poll `condition` until it holds or `policy.timeout` elapses.
///
/// The condition is evaluated once immediately, then every `policy.interval`.
/// Returns `true` on the first poll where the condition holds, `false` once
/// the budget is spent. An `Err` from a poll is treated as the condition not
/// holding on that cycle.
pub async fn wait_for<C, Fut>(policy: PollPolicy, mut condition: C) -> bool
where
    C: FnMut() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    let deadline = Instant::now() + policy.timeout;
    loop {
        match condition().await {
            Ok(true) => return true,
            Ok(false) => {}
            Err(e) => trace!("poll condition errored, treating as unmet: {e}"),
        }
        if Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(policy.interval).await;
    }
}

/// Like [`wait_for`], but the caller has no fallback: expiry is an
/// [`Error::Timeout`](crate::Error::Timeout) carrying `message`.
pub async fn ensure<C, Fut>(policy: PollPolicy, condition: C, message: &str) -> Result<()>
where
    C: FnMut() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    if wait_for(policy, condition).await {
        Ok(())
    } else {
        Err(crate::Error::Timeout(format!(
            "{message} (waited {:?})",
            policy.timeout
        )))
    }
}

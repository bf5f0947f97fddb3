//! The retry policy and its sync/async executors.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

fn default_max_retries() -> u32 {
    3
}

/// Policy for re-attempting a fallible operation a bounded number of times.
///
/// The policy is a plain, stateless value: `max_retries` additional attempts
/// after the first, with a fixed `delay` between a failed attempt and the
/// next. It performs at most `max_retries + 1` invocations, and the delay
/// occurs only between attempts, never before the first or after the final
/// one.
///
/// The policy is serde-(de)serializable so it can be loaded from
/// configuration.
///
/// # Examples
///
/// ```rust
/// use gatework::retry::Retry;
///
/// let retry = Retry::new(2);
/// let value: Result<u32, std::io::Error> = retry.execute(|| Ok(7));
/// assert_eq!(value.unwrap(), 7);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Retry {
    #[serde(default = "default_max_retries")]
    max_retries: u32,
    #[serde(default)]
    delay: Duration,
}

impl Default for Retry {
    /// Three retries with no inter-attempt pause.
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            delay: Duration::ZERO,
        }
    }
}

impl Retry {
    /// Policy with the given retry budget and no inter-attempt pause.
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    /// Set the fixed pause between a failed attempt and the next one.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Additional attempts allowed after the first.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Fixed pause between attempts.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Invoke `op`, retrying every failure until the budget runs out.
    ///
    /// Blocks the calling thread for the inter-attempt pause. The final
    /// failure is returned unchanged.
    pub fn execute<T, E>(&self, op: impl FnMut() -> Result<T, E>) -> Result<T, E> {
        self.execute_when(op, |_| true)
    }

    /// Invoke `op`, retrying only failures `should_retry` approves.
    ///
    /// The predicate is consulted before the budget: a `false` verdict
    /// propagates the failure immediately, regardless of remaining attempts.
    pub fn execute_when<T, E>(
        &self,
        mut op: impl FnMut() -> Result<T, E>,
        mut should_retry: impl FnMut(&E) -> bool,
    ) -> Result<T, E> {
        // A zero budget is a plain invocation; the predicate never runs.
        if self.max_retries == 0 {
            return op();
        }

        let mut attempt: u32 = 0;
        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(failure) => {
                    if !should_retry(&failure) {
                        debug!(attempt = attempt + 1, "retry vetoed by predicate");
                        return Err(failure);
                    }
                    if attempt >= self.max_retries {
                        warn!(attempts = attempt + 1, "retry budget exhausted");
                        return Err(failure);
                    }
                    debug!(
                        attempt = attempt + 1,
                        max_retries = self.max_retries,
                        delay = ?self.delay,
                        "attempt failed; retrying"
                    );
                    if !self.delay.is_zero() {
                        thread::sleep(self.delay);
                    }
                    attempt += 1;
                }
            }
        }
    }

    /// Async mirror of [`execute`](Self::execute).
    ///
    /// Suspends for the inter-attempt pause without blocking the thread.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use gatework::retry::Retry;
    /// use std::sync::Arc;
    /// use std::sync::atomic::{AtomicU32, Ordering};
    ///
    /// # async fn example() -> Result<(), std::io::Error> {
    /// let retry = Retry::new(3);
    /// let attempts = Arc::new(AtomicU32::new(0));
    ///
    /// let value = retry
    ///     .execute_async(|| {
    ///         let attempts = Arc::clone(&attempts);
    ///         async move {
    ///             if attempts.fetch_add(1, Ordering::SeqCst) < 2 {
    ///                 Err(std::io::Error::other("transient"))
    ///             } else {
    ///                 Ok(42)
    ///             }
    ///         }
    ///     })
    ///     .await?;
    /// assert_eq!(value, 42);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn execute_async<T, E, F, Fut>(&self, op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.execute_async_when(op, |_| true).await
    }

    /// Async mirror of [`execute_when`](Self::execute_when).
    pub async fn execute_async_when<T, E, F, Fut>(
        &self,
        mut op: F,
        mut should_retry: impl FnMut(&E) -> bool,
    ) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if self.max_retries == 0 {
            return op().await;
        }

        let mut attempt: u32 = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(failure) => {
                    if !should_retry(&failure) {
                        debug!(attempt = attempt + 1, "retry vetoed by predicate");
                        return Err(failure);
                    }
                    if attempt >= self.max_retries {
                        warn!(attempts = attempt + 1, "retry budget exhausted");
                        return Err(failure);
                    }
                    debug!(
                        attempt = attempt + 1,
                        max_retries = self.max_retries,
                        delay = ?self.delay,
                        "attempt failed; retrying"
                    );
                    if !self.delay.is_zero() {
                        tokio::time::sleep(self.delay).await;
                    }
                    attempt += 1;
                }
            }
        }
    }
}

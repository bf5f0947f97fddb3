//! The batch runner and its builder.

use crate::error::BatchError;
use crate::guard;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Sentinel cap meaning "no limit on simultaneously executing work items".
pub const UNBOUNDED: i32 = -1;

/// Runs batches of independent work items with a cap on how many execute
/// simultaneously.
///
/// The runner holds only policy: the concurrency cap, an optional overall
/// timeout, and an optional cancellation signal. It is cheap to clone and
/// reusable across batches. Work items are admitted in submission order;
/// completion order depends on each item's runtime.
///
/// A failing work item never aborts its siblings. Failures are collected and
/// reported together as [`BatchError::ItemFailures`] once the whole batch has
/// finished.
///
/// # Examples
///
/// ```rust
/// use gatework::batch::BatchRunner;
///
/// # async fn example() -> Result<(), gatework::error::BatchError<std::io::Error>> {
/// let runner = BatchRunner::builder().max_concurrency(4).build();
///
/// runner
///     .run_all((0..8).map(|_| async { Ok::<_, std::io::Error>(()) }))
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct BatchRunner {
    max_concurrency: i32,
    timeout: Option<Duration>,
    cancel: Option<CancellationToken>,
}

impl Default for BatchRunner {
    /// An unbounded runner with no timeout and no cancellation signal.
    fn default() -> Self {
        Self {
            max_concurrency: UNBOUNDED,
            timeout: None,
            cancel: None,
        }
    }
}

impl BatchRunner {
    /// Create a new builder for configuring a runner.
    pub fn builder() -> BatchRunnerBuilder {
        BatchRunnerBuilder::default()
    }

    /// The raw concurrency cap work is admitted under.
    ///
    /// [`UNBOUNDED`] (`-1`) means no cap.
    pub fn max_concurrency(&self) -> i32 {
        self.max_concurrency
    }

    /// The overall bound on a whole batch, if one is set.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Run a batch of future-based work items.
    ///
    /// A permit is acquired in submission order before each item is spawned
    /// and released when the item finishes, on success, failure, or panic.
    /// The call returns once every item has completed; an empty batch is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// - [`BatchError::InvalidArgument`] when the configured cap is `0` or
    ///   below [`UNBOUNDED`], rejected before any item starts.
    /// - [`BatchError::Cancelled`] when the cancellation signal fires at an
    ///   admission point; already-running items continue detached.
    /// - [`BatchError::Timeout`] when the overall wait exceeds the configured
    ///   bound; already-running items continue detached.
    /// - [`BatchError::ItemFailures`] when one or more items failed after the
    ///   whole batch finished.
    ///
    /// A panicking work item releases its permit and the panic is resumed on
    /// the caller once observed.
    pub async fn run_all<I, Fut, E>(&self, items: I) -> Result<(), BatchError<E>>
    where
        I: IntoIterator<Item = Fut>,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Send + 'static,
    {
        let limit = guard::concurrency_limit(self.max_concurrency, "max_concurrency")?;
        match self.timeout {
            Some(bound) => match tokio::time::timeout(bound, self.drive(items, limit)).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    debug!(limit = ?bound, "batch timed out");
                    Err(BatchError::Timeout { limit: bound })
                }
            },
            None => self.drive(items, limit).await,
        }
    }

    /// Run a batch of closure-based work items.
    ///
    /// Each closure executes on the blocking thread pool under the same permit
    /// discipline and error semantics as [`run_all`](Self::run_all).
    pub async fn run_all_fns<I, F, E>(&self, items: I) -> Result<(), BatchError<E>>
    where
        I: IntoIterator<Item = F>,
        F: FnOnce() -> Result<(), E> + Send + 'static,
        E: Send + 'static,
    {
        self.run_all(items.into_iter().map(|work| async move {
            match tokio::task::spawn_blocking(work).await {
                Ok(outcome) => outcome,
                Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
                // A blocking task is only cancelled while the runtime shuts
                // down; there is no outcome left to report.
                Err(_) => Ok(()),
            }
        }))
        .await
    }

    async fn drive<I, Fut, E>(&self, items: I, limit: Option<usize>) -> Result<(), BatchError<E>>
    where
        I: IntoIterator<Item = Fut>,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Send + 'static,
    {
        let pool = limit.map(|permits| Arc::new(Semaphore::new(permits)));
        let mut handles = Vec::new();

        for work in items {
            if let Some(token) = &self.cancel {
                if token.is_cancelled() {
                    debug!(started = handles.len(), "batch cancelled before admission");
                    return Err(BatchError::Cancelled {
                        started: handles.len(),
                    });
                }
            }
            let permit = match &pool {
                Some(pool) => match self.admit(pool).await {
                    Some(permit) => Some(permit),
                    None => {
                        debug!(
                            started = handles.len(),
                            "batch cancelled while waiting for a permit"
                        );
                        return Err(BatchError::Cancelled {
                            started: handles.len(),
                        });
                    }
                },
                None => None,
            };
            handles.push(tokio::spawn(async move {
                // The permit rides on the task and is released on drop, so a
                // failing or panicking item can never leak pool capacity.
                let _permit = permit;
                work.await
            }));
        }

        let submitted = handles.len();
        let mut failures = Vec::new();
        for handle in handles {
            match handle.await {
                Ok(Ok(())) => {}
                Ok(Err(failure)) => failures.push(failure),
                Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
                // Only reachable when the runtime is tearing down mid-batch.
                Err(_) => {}
            }
        }

        debug!(submitted, failed = failures.len(), "batch finished");
        if failures.is_empty() {
            Ok(())
        } else {
            Err(BatchError::ItemFailures {
                failures,
                submitted,
            })
        }
    }

    /// Wait for a permit, racing the cancellation signal when one is set.
    ///
    /// Returns `None` when cancellation wins the race.
    async fn admit(&self, pool: &Arc<Semaphore>) -> Option<OwnedSemaphorePermit> {
        match &self.cancel {
            Some(token) => {
                tokio::select! {
                    biased;
                    () = token.cancelled() => None,
                    permit = Arc::clone(pool).acquire_owned() => {
                        Some(permit.expect("batch semaphore is never closed"))
                    }
                }
            }
            None => Some(
                Arc::clone(pool)
                    .acquire_owned()
                    .await
                    .expect("batch semaphore is never closed"),
            ),
        }
    }
}

/// Builder for [`BatchRunner`].
///
/// All settings are optional; the default runner is unbounded with no timeout
/// and no cancellation signal.
#[derive(Debug, Default)]
pub struct BatchRunnerBuilder {
    max_concurrency: Option<i32>,
    timeout: Option<Duration>,
    cancel: Option<CancellationToken>,
}

impl BatchRunnerBuilder {
    /// Cap on simultaneously executing work items.
    ///
    /// [`UNBOUNDED`] (`-1`) removes the cap. Zero and values below `-1` are
    /// rejected when a batch is run, before any work item starts.
    pub fn max_concurrency(mut self, max_concurrency: i32) -> Self {
        self.max_concurrency = Some(max_concurrency);
        self
    }

    /// Overall bound on the whole batch wait.
    ///
    /// Bounds the batch, not any individual item. Unset waits indefinitely.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Cooperative cancellation signal, observed at each admission point.
    ///
    /// Once the token fires no further work items are admitted; items already
    /// running are not interrupted.
    pub fn cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Build the runner.
    pub fn build(self) -> BatchRunner {
        BatchRunner {
            max_concurrency: self.max_concurrency.unwrap_or(UNBOUNDED),
            timeout: self.timeout,
            cancel: self.cancel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_to_unbounded_with_no_timeout() {
        let runner = BatchRunner::builder().build();
        assert_eq!(runner.max_concurrency(), UNBOUNDED);
        assert_eq!(runner.timeout(), None);
    }

    #[test]
    fn builder_carries_explicit_settings() {
        let runner = BatchRunner::builder()
            .max_concurrency(4)
            .timeout(Duration::from_secs(1))
            .build();
        assert_eq!(runner.max_concurrency(), 4);
        assert_eq!(runner.timeout(), Some(Duration::from_secs(1)));
    }

    #[test]
    fn default_runner_is_unbounded() {
        assert_eq!(BatchRunner::default().max_concurrency(), UNBOUNDED);
    }

    #[tokio::test]
    async fn invalid_caps_are_rejected_before_iterating_items() {
        for cap in [0, -2, i32::MIN] {
            let err = BatchRunner::builder()
                .max_concurrency(cap)
                .build()
                .run_all(std::iter::empty::<std::future::Ready<Result<(), std::io::Error>>>())
                .await
                .unwrap_err();
            assert!(
                matches!(err, BatchError::InvalidArgument(_)),
                "cap {cap} should be rejected"
            );
        }
    }
}

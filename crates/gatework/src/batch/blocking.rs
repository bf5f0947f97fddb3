//! Blocking entry points.
//!
//! Each call builds a private multi-thread runtime and blocks the calling
//! thread until the batch finishes. Permit mechanics and error semantics are
//! identical to the async forms; only the waiting style differs.
//!
//! When a timeout or cancellation aborts the wait, the private runtime still
//! drains already-started closure items while it shuts down, so the error may
//! surface only after those items finish.

use super::BatchRunner;
use crate::error::BatchError;
use std::future::Future;
use tokio::runtime;

impl BatchRunner {
    /// Blocking form of [`run_all`](BatchRunner::run_all).
    ///
    /// # Errors
    ///
    /// The same error set as [`run_all`](BatchRunner::run_all), plus
    /// [`BatchError::Runtime`] when the private runtime cannot start.
    ///
    /// # Panics
    ///
    /// Panics when called from within an async context, like
    /// [`tokio::runtime::Runtime::block_on`] does.
    pub fn wait_all<I, Fut, E>(&self, items: I) -> Result<(), BatchError<E>>
    where
        I: IntoIterator<Item = Fut>,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Send + 'static,
    {
        self.blocking_runtime()?.block_on(self.run_all(items))
    }

    /// Blocking form of [`run_all_fns`](BatchRunner::run_all_fns).
    ///
    /// # Errors
    ///
    /// The same error set as [`run_all_fns`](BatchRunner::run_all_fns), plus
    /// [`BatchError::Runtime`] when the private runtime cannot start.
    ///
    /// # Panics
    ///
    /// Panics when called from within an async context.
    pub fn wait_all_fns<I, F, E>(&self, items: I) -> Result<(), BatchError<E>>
    where
        I: IntoIterator<Item = F>,
        F: FnOnce() -> Result<(), E> + Send + 'static,
        E: Send + 'static,
    {
        self.blocking_runtime()?.block_on(self.run_all_fns(items))
    }

    fn blocking_runtime<E>(&self) -> Result<runtime::Runtime, BatchError<E>> {
        runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(BatchError::Runtime)
    }
}

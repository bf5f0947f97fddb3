//! Error taxonomy for the batch runner.

use crate::guard::InvalidArgument;
use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by [`BatchRunner`](crate::batch::BatchRunner).
///
/// Generic over `E`, the failure type of the caller's work items, so that
/// individual failures are reported back unchanged rather than wrapped.
#[derive(Debug, Error)]
pub enum BatchError<E> {
    /// A malformed argument was rejected before any work item started.
    #[error(transparent)]
    InvalidArgument(#[from] InvalidArgument),

    /// The cancellation signal fired at an admission point.
    ///
    /// Work items that were already running continue to completion, but their
    /// outcomes are no longer collected.
    #[error("batch cancelled after {started} work item(s) started")]
    Cancelled {
        /// Number of work items admitted before cancellation was observed.
        started: usize,
    },

    /// The overall wait for the batch exceeded the configured bound.
    ///
    /// The bound covers the whole batch, not any individual work item;
    /// already-started items keep running detached.
    #[error("batch timed out after {limit:?}")]
    Timeout {
        /// The configured bound that was exceeded.
        limit: Duration,
    },

    /// One or more work items failed.
    ///
    /// Every sibling still ran to completion; the failures are collected and
    /// reported here once the whole batch finished.
    #[error("{} of {submitted} work item(s) failed", .failures.len())]
    ItemFailures {
        /// The individual failures, in collection order.
        failures: Vec<E>,
        /// Total number of work items in the batch.
        submitted: usize,
    },

    /// A blocking entry point could not start its private runtime.
    #[error("failed to start the batch runtime")]
    Runtime(#[source] std::io::Error),
}

impl<E> BatchError<E> {
    /// True when the batch was cancelled cooperatively.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    /// True when the overall timeout elapsed.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// The collected work-item failures, empty for every other variant.
    pub fn failures(&self) -> &[E] {
        match self {
            Self::ItemFailures { failures, .. } => failures,
            _ => &[],
        }
    }
}

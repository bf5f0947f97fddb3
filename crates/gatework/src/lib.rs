#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Bounded-concurrency batch execution and bounded retry for Tokio.
//!
//! Two independent building blocks:
//!
//! - [`batch::BatchRunner`] runs a batch of independent work items while
//!   capping how many execute at once, with cooperative cancellation and an
//!   overall timeout.
//! - [`retry::Retry`] re-attempts a failing operation a bounded number of
//!   times with a fixed pause between attempts, optionally gated by a
//!   per-failure predicate.
//!
//! Neither component depends on the other; they compose at the call site when
//! a work item wraps its own retry policy.
//!
//! # Examples
//!
//! Using the prelude for convenient imports:
//!
//! ```rust
//! use gatework::prelude::*;
//!
//! # async fn example() -> Result<(), BatchError<std::io::Error>> {
//! let runner = BatchRunner::builder().max_concurrency(4).build();
//!
//! runner
//!     .run_all((0..16).map(|_| async { Ok::<_, std::io::Error>(()) }))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod error;
pub mod guard;
pub mod retry;

/// Convenient re-exports of commonly used items.
///
/// Import the whole public surface with:
///
/// ```rust
/// use gatework::prelude::*;
/// ```
pub mod prelude {
    pub use crate::batch::{BatchRunner, BatchRunnerBuilder, UNBOUNDED};
    pub use crate::error::BatchError;
    pub use crate::guard::InvalidArgument;
    pub use crate::retry::Retry;
    pub use tokio_util::sync::CancellationToken;
}

//! Bounded-concurrency batch execution.
//!
//! A [`BatchRunner`] runs a batch of independent work items while capping how
//! many execute at once. A counting semaphore backs the cap: a permit is
//! acquired in submission order before each item starts and released when that
//! item finishes, whatever its outcome.
//!
//! # Key Types
//!
//! - [`BatchRunner`] - the runner and its policy (cap, timeout, cancellation)
//! - [`BatchRunnerBuilder`] - fluent construction
//! - [`UNBOUNDED`] - sentinel cap admitting every item immediately
//!
//! # Examples
//!
//! ```rust
//! use gatework::batch::BatchRunner;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), gatework::error::BatchError<std::io::Error>> {
//! let runner = BatchRunner::builder()
//!     .max_concurrency(3)
//!     .timeout(Duration::from_secs(30))
//!     .build();
//!
//! runner
//!     .run_all((0..10).map(|_| async { Ok::<_, std::io::Error>(()) }))
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod blocking;
mod runner;

pub use runner::{BatchRunner, BatchRunnerBuilder, UNBOUNDED};

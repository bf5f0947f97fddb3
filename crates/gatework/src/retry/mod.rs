//! Bounded retry with a fixed inter-attempt pause.
//!
//! [`Retry`] re-attempts a failing operation until it succeeds, a per-failure
//! predicate declines, or the retry budget runs out. Attempts are strictly
//! sequential and the final failure is returned unchanged.
//!
//! # Examples
//!
//! ```rust
//! use gatework::retry::Retry;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), std::io::Error> {
//! let retry = Retry::new(3).with_delay(Duration::from_millis(100));
//!
//! let value = retry
//!     .execute_async(|| async {
//!         // Your operation here
//!         Ok::<_, std::io::Error>(42)
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod executor;

pub use executor::Retry;

//! Example: running a batch of flaky operations under a concurrency cap,
//! each wrapped in its own retry policy.
//!
//! This example demonstrates:
//! 1. Capping simultaneous work with `BatchRunner`
//! 2. Composing a `Retry` policy inside each work item
//! 3. Bounding the whole batch with a timeout
//!
//! Run with:
//! ```bash
//! cargo run -p gatework --example flaky_batch
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

use anyhow::Result;
use gatework::prelude::*;

/// A simulated endpoint that fails its first `fail_count` calls.
struct FlakyEndpoint {
    name: String,
    calls: AtomicU32,
    fail_count: u32,
}

impl FlakyEndpoint {
    fn new(name: String, fail_count: u32) -> Self {
        Self {
            name,
            calls: AtomicU32::new(0),
            fail_count,
        }
    }

    async fn call(&self) -> Result<(), std::io::Error> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;
        if call < self.fail_count {
            println!("  {}: call {} FAILED (transient)", self.name, call + 1);
            Err(std::io::Error::other(format!(
                "transient failure on call {}",
                call + 1
            )))
        } else {
            println!("  {}: call {} ok", self.name, call + 1);
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let endpoints: Vec<_> = (0..8)
        .map(|i| Arc::new(FlakyEndpoint::new(format!("endpoint-{i}"), i % 3)))
        .collect();

    let retry = Retry::new(3).with_delay(Duration::from_millis(10));
    let runner = BatchRunner::builder()
        .max_concurrency(3)
        .timeout(Duration::from_secs(5))
        .build();

    println!("Running 8 flaky endpoints, cap 3, up to 3 retries each:");
    let started_at = Instant::now();

    runner
        .run_all(endpoints.iter().cloned().map(|endpoint| {
            let retry = retry.clone();
            async move {
                retry
                    .execute_async(|| {
                        let endpoint = Arc::clone(&endpoint);
                        async move { endpoint.call().await }
                    })
                    .await
            }
        }))
        .await?;

    let total_calls: u32 = endpoints
        .iter()
        .map(|endpoint| endpoint.calls.load(Ordering::SeqCst))
        .sum();
    println!(
        "All endpoints succeeded in {:?} with {} calls in total",
        started_at.elapsed(),
        total_calls
    );
    Ok(())
}

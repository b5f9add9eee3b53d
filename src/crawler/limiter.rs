//! Per-credential rate limiting
//!
//! Each worker owns exactly one limiter, so there is no internal locking:
//! the limiter only has to be correct for a single sequential caller.

use std::time::{Duration, Instant};

/// Enforces a minimum delay between successive requests on one credential
#[derive(Debug)]
pub struct RateLimiter {
    interval: Duration,
    last_request: Option<Instant>,
}

impl RateLimiter {
    /// Creates a limiter with the given minimum interval between requests
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_request: None,
        }
    }

    /// Suspends until at least `interval` has passed since the previous call
    ///
    /// The first call never blocks.
    pub async fn wait(&mut self) {
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < self.interval {
                tokio::time::sleep(self.interval - elapsed).await;
            }
        }
        self.last_request = Some(Instant::now());
    }
}

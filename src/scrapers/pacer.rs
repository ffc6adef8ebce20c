//! Fixed-interval request pacing.
//!
//! One `RequestPacer` is shared by every worker in a run, so the configured
//! delay applies per logical request no matter which task issues it. The
//! interval is configuration, never adapted from responses.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::trace;

#[derive(Debug)]
pub struct RequestPacer {
    delay: Duration,
    last: Mutex<Option<Instant>>,
}

impl RequestPacer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last: Mutex::new(None),
        }
    }

    /// Configured delay between logical requests.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Wait until the interval has passed since the previous request, then
    /// claim the slot. The lock is held across the sleep so concurrent
    /// callers serialize instead of piling onto the same slot.
    pub async fn acquire(&self) {
        if self.delay.is_zero() {
            return;
        }

        let mut last = self.last.lock().await;
        if let Some(prev) = *last {
            let ready_at = prev + self.delay;
            let now = Instant::now();
            if ready_at > now {
                trace!("pacing: waiting {:?}", ready_at - now);
                tokio::time::sleep_until(ready_at).await;
            }
        }
        *last = Some(Instant::now());
    }
}

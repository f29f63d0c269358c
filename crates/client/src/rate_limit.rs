use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep};

#[derive(Debug, Default)]
struct LimiterState {
    last_request: Option<Instant>,
    count: u64,
}

/// Enforces a minimum spacing between consecutive outbound calls.
///
/// The state lock is held across the wait, so concurrent callers are
/// released one at a time and never closer together than `min_spacing`.
/// Share one limiter (via `Arc`) between every client talking to the same
/// backend.
#[derive(Debug)]
pub struct RateLimiter {
    min_spacing: Duration,
    state: Mutex<LimiterState>,
}

impl RateLimiter {
    pub fn new(min_spacing: Duration) -> Self {
        Self {
            min_spacing,
            state: Mutex::new(LimiterState::default()),
        }
    }

    pub fn unlimited() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Wait until the next call may go out. Returns the call's sequence number.
    pub async fn acquire(&self) -> u64 {
        let mut state = self.state.lock().await;

        if let Some(last) = state.last_request {
            let elapsed = last.elapsed();
            if elapsed < self.min_spacing {
                let wait = self.min_spacing - elapsed;
                tracing::debug!(wait_ms = wait.as_millis() as u64, "rate limit: delaying request");
                sleep(wait).await;
            }
        }

        state.last_request = Some(Instant::now());
        state.count += 1;
        state.count
    }

    /// Number of calls released so far
    pub async fn request_count(&self) -> u64 {
        self.state.lock().await.count
    }
}

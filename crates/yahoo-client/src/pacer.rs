//! Sliding-window request pacing.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Caps outbound requests at `max_requests` per rolling `window`.
///
/// `acquire` parks the task until a slot frees up; clones share one
/// window, so a cloned client still respects the same budget.
#[derive(Clone)]
pub struct RequestPacer {
    sent_at: Arc<Mutex<VecDeque<Instant>>>,
    max_requests: usize,
    window: Duration,
}

impl RequestPacer {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            sent_at: Arc::new(Mutex::new(VecDeque::new())),
            max_requests,
            window,
        }
    }

    pub async fn acquire(&self) {
        loop {
            let mut sent_at = self.sent_at.lock().await;
            let now = Instant::now();

            while let Some(&oldest) = sent_at.front() {
                if now.duration_since(oldest) >= self.window {
                    sent_at.pop_front();
                } else {
                    break;
                }
            }

            if sent_at.len() < self.max_requests {
                sent_at.push_back(now);
                return;
            }

            // wait for the oldest request to leave the window
            let oldest = *sent_at.front().expect("window is full, front exists");
            let wake_at = oldest + self.window + Duration::from_millis(25);
            drop(sent_at);
            tracing::debug!(
                wait_secs = wake_at.duration_since(now).as_secs_f64(),
                "request pacer: waiting for a slot"
            );
            tokio::time::sleep_until(wake_at).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn grants_slots_up_to_the_cap_immediately() {
        let pacer = RequestPacer::new(3, Duration::from_secs(60));

        let start = Instant::now();
        for _ in 0..3 {
            pacer.acquire().await;
        }
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn parks_until_the_window_rolls_over() {
        let pacer = RequestPacer::new(1, Duration::from_millis(50));

        pacer.acquire().await;
        let start = Instant::now();
        pacer.acquire().await;
        assert!(start.elapsed() >= Duration::from_millis(50));
    }
}

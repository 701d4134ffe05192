//! Retry policy for rate-limited provider endpoints.

use std::time::Duration;

/// Exponential backoff with jitter for failed requests.
///
/// Delay for attempt `k` is `base × 2^k`, capped at `max_delay`, then
/// spread ±50% when jitter is on so synchronized clients do not retry in
/// lockstep.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total tries = `max_attempts`; 1 means no retrying.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub jitter: bool,
    /// HTTP statuses worth retrying; everything else fails immediately.
    pub retry_on_status: Vec<u16>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(15),
            jitter: true,
            retry_on_status: vec![429, 500, 502, 503, 504],
        }
    }
}

impl RetryPolicy {
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    pub fn should_retry_status(&self, status: u16) -> bool {
        self.retry_on_status.contains(&status)
    }

    /// Backoff before retry number `attempt` (0-based).
    pub fn delay(&self, attempt: u32) -> Duration {
        let exponential = self.base_delay.as_secs_f64() * 2f64.powi(attempt as i32);
        let capped = exponential.min(self.max_delay.as_secs_f64());
        if !self.jitter {
            return Duration::from_secs_f64(capped);
        }
        // uniform in [0.5, 1.5] of the capped delay
        let factor = 0.5 + fastrand::f64();
        Duration::from_secs_f64(capped * factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delays_double_and_cap_without_jitter() {
        let policy = RetryPolicy {
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(500),
            jitter: false,
            ..Default::default()
        };

        assert_eq!(policy.delay(0), Duration::from_millis(100));
        assert_eq!(policy.delay(1), Duration::from_millis(200));
        assert_eq!(policy.delay(2), Duration::from_millis(400));
        assert_eq!(policy.delay(3), Duration::from_millis(500));
        assert_eq!(policy.delay(8), Duration::from_millis(500));
    }

    #[test]
    fn jitter_stays_within_half_and_one_and_a_half() {
        let policy = RetryPolicy {
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(15),
            jitter: true,
            ..Default::default()
        };

        for _ in 0..100 {
            let millis = policy.delay(1).as_secs_f64() * 1000.0;
            assert!((100.0..=300.0).contains(&millis), "delay {millis}ms out of range");
        }
    }

    #[test]
    fn only_listed_statuses_are_retryable() {
        let policy = RetryPolicy::default();

        assert!(policy.should_retry_status(429));
        assert!(policy.should_retry_status(503));
        assert!(!policy.should_retry_status(404));
        assert!(!policy.should_retry_status(401));
    }
}

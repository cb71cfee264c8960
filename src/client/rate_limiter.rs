//! Rate limiting for API requests

use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Token bucket limiter.
///
/// One token is refilled every `rate_limit_ms`; the bucket holds at most
/// `capacity` tokens so short bursts are allowed after idle periods.
#[derive(Debug)]
pub struct RateLimiter {
    rate_limit_ms: u64,
    capacity: f64,
    state: Mutex<Bucket>,
}

#[derive(Debug)]
struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

impl Bucket {
    fn refill(&mut self, rate_limit_ms: u64, capacity: f64) {
        let now = Instant::now();
        if rate_limit_ms == 0 {
            self.tokens = capacity;
        } else {
            let elapsed_ms = now.duration_since(self.last_refill).as_secs_f64() * 1000.0;
            self.tokens = (self.tokens + elapsed_ms / rate_limit_ms as f64).min(capacity);
        }
        self.last_refill = now;
    }
}

impl RateLimiter {
    pub fn new(rate_limit_ms: u64) -> Self {
        Self::with_capacity(rate_limit_ms, 1.0)
    }

    pub fn with_capacity(rate_limit_ms: u64, capacity: f64) -> Self {
        let capacity = capacity.max(1.0);
        Self {
            rate_limit_ms,
            capacity,
            state: Mutex::new(Bucket {
                tokens: capacity,
                last_refill: Instant::now(),
            }),
        }
    }

    /// Takes `cost` tokens if available without waiting
    pub async fn try_acquire(&self, cost: f64) -> bool {
        let mut bucket = self.state.lock().await;
        bucket.refill(self.rate_limit_ms, self.capacity);
        if bucket.tokens >= cost {
            bucket.tokens -= cost;
            true
        } else {
            false
        }
    }

    /// Waits until `cost` tokens are available, then takes them
    pub async fn throttle(&self, cost: f64) {
        loop {
            let wait = {
                let mut bucket = self.state.lock().await;
                bucket.refill(self.rate_limit_ms, self.capacity);
                if bucket.tokens >= cost {
                    bucket.tokens -= cost;
                    return;
                }
                let missing = cost - bucket.tokens;
                Duration::from_secs_f64(missing * self.rate_limit_ms as f64 / 1000.0)
            };
            tokio::time::sleep(wait.max(Duration::from_millis(1))).await;
        }
    }

    pub async fn available_tokens(&self) -> f64 {
        let mut bucket = self.state.lock().await;
        bucket.refill(self.rate_limit_ms, self.capacity);
        bucket.tokens
    }

    pub fn rate_limit_ms(&self) -> u64 {
        self.rate_limit_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_try_acquire_drains_bucket() {
        let limiter = RateLimiter::new(60_000);
        assert!(limiter.try_acquire(1.0).await);
        assert!(!limiter.try_acquire(1.0).await);
    }

    #[tokio::test]
    async fn test_zero_rate_never_blocks() {
        let limiter = RateLimiter::new(0);
        for _ in 0..10 {
            assert!(limiter.try_acquire(1.0).await);
        }
    }

    #[tokio::test]
    async fn test_throttle_waits_for_refill() {
        let limiter = RateLimiter::new(20);
        limiter.throttle(1.0).await;
        let started = Instant::now();
        limiter.throttle(1.0).await;
        assert!(started.elapsed() >= Duration::from_millis(15));
    }

    #[tokio::test]
    async fn test_capacity_allows_burst() {
        let limiter = RateLimiter::with_capacity(60_000, 3.0);
        assert!(limiter.try_acquire(1.0).await);
        assert!(limiter.try_acquire(1.0).await);
        assert!(limiter.try_acquire(1.0).await);
        assert!(!limiter.try_acquire(1.0).await);
        assert!(limiter.available_tokens().await < 1.0);
    }
}

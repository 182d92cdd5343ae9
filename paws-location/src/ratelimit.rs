//! Sliding-window rate limiter for outbound Places API calls.
//!
//! This guards this instance's own egress, not user traffic, so it is
//! an in-process counter rather than a shared Redis one: a timestamp
//! ring under a mutex, pruned on every acquire.

use std::collections::VecDeque;

use tokio::sync::Mutex;

/// Millisecond clock, injectable so the window logic is testable.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

pub struct SlidingWindowLimiter<C: Clock = SystemClock> {
    max_calls: usize,
    window_ms: i64,
    calls: Mutex<VecDeque<i64>>,
    clock: C,
}

impl SlidingWindowLimiter<SystemClock> {
    pub fn new(max_calls: usize, window_secs: u64) -> Self {
        Self::with_clock(max_calls, window_secs, SystemClock)
    }
}

impl<C: Clock> SlidingWindowLimiter<C> {
    pub fn with_clock(max_calls: usize, window_secs: u64, clock: C) -> Self {
        Self {
            max_calls,
            window_ms: (window_secs * 1000) as i64,
            calls: Mutex::new(VecDeque::new()),
            clock,
        }
    }

    /// Record a call if the rolling window has room. Returns false for
    /// the (N+1)th call within the window.
    pub async fn try_acquire(&self) -> bool {
        let now = self.clock.now_ms();
        let mut calls = self.calls.lock().await;

        while let Some(&oldest) = calls.front() {
            if now - oldest >= self.window_ms {
                calls.pop_front();
            } else {
                break;
            }
        }

        if calls.len() >= self.max_calls {
            return false;
        }

        calls.push_back(now);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI64, Ordering};

    struct ManualClock(AtomicI64);

    impl Clock for ManualClock {
        fn now_ms(&self) -> i64 {
            self.0.load(Ordering::SeqCst)
        }
    }

    impl ManualClock {
        fn advance(&self, ms: i64) {
            self.0.fetch_add(ms, Ordering::SeqCst);
        }
    }

    fn limiter(max_calls: usize, window_secs: u64) -> SlidingWindowLimiter<ManualClock> {
        SlidingWindowLimiter::with_clock(max_calls, window_secs, ManualClock(AtomicI64::new(0)))
    }

    #[tokio::test]
    async fn rejects_the_call_after_the_limit() {
        let limiter = limiter(3, 60);

        assert!(limiter.try_acquire().await);
        assert!(limiter.try_acquire().await);
        assert!(limiter.try_acquire().await);
        assert!(!limiter.try_acquire().await, "4th call within the window must be rejected");
    }

    #[tokio::test]
    async fn window_slides_open_again() {
        let limiter = limiter(2, 60);

        assert!(limiter.try_acquire().await);
        limiter.clock.advance(30_000);
        assert!(limiter.try_acquire().await);
        assert!(!limiter.try_acquire().await);

        // First call (t=0) leaves the window at t=60s; the second
        // (t=30s) is still inside it.
        limiter.clock.advance(30_000);
        assert!(limiter.try_acquire().await);
        assert!(!limiter.try_acquire().await);
    }

    #[tokio::test]
    async fn fully_elapsed_window_resets_capacity() {
        let limiter = limiter(2, 60);

        assert!(limiter.try_acquire().await);
        assert!(limiter.try_acquire().await);
        assert!(!limiter.try_acquire().await);

        limiter.clock.advance(60_000);
        assert!(limiter.try_acquire().await);
        assert!(limiter.try_acquire().await);
        assert!(!limiter.try_acquire().await);
    }
}

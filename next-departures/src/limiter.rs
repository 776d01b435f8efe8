//! Request admission limiting.
//!
//! transit.land imposes an aggregate request budget per client, not a
//! per-resource one, so every outgoing call in the process goes through a
//! single shared limiter. Queued callers are only ever delayed, never
//! dropped, and admission order matches arrival order.

use std::collections::VecDeque;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Sliding-window rate limiter shared by all API calls.
///
/// At most `capacity` admissions may start within any `window`-length
/// interval. Excess callers wait their turn: the internal mutex hands the
/// lock to the longest waiter first, and the queue position is held while
/// sleeping, so a later caller can never overtake an earlier one.
#[derive(Debug)]
pub struct RateLimiter {
    capacity: usize,
    window: Duration,
    admissions: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    /// Create a limiter admitting `capacity` requests per `window`.
    pub fn new(capacity: usize, window: Duration) -> Self {
        assert!(capacity > 0, "rate limiter capacity must be non-zero");
        Self {
            capacity,
            window,
            admissions: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// Wait until a request may start.
    ///
    /// Completes immediately while the window has free slots. Never fails;
    /// the wrapped call's own errors are none of the limiter's business.
    pub async fn acquire(&self) {
        let mut admissions = self.admissions.lock().await;
        loop {
            let now = Instant::now();
            while let Some(front) = admissions.front() {
                if now.duration_since(*front) >= self.window {
                    admissions.pop_front();
                } else {
                    break;
                }
            }
            if admissions.len() < self.capacity {
                admissions.push_back(now);
                return;
            }
            // Sleep while holding the lock: admission is serialised anyway,
            // and releasing here would let a later caller overtake.
            let oldest = *admissions.front().expect("window is full");
            tokio::time::sleep_until(oldest + self.window).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn immediate_when_under_capacity() {
        let limiter = RateLimiter::new(4, Duration::from_millis(100));
        let start = Instant::now();
        for _ in 0..4 {
            limiter.acquire().await;
        }
        assert_eq!(Instant::now().duration_since(start), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn four_calls_through_capacity_one_accrue_600ms() {
        let limiter = Arc::new(RateLimiter::new(1, Duration::from_millis(100)));
        let start = Instant::now();

        let mut handles = Vec::new();
        for _ in 0..4 {
            let limiter = limiter.clone();
            handles.push(tokio::spawn(async move {
                limiter.acquire().await;
                Instant::now().duration_since(start)
            }));
        }

        // Delays are 0, 100, 200 and 300ms in whatever admission order.
        let mut total = Duration::ZERO;
        for handle in handles {
            total += handle.await.unwrap();
        }
        assert_eq!(total, Duration::from_millis(600));
    }

    #[tokio::test(start_paused = true)]
    async fn admission_preserves_submission_order() {
        let limiter = Arc::new(RateLimiter::new(1, Duration::from_millis(50)));
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));

        let mut handles = Vec::new();
        for i in 0..4 {
            let limiter = limiter.clone();
            let order = order.clone();
            handles.push(tokio::spawn(async move {
                limiter.acquire().await;
                order.lock().unwrap().push(i);
            }));
            // Let the spawned task reach the admission queue before the
            // next one is submitted.
            tokio::task::yield_now().await;
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn window_frees_slots_as_time_passes() {
        let limiter = RateLimiter::new(2, Duration::from_millis(100));
        let start = Instant::now();

        limiter.acquire().await;
        limiter.acquire().await;
        limiter.acquire().await;

        // The third call had to wait for the first slot to expire.
        assert_eq!(
            Instant::now().duration_since(start),
            Duration::from_millis(100)
        );
    }
}

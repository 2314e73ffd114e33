// Rate limiting for Bluesky API calls with exponential backoff.
//
// The public AppView allows roughly 3000 requests per 5 minutes. Fetching
// one profile costs a handful of paginated calls (feed, follows, followers,
// likes), so a comparison stays well inside the window, but the interactive
// loop can run many comparisons back to back.
//
// The limiter is shared across concurrent fetches via Arc<RateLimiter>,
// using interior mutability so callers only need &self. Locks are never
// held across an await point.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::{info, warn};

/// A sliding-window rate limiter for API calls.
pub struct RateLimiter {
    state: Mutex<LimiterState>,
    max_requests: u32,
    window: Duration,
    /// Minimum spacing between consecutive requests.
    min_delay: Duration,
}

/// Window and spacing bookkeeping, guarded by one lock so a check and the
/// request it admits are recorded together.
#[derive(Default)]
struct LimiterState {
    /// Timestamps of requests inside the current window.
    requests: VecDeque<Instant>,
    last_request: Option<Instant>,
}

impl RateLimiter {
    /// - `max_requests_per_window`: how many requests are allowed in the window
    /// - `window_seconds`: the sliding window duration in seconds
    /// - `min_delay_ms`: minimum milliseconds between consecutive requests
    pub fn new(max_requests_per_window: u32, window_seconds: u64, min_delay_ms: u64) -> Self {
        Self {
            state: Mutex::new(LimiterState::default()),
            max_requests: max_requests_per_window,
            window: Duration::from_secs(window_seconds),
            min_delay: Duration::from_millis(min_delay_ms),
        }
    }

    /// Limits for the public Bluesky AppView, with a small safety margin.
    pub fn bluesky_default() -> Self {
        Self::new(2500, 300, 20)
    }

    /// Wait until a request may be sent, then record it.
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let now = Instant::now();
                let mut state = lock(&self.state);

                while let Some(&oldest) = state.requests.front() {
                    if now.duration_since(oldest) > self.window {
                        state.requests.pop_front();
                    } else {
                        break;
                    }
                }

                let spacing_wait = state
                    .last_request
                    .and_then(|t| self.min_delay.checked_sub(now.duration_since(t)))
                    .filter(|w| !w.is_zero());
                let window_wait = if (state.requests.len() as u32) < self.max_requests {
                    None
                } else {
                    state
                        .requests
                        .front()
                        .map(|&oldest| (oldest + self.window).saturating_duration_since(now))
                };

                match (spacing_wait, window_wait) {
                    (None, None) => {
                        state.requests.push_back(now);
                        state.last_request = Some(now);
                        None
                    }
                    (a, b) => a.max(b),
                }
            };

            match wait {
                None => return,
                Some(wait) => {
                    if wait > self.min_delay {
                        info!(
                            delay_ms = wait.as_millis() as u64,
                            "Rate limit: waiting before next request"
                        );
                    }
                    tokio::time::sleep(wait).await;
                }
            }
        }
    }

    /// Number of requests currently inside the window.
    pub fn in_flight_window(&self) -> usize {
        lock(&self.state).requests.len()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Backoff settings for `with_retry_policy`.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            base_backoff: Duration::from_secs(2),
            max_backoff: Duration::from_secs(60),
        }
    }
}

/// Check whether an error is a rate-limit (HTTP 429) error.
pub fn is_rate_limit_error(err: &anyhow::Error) -> bool {
    let text = format!("{:?}", err).to_lowercase();
    text.contains("429") || text.contains("rate limit") || text.contains("ratelimit")
}

/// Retry an operation on rate-limit errors using the default policy.
pub async fn with_retry<F, Fut, T>(rate_limiter: &RateLimiter, operation: F) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    with_retry_policy(rate_limiter, RetryPolicy::default(), operation).await
}

/// Retry an operation with exponential backoff and jitter on 429 errors.
///
/// Other errors are returned immediately. The limiter is acquired before
/// every attempt.
pub async fn with_retry_policy<F, Fut, T>(
    rate_limiter: &RateLimiter,
    policy: RetryPolicy,
    operation: F,
) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let mut attempt = 0u32;

    loop {
        rate_limiter.acquire().await;

        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_rate_limit_error(&err) || attempt >= policy.max_retries {
                    return Err(err);
                }
                attempt += 1;

                let backoff = policy
                    .base_backoff
                    .saturating_mul(1u32 << attempt.min(16))
                    .min(policy.max_backoff);

                // +/- 25% jitter from the clock's nanoseconds
                let nanos = std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .unwrap_or_default()
                    .subsec_nanos();
                let jitter_factor = 0.75 + (nanos % 500) as f64 / 1000.0;
                let jittered = Duration::from_secs_f64(backoff.as_secs_f64() * jitter_factor);

                warn!(
                    attempt,
                    max_retries = policy.max_retries,
                    backoff_secs = jittered.as_secs_f64(),
                    "Rate limited (429), retrying"
                );

                tokio::time::sleep(jittered).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_retries: 3,
            base_backoff: Duration::from_millis(1),
            max_backoff: Duration::from_millis(4),
        }
    }

    #[tokio::test]
    async fn test_acquire_records_requests_under_limit() {
        let limiter = RateLimiter::new(10, 60, 0);
        for _ in 0..10 {
            limiter.acquire().await;
        }
        assert_eq!(limiter.in_flight_window(), 10);
    }

    #[tokio::test]
    async fn test_acquire_min_delay_enforced() {
        let limiter = RateLimiter::new(1000, 60, 30);
        let start = Instant::now();
        limiter.acquire().await;
        limiter.acquire().await;
        assert!(start.elapsed() >= Duration::from_millis(25));
    }

    #[tokio::test]
    async fn test_acquire_waits_for_window_to_free_up() {
        let limiter = RateLimiter::new(1, 1, 0);
        let start = Instant::now();
        limiter.acquire().await;
        limiter.acquire().await;
        assert!(start.elapsed() >= Duration::from_millis(900));
    }

    #[tokio::test]
    async fn test_concurrent_acquires_are_spaced() {
        let limiter = RateLimiter::new(1000, 60, 30);
        let start = Instant::now();
        tokio::join!(
            limiter.acquire(),
            limiter.acquire(),
            limiter.acquire(),
            limiter.acquire()
        );
        // Four requests need three gaps between them
        assert!(start.elapsed() >= Duration::from_millis(85));
        assert_eq!(limiter.in_flight_window(), 4);
    }

    #[test]
    fn test_is_rate_limit_error() {
        assert!(is_rate_limit_error(&anyhow::anyhow!("returned 429 Too Many Requests")));
        assert!(is_rate_limit_error(&anyhow::anyhow!("Rate Limit exceeded")));
        assert!(is_rate_limit_error(&anyhow::anyhow!("RateLimitExceeded")));
        assert!(!is_rate_limit_error(&anyhow::anyhow!("404 not found")));
    }

    #[tokio::test]
    async fn test_with_retry_retries_on_429_then_succeeds() {
        let limiter = RateLimiter::new(100, 60, 0);
        let calls = AtomicU32::new(0);

        let result = with_retry_policy(&limiter, fast_policy(), || async {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                anyhow::bail!("XRPC returned 429 Too Many Requests")
            }
            Ok(42)
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_with_retry_passes_through_other_errors() {
        let limiter = RateLimiter::new(100, 60, 0);
        let calls = AtomicU32::new(0);

        let result: Result<()> = with_retry_policy(&limiter, fast_policy(), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            anyhow::bail!("account does not exist")
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_with_retry_gives_up_after_max_retries() {
        let limiter = RateLimiter::new(100, 60, 0);
        let calls = AtomicU32::new(0);

        let result: Result<()> = with_retry_policy(&limiter, fast_policy(), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            anyhow::bail!("429")
        })
        .await;

        assert!(result.unwrap_err().to_string().contains("429"));
        // One initial attempt plus three retries
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }
}

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Why an admission check rejected a capture attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    TotalLimit,
    RateLimit,
}

impl LimitKind {
    /// Machine-readable code surfaced to callers alongside HTTP 429.
    pub fn code(&self) -> &'static str {
        match self {
            LimitKind::TotalLimit => "total_limit",
            LimitKind::RateLimit => "rate_limit",
        }
    }
}

/// Per-webhook sliding-window rate limiter.
///
/// State is in-process only and resets on restart. The timestamp lists are
/// mutated under a lock held only for the prune/check/append section, never
/// across an await.
pub struct RateLimiter {
    max_per_window: u32,
    window: Duration,
    hits: Mutex<HashMap<String, Vec<Instant>>>,
}

impl RateLimiter {
    pub fn new(max_per_window: u32, window: Duration) -> Self {
        Self {
            max_per_window,
            window,
            hits: Mutex::new(HashMap::new()),
        }
    }

    pub fn try_acquire(&self, webhook_id: &str) -> bool {
        self.try_acquire_at(webhook_id, Instant::now())
    }

    /// Prune entries older than the window, reject if the window is full,
    /// otherwise record this attempt and admit. A limit of zero disables the
    /// check entirely.
    pub fn try_acquire_at(&self, webhook_id: &str, now: Instant) -> bool {
        if self.max_per_window == 0 {
            return true;
        }

        let mut hits = self.hits.lock().unwrap_or_else(|e| e.into_inner());
        let attempts = hits.entry(webhook_id.to_string()).or_default();
        attempts.retain(|at| now.duration_since(*at) < self.window);

        if attempts.len() >= self.max_per_window as usize {
            return false;
        }

        attempts.push(now);
        true
    }
}

/// Combined admission policy: total stored capacity, then request rate.
pub struct AdmissionPolicy {
    max_requests: i64,
    limiter: RateLimiter,
}

impl AdmissionPolicy {
    pub fn new(max_requests: i64, rate_limit: u32, rate_window: Duration) -> Self {
        Self {
            max_requests,
            limiter: RateLimiter::new(rate_limit, rate_window),
        }
    }

    /// Evaluate both checks in order: capacity first, rate second.
    pub fn admit(&self, webhook_id: &str, stored_count: i64) -> Result<(), LimitKind> {
        self.admit_at(webhook_id, stored_count, Instant::now())
    }

    pub fn admit_at(
        &self,
        webhook_id: &str,
        stored_count: i64,
        now: Instant,
    ) -> Result<(), LimitKind> {
        if stored_count >= self.max_requests {
            return Err(LimitKind::TotalLimit);
        }
        if !self.limiter.try_acquire_at(webhook_id, now) {
            return Err(LimitKind::RateLimit);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_full_window_when_acquiring_should_reject_third_attempt() {
        let limiter = RateLimiter::new(2, Duration::from_millis(1000));
        let start = Instant::now();

        assert!(limiter.try_acquire_at("hook", start));
        assert!(limiter.try_acquire_at("hook", start + Duration::from_millis(10)));
        assert!(!limiter.try_acquire_at("hook", start + Duration::from_millis(20)));
    }

    #[test]
    fn given_elapsed_window_when_acquiring_should_admit_again() {
        let limiter = RateLimiter::new(2, Duration::from_millis(1000));
        let start = Instant::now();

        assert!(limiter.try_acquire_at("hook", start));
        assert!(limiter.try_acquire_at("hook", start + Duration::from_millis(10)));
        assert!(!limiter.try_acquire_at("hook", start + Duration::from_millis(20)));
        assert!(limiter.try_acquire_at("hook", start + Duration::from_millis(1050)));
    }

    #[test]
    fn given_distinct_webhooks_when_acquiring_should_track_windows_independently() {
        let limiter = RateLimiter::new(1, Duration::from_millis(1000));
        let start = Instant::now();

        assert!(limiter.try_acquire_at("first", start));
        assert!(limiter.try_acquire_at("second", start));
        assert!(!limiter.try_acquire_at("first", start + Duration::from_millis(10)));
    }

    #[test]
    fn given_zero_limit_when_acquiring_should_always_admit() {
        let limiter = RateLimiter::new(0, Duration::from_millis(1000));
        let start = Instant::now();

        for i in 0..10 {
            assert!(limiter.try_acquire_at("hook", start + Duration::from_millis(i)));
        }
    }

    #[test]
    fn given_stored_count_at_capacity_when_admitting_should_reject_with_total_limit() {
        let policy = AdmissionPolicy::new(100, 2, Duration::from_millis(1000));

        let result = policy.admit_at("hook", 100, Instant::now());

        assert_eq!(result, Err(LimitKind::TotalLimit));
    }

    #[test]
    fn given_capacity_rejection_when_admitting_should_not_consume_rate_budget() {
        let policy = AdmissionPolicy::new(1, 1, Duration::from_millis(1000));
        let start = Instant::now();

        assert_eq!(
            policy.admit_at("hook", 1, start),
            Err(LimitKind::TotalLimit)
        );
        assert_eq!(policy.admit_at("hook", 0, start), Ok(()));
    }

    #[test]
    fn given_rate_window_full_when_admitting_should_reject_with_rate_limit() {
        let policy = AdmissionPolicy::new(100, 2, Duration::from_millis(1000));
        let start = Instant::now();

        assert_eq!(policy.admit_at("hook", 0, start), Ok(()));
        assert_eq!(
            policy.admit_at("hook", 1, start + Duration::from_millis(5)),
            Ok(())
        );
        assert_eq!(
            policy.admit_at("hook", 2, start + Duration::from_millis(10)),
            Err(LimitKind::RateLimit)
        );
    }

    #[test]
    fn given_limit_kind_when_coded_should_expose_stable_strings() {
        assert_eq!(LimitKind::TotalLimit.code(), "total_limit");
        assert_eq!(LimitKind::RateLimit.code(), "rate_limit");
    }
}

//! Fixed-window rate limiter
//!
//! `allow` admits up to `max_requests` per client per window. A client may
//! burst up to twice the limit across a window boundary.

use super::store::{InMemoryRateLimitStore, RateBucket, RateLimitStore};
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use taskdeck_commons::Clock;
use taskdeck_configs::RateLimitSettings;

/// Outcome of a single admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitStatus {
    pub allowed: bool,
    /// Requests counted in the current window, including this one.
    pub count: u32,
    pub limit: u32,
    /// When the current window lapses.
    pub resets_at: DateTime<Utc>,
}

impl RateLimitStatus {
    pub fn remaining(&self) -> u32 {
        self.limit.saturating_sub(self.count)
    }

    /// Whole seconds until the window resets, at least 1.
    pub fn retry_after_seconds(&self, now: DateTime<Utc>) -> u64 {
        let millis = (self.resets_at - now).num_milliseconds().max(0) as u64;
        millis.div_ceil(1000).max(1)
    }
}

pub struct RateLimiter {
    store: Arc<dyn RateLimitStore>,
    clock: Arc<dyn Clock>,
    max_requests: u32,
    window: Duration,
    enabled: bool,
}

impl RateLimiter {
    pub fn new(
        store: Arc<dyn RateLimitStore>,
        clock: Arc<dyn Clock>,
        max_requests: u32,
        window: Duration,
    ) -> Self {
        Self {
            store,
            clock,
            max_requests,
            window,
            enabled: true,
        }
    }

    /// Create a limiter backed by an in-memory store.
    pub fn with_config(config: &RateLimitSettings, clock: Arc<dyn Clock>) -> Self {
        Self::from_settings(config, Arc::new(InMemoryRateLimitStore::new()), clock)
    }

    pub fn from_settings(
        config: &RateLimitSettings,
        store: Arc<dyn RateLimitStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let secs = i64::try_from(config.window_seconds).unwrap_or(i64::MAX).min(i64::MAX / 1000);
        let window = Duration::seconds(secs);
        Self {
            enabled: config.enabled,
            ..Self::new(store, clock, config.max_requests, window)
        }
    }

    pub fn limit(&self) -> u32 {
        self.max_requests
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Count this request against `client_id` and decide admission.
    pub fn check(&self, client_id: &str) -> RateLimitStatus {
        let now = self.clock.now();
        if !self.enabled {
            return RateLimitStatus {
                allowed: true,
                count: 0,
                limit: self.max_requests,
                resets_at: now + self.window,
            };
        }

        let window = self.window;
        let bucket = self.store.update(client_id, &mut |current| match current {
            Some(bucket) if now - bucket.window_start < window => RateBucket {
                count: bucket.count.saturating_add(1),
                window_start: bucket.window_start,
            },
            _ => RateBucket {
                count: 1,
                window_start: now,
            },
        });

        RateLimitStatus {
            allowed: bucket.count <= self.max_requests,
            count: bucket.count,
            limit: self.max_requests,
            resets_at: bucket.window_start + window,
        }
    }

    /// `true` if the request is admitted.
    #[inline]
    pub fn allow(&self, client_id: &str) -> bool {
        self.check(client_id).allowed
    }

    /// Number of distinct clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.store.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::thread;
    use taskdeck_commons::ManualClock;

    fn limiter(max: u32) -> (Arc<ManualClock>, RateLimiter) {
        let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()));
        let limiter = RateLimiter::new(
            Arc::new(InMemoryRateLimitStore::new()),
            clock.clone(),
            max,
            Duration::seconds(60),
        );
        (clock, limiter)
    }

    #[test]
    fn test_admits_up_to_limit_then_rejects() {
        let (_clock, limiter) = limiter(100);
        for i in 1..=100 {
            assert!(limiter.allow("1.2.3.4"), "request {} should pass", i);
        }
        let status = limiter.check("1.2.3.4");
        assert!(!status.allowed);
        assert_eq!(status.count, 101);
        assert_eq!(status.remaining(), 0);
        assert!(!limiter.allow("1.2.3.4"));
    }

    #[test]
    fn test_window_resets_lazily() {
        let (clock, limiter) = limiter(2);
        assert!(limiter.allow("c"));
        assert!(limiter.allow("c"));
        assert!(!limiter.allow("c"));

        clock.advance(Duration::seconds(59));
        assert!(!limiter.allow("c"));

        clock.advance(Duration::seconds(1));
        let status = limiter.check("c");
        assert!(status.allowed);
        assert_eq!(status.count, 1);
    }

    #[test]
    fn test_clients_are_independent() {
        let (_clock, limiter) = limiter(1);
        assert!(limiter.allow("a"));
        assert!(!limiter.allow("a"));
        assert!(limiter.allow("b"));
        assert_eq!(limiter.tracked_clients(), 2);
    }

    #[test]
    fn test_retry_after() {
        let (clock, limiter) = limiter(1);
        limiter.check("a");
        clock.advance(Duration::milliseconds(20_500));
        let status = limiter.check("a");
        assert!(!status.allowed);
        assert_eq!(status.retry_after_seconds(clock.now()), 40);
    }

    #[test]
    fn test_disabled_admits_everything_without_tracking() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let settings = RateLimitSettings {
            max_requests: 1,
            window_seconds: 60,
            enabled: false,
        };
        let limiter = RateLimiter::with_config(&settings, clock);
        for _ in 0..10 {
            assert!(limiter.allow("a"));
        }
        assert_eq!(limiter.tracked_clients(), 0);
    }

    #[test]
    fn test_concurrent_checks_count_exactly() {
        let (_clock, limiter) = limiter(1000);
        let limiter = Arc::new(limiter);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                thread::spawn(move || (0..200).filter(|_| limiter.allow("shared")).count())
            })
            .collect();

        let admitted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(admitted, 1000);
    }
}

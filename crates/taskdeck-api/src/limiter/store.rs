//! Bucket storage for the rate limiter

use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// Request count for one client within its current window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateBucket {
    pub count: u32,
    pub window_start: DateTime<Utc>,
}

/// Keyed bucket storage.
///
/// `update` must run `apply` and store its result atomically with respect to
/// other calls for the same key, otherwise concurrent requests could both
/// read the same count.
pub trait RateLimitStore: Send + Sync {
    /// Replace the bucket for `client_id` with `apply(current)` and return
    /// the stored value.
    fn update(
        &self,
        client_id: &str,
        apply: &mut dyn FnMut(Option<&RateBucket>) -> RateBucket,
    ) -> RateBucket;

    fn get(&self, client_id: &str) -> Option<RateBucket>;

    /// Number of clients with a bucket.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-local store on a sharded concurrent map.
///
/// The entry guard holds the shard lock for the duration of `apply`.
#[derive(Debug, Default)]
pub struct InMemoryRateLimitStore {
    buckets: DashMap<String, RateBucket>,
}

impl InMemoryRateLimitStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RateLimitStore for InMemoryRateLimitStore {
    fn update(
        &self,
        client_id: &str,
        apply: &mut dyn FnMut(Option<&RateBucket>) -> RateBucket,
    ) -> RateBucket {
        match self.buckets.entry(client_id.to_string()) {
            Entry::Occupied(mut entry) => {
                let next = apply(Some(entry.get()));
                *entry.get_mut() = next;
                next
            }
            Entry::Vacant(entry) => {
                let next = apply(None);
                entry.insert(next);
                next
            }
        }
    }

    fn get(&self, client_id: &str) -> Option<RateBucket> {
        self.buckets.get(client_id).map(|b| *b)
    }

    fn len(&self) -> usize {
        self.buckets.len()
    }
}

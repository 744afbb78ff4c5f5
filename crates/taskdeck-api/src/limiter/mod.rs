//! Per-client request limiting
//!
//! A fixed-window counter per client identifier. Windows reset lazily on the
//! first request after they lapse; nothing sweeps idle entries.
//!
//! ## Components
//!
//! - [`RateLimitStore`]: where buckets live; the only shared mutable state
//! - [`RateLimiter`]: the admission policy over a store and a clock

mod rate_limiter;
mod store;

pub use rate_limiter::{RateLimitStatus, RateLimiter};
pub use store::{InMemoryRateLimitStore, RateBucket, RateLimitStore};

// Re-export config from taskdeck-configs for convenience
pub use taskdeck_configs::RateLimitSettings;

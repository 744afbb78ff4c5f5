// Taskdeck API Library
//
// This crate provides the HTTP layer for Taskdeck: the edge gate that
// rate-limits and guards every request, the JSON handlers, and the route
// table.

pub mod app_context;
pub mod error;
pub mod handlers;
pub mod limiter;
pub mod middleware;
pub mod models;
pub mod routes;

pub use app_context::AppContext;
pub use error::ApiError;
pub use limiter::{InMemoryRateLimitStore, RateBucket, RateLimitStatus, RateLimitStore, RateLimiter};
pub use middleware::{EdgeGate, EdgeGateMiddleware, GateDecision};
pub use routes::configure_routes;

//! HTTP request handlers
//!
//! Handlers take the shared [`crate::AppContext`] and, where a user is
//! required, the `AuthenticatedUser` extractor from `taskdeck-auth`.

pub mod analytics;
pub mod auth;
pub mod dashboard;
pub mod health;
pub mod tasks;

//! taskdeck-configs
//!
//! Server configuration types and loader for Taskdeck.

pub mod config;
pub mod file_helpers;

pub use config::defaults;
pub use config::*;

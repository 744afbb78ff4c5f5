//! Request and response bodies shared by the handlers

mod analytics;
mod board;
mod task_envelope;
mod user_info;

pub use analytics::{AnalyticsQuery, AnalyticsResponse};
pub use board::{Board, BoardColumn};
pub use task_envelope::{TaskEnvelope, TaskListResponse};
pub use user_info::UserInfo;

//! Domain models

pub mod due_date;
mod task;
mod task_id;
mod task_status;
mod user;
mod user_id;

pub use task::Task;
pub use task_id::TaskId;
pub use task_status::{ParseStatusError, TaskStatus};
pub use user::User;
pub use user_id::UserId;

// Taskdeck core: task state transitions, the daily activity aggregator and
// the owner-scoped task store.

pub mod analytics;
pub mod error;
pub mod lifecycle;
pub mod repository;

pub use analytics::{build_series, window_start, DailyActivity};
pub use error::{CoreError, CoreResult, FieldError};
pub use lifecycle::{apply_update, create_task, TaskDraft, TaskPatch, MAX_TITLE_LENGTH};
pub use repository::{InMemoryTaskRepository, TaskRepository};

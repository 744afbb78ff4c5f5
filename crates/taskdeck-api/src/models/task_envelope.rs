use serde::Serialize;
use taskdeck_commons::Task;

/// `{"message": "...", "task": {...}}`
#[derive(Debug, Serialize)]
pub struct TaskEnvelope {
    pub message: &'static str,
    pub task: Task,
}

#[derive(Debug, Serialize)]
pub struct TaskListResponse {
    pub tasks: Vec<Task>,
}

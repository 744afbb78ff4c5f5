//! Task record

use super::{TaskId, TaskStatus, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A task owned by exactly one user.
///
/// `completed_at` is `Some` if and only if `status` is
/// [`TaskStatus::Completed`]. Only the lifecycle functions in
/// `taskdeck-core` construct or mutate tasks so the pairing stays intact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub owner_id: UserId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TaskStatus,
    #[serde(
        default,
        rename = "dueDate",
        deserialize_with = "super::due_date::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub due_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Whether the completion invariant holds for this record.
    pub fn completion_consistent(&self) -> bool {
        self.status.is_completed() == self.completed_at.is_some()
    }
}

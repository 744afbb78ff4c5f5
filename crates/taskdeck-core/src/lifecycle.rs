//! Task status transitions.
//!
//! `completed_at` is derived, never supplied by callers: it is stamped when a
//! task enters COMPLETED, cleared when it leaves, and left alone otherwise.
//! Everything here is pure; ownership checks belong to the repository.

use crate::error::{CoreError, CoreResult, FieldError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use taskdeck_commons::models::due_date;
use taskdeck_commons::{Task, TaskId, TaskStatus, UserId};

pub const MAX_TITLE_LENGTH: usize = 100;

/// Input for a new task.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default, rename = "dueDate", deserialize_with = "due_date::deserialize")]
    pub due_at: Option<DateTime<Utc>>,
}

/// Partial update. Absent fields keep their current value.
///
/// `description` distinguishes "absent" (`None`) from "cleared"
/// (`Some(None)`, sent as `null` or `""`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "clearable_text")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default, rename = "dueDate", deserialize_with = "due_date::deserialize")]
    pub due_at: Option<DateTime<Utc>>,
}

// Only called when the key is present; `default` covers the absent case.
fn clearable_text<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(Some(value.filter(|text| !text.trim().is_empty())))
}

fn check_title(title: &str, errors: &mut Vec<FieldError>) {
    let len = title.trim().chars().count();
    if len == 0 {
        errors.push(FieldError::new("title", "Title is required"));
    } else if len > MAX_TITLE_LENGTH {
        errors.push(FieldError::new(
            "title",
            format!("Title cannot be more than {} characters", MAX_TITLE_LENGTH),
        ));
    }
}

fn into_result(errors: Vec<FieldError>) -> CoreResult<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(CoreError::Validation(errors))
    }
}

impl TaskDraft {
    pub fn validate(&self) -> CoreResult<()> {
        let mut errors = Vec::new();
        check_title(&self.title, &mut errors);
        into_result(errors)
    }
}

impl TaskPatch {
    pub fn validate(&self) -> CoreResult<()> {
        let mut errors = Vec::new();
        if let Some(title) = &self.title {
            check_title(title, &mut errors);
        }
        into_result(errors)
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.due_at.is_none()
    }
}

/// Build a new task from a validated draft.
///
/// A draft that arrives already COMPLETED is stamped with `completed_at =
/// now` so the completion pairing holds from creation.
pub fn create_task(owner_id: &UserId, draft: TaskDraft, id: TaskId, now: DateTime<Utc>) -> Task {
    let status = draft.status.unwrap_or_default();
    Task {
        id,
        owner_id: owner_id.clone(),
        title: draft.title.trim().to_string(),
        description: draft.description,
        status,
        due_at: draft.due_at,
        created_at: now,
        updated_at: now,
        completed_at: status.is_completed().then_some(now),
    }
}

/// Apply `patch` to `current`, returning the updated task.
pub fn apply_update(current: &Task, patch: &TaskPatch, now: DateTime<Utc>) -> Task {
    let mut next = current.clone();

    if let Some(title) = &patch.title {
        next.title = title.trim().to_string();
    }
    if let Some(description) = &patch.description {
        next.description = description.clone();
    }
    if let Some(due_at) = patch.due_at {
        next.due_at = Some(due_at);
    }

    if let Some(status) = patch.status {
        match (current.status.is_completed(), status.is_completed()) {
            // Re-sending COMPLETED keeps the original completion instant.
            (true, true) => {}
            (false, true) => next.completed_at = Some(now),
            (_, false) => next.completed_at = None,
        }
        next.status = status;
    }

    next.updated_at = now;
    next
}

use crate::error::{CoreError, CoreResult};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use taskdeck_commons::{Task, TaskId, UserId};

/// Owner-scoped task persistence.
///
/// Every lookup takes the caller's id. A task that does not exist and a task
/// owned by someone else are indistinguishable to the caller.
#[async_trait::async_trait]
pub trait TaskRepository: Send + Sync {
    async fn insert(&self, task: Task) -> CoreResult<Task>;

    async fn find_owned(&self, owner_id: &UserId, id: &TaskId) -> CoreResult<Option<Task>>;

    /// All of the owner's tasks, newest first.
    async fn list_by_owner(&self, owner_id: &UserId) -> CoreResult<Vec<Task>>;

    /// Replace a stored task. Returns `None` when the id is unknown or not
    /// owned by `owner_id`.
    async fn update_owned(&self, owner_id: &UserId, task: Task) -> CoreResult<Option<Task>>;

    async fn delete_owned(&self, owner_id: &UserId, id: &TaskId) -> CoreResult<bool>;

    /// Tasks created at or after `since`, or completed at or after `since`.
    async fn find_active_since(&self, owner_id: &UserId, since: DateTime<Utc>) -> CoreResult<Vec<Task>>;
}

struct StoredTask {
    seq: u64,
    task: Task,
}

#[derive(Default)]
struct TaskTable {
    next_seq: u64,
    rows: HashMap<TaskId, StoredTask>,
}

impl TaskTable {
    fn owned(&self, owner_id: &UserId) -> impl Iterator<Item = &StoredTask> + '_ {
        let owner_id = owner_id.clone();
        self.rows.values().filter(move |row| row.task.owner_id == owner_id)
    }
}

/// Process-local task store.
#[derive(Default)]
pub struct InMemoryTaskRepository {
    table: RwLock<TaskTable>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first(mut rows: Vec<&StoredTask>) -> Vec<Task> {
    rows.sort_by(|a, b| {
        b.task
            .created_at
            .cmp(&a.task.created_at)
            .then_with(|| b.seq.cmp(&a.seq))
    });
    rows.into_iter().map(|row| row.task.clone()).collect()
}

#[async_trait::async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn insert(&self, task: Task) -> CoreResult<Task> {
        let mut table = self.table.write();
        if table.rows.contains_key(&task.id) {
            return Err(CoreError::Storage(format!("Duplicate task id '{}'", task.id)));
        }

        let seq = table.next_seq;
        table.next_seq += 1;
        table.rows.insert(task.id.clone(), StoredTask { seq, task: task.clone() });
        Ok(task)
    }

    async fn find_owned(&self, owner_id: &UserId, id: &TaskId) -> CoreResult<Option<Task>> {
        Ok(self
            .table
            .read()
            .rows
            .get(id)
            .filter(|row| &row.task.owner_id == owner_id)
            .map(|row| row.task.clone()))
    }

    async fn list_by_owner(&self, owner_id: &UserId) -> CoreResult<Vec<Task>> {
        let table = self.table.read();
        Ok(newest_first(table.owned(owner_id).collect()))
    }

    async fn update_owned(&self, owner_id: &UserId, task: Task) -> CoreResult<Option<Task>> {
        let mut table = self.table.write();
        match table.rows.get_mut(&task.id) {
            Some(row) if &row.task.owner_id == owner_id => {
                // The owner is fixed at creation.
                let task = Task {
                    owner_id: owner_id.clone(),
                    ..task
                };
                row.task = task.clone();
                Ok(Some(task))
            }
            Some(_) => {
                log::debug!("Update of task {} refused: not owned by {}", task.id, owner_id);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn delete_owned(&self, owner_id: &UserId, id: &TaskId) -> CoreResult<bool> {
        let mut table = self.table.write();
        let owned = table
            .rows
            .get(id)
            .map(|row| &row.task.owner_id == owner_id)
            .unwrap_or(false);
        if owned {
            table.rows.remove(id);
        } else if table.rows.contains_key(id) {
            log::debug!("Delete of task {} refused: not owned by {}", id, owner_id);
        }
        Ok(owned)
    }

    async fn find_active_since(&self, owner_id: &UserId, since: DateTime<Utc>) -> CoreResult<Vec<Task>> {
        let table = self.table.read();
        let rows = table
            .owned(owner_id)
            .filter(|row| {
                row.task.created_at >= since || row.task.completed_at.is_some_and(|at| at >= since)
            })
            .collect();
        Ok(newest_first(rows))
    }
}

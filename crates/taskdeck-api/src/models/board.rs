//! Kanban board view

use serde::Serialize;
use taskdeck_commons::{Task, TaskStatus};

#[derive(Debug, Serialize)]
pub struct BoardColumn {
    pub status: TaskStatus,
    pub title: &'static str,
    pub tasks: Vec<Task>,
}

/// The caller's tasks split into one column per status, in board order.
#[derive(Debug, Serialize)]
pub struct Board {
    pub columns: Vec<BoardColumn>,
}

fn column_title(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Assigned => "To Do",
        TaskStatus::InProgress => "In Progress",
        TaskStatus::Completed => "Done",
    }
}

impl Board {
    /// Tasks keep their incoming order within each column.
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        let mut columns: Vec<BoardColumn> = TaskStatus::ALL
            .iter()
            .map(|&status| BoardColumn {
                status,
                title: column_title(status),
                tasks: Vec::new(),
            })
            .collect();

        for task in tasks {
            if let Some(column) = columns.iter_mut().find(|c| c.status == task.status) {
                column.tasks.push(task);
            }
        }

        Self { columns }
    }

    pub fn total(&self) -> usize {
        self.columns.iter().map(|c| c.tasks.len()).sum()
    }
}

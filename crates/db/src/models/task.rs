//! Task entity model, DTOs, and the `TaskView` read model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use taskmaster_core::types::{Date, DbId, Timestamp};
use taskmaster_core::validation::validate_task_fields;
use validator::{Validate, ValidationError};

use crate::models::core_rule;
use crate::models::status::{Filter, TaskPriority, TaskStatus};

/// A task row from the `tasks` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Task {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub project_id: DbId,
    /// `None` when unassigned, including after the assignee was deleted.
    pub assigned_to: Option<DbId>,
    #[sqlx(rename = "priority_id")]
    pub priority: TaskPriority,
    #[sqlx(rename = "status_id")]
    pub status: TaskStatus,
    pub due_date: Option<Date>,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Task {
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    pub fn is_in_progress(&self) -> bool {
        self.status == TaskStatus::InProgress
    }

    pub fn is_urgent(&self) -> bool {
        self.priority == TaskPriority::Urgent
    }

    /// Past its due date and not completed. Tasks without a due date are
    /// never overdue.
    pub fn is_overdue(&self, today: Date) -> bool {
        match self.due_date {
            Some(due) => !self.is_completed() && due < today,
            None => false,
        }
    }

    /// Days until the due date; negative once late.
    pub fn days_remaining(&self, today: Date) -> Option<i64> {
        self.due_date.map(|due| (due - today).num_days())
    }

    /// HIGH or URGENT and not yet completed.
    pub fn is_attention_required(&self) -> bool {
        self.priority.needs_attention() && !self.is_completed()
    }
}

/// A task joined with its project name and assignee's display name.
///
/// Recomputed on every read; never written back.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct TaskView {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub task: Task,
    pub project_name: String,
    /// "First Last" of the assignee, `None` when unassigned.
    pub assigned_to_name: Option<String>,
}

/// DTO for creating a new task.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTask {
    #[validate(custom(function = "check_title"))]
    pub title: String,
    pub description: Option<String>,
    pub project_id: DbId,
    pub assigned_to: Option<DbId>,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub due_date: Option<Date>,
    pub created_by: DbId,
}

impl CreateTask {
    /// A new TODO task at MEDIUM priority, unassigned and without a due date.
    pub fn new(title: impl Into<String>, project_id: DbId, created_by: DbId) -> Self {
        Self {
            title: title.into(),
            description: None,
            project_id,
            assigned_to: None,
            priority: TaskPriority::Medium,
            status: TaskStatus::Todo,
            due_date: None,
            created_by,
        }
    }
}

/// DTO for editing a task. Replaces every editable column.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateTask {
    #[validate(custom(function = "check_title"))]
    pub title: String,
    pub description: Option<String>,
    pub project_id: DbId,
    pub assigned_to: Option<DbId>,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub due_date: Option<Date>,
}

impl From<&Task> for UpdateTask {
    fn from(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            project_id: task.project_id,
            assigned_to: task.assigned_to,
            priority: task.priority,
            status: task.status,
            due_date: task.due_date,
        }
    }
}

/// Criteria for [`TaskRepo::search`](crate::repositories::TaskRepo::search).
///
/// An empty `term` and all filters at their defaults matches every task.
#[derive(Debug, Clone, Default)]
pub struct TaskSearch {
    /// Case-insensitive substring of the title.
    pub term: String,
    pub status: Filter<TaskStatus>,
    pub priority: Filter<TaskPriority>,
    pub project_id: Option<DbId>,
}

fn check_title(title: &str) -> Result<(), ValidationError> {
    core_rule("title", validate_task_fields(title))
}

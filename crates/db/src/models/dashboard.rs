//! Dashboard statistics read models.

use serde::Serialize;
use sqlx::FromRow;

/// Headline counts for the administrator dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, FromRow, Serialize)]
pub struct AdminSummary {
    pub user_count: i64,
    pub projects_in_progress: i64,
    pub tasks_in_progress: i64,
    /// HIGH or URGENT tasks that are not completed.
    pub attention_required: i64,
}

/// Counts over the tasks assigned to one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, FromRow, Serialize)]
pub struct UserSummary {
    pub assigned: i64,
    pub todo: i64,
    pub in_progress: i64,
    pub completed: i64,
    pub overdue: i64,
}

impl UserSummary {
    /// Share of assigned tasks that are completed, as a whole percentage.
    pub fn completion_percent(&self) -> i64 {
        if self.assigned == 0 {
            0
        } else {
            self.completed * 100 / self.assigned
        }
    }
}

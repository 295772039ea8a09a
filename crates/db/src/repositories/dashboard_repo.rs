//! Aggregate counts for the admin and user dashboards.

use sqlx::PgPool;
use taskmaster_core::types::{Date, DbId};

use crate::error::{RepoError, RepoResult};
use crate::models::dashboard::{AdminSummary, UserSummary};
use crate::models::status::{ProjectStatus, TaskStatus};
use crate::repositories::task_repo::attention_priority_ids;

/// Read-only statistics. Each summary is computed in a single statement.
pub struct DashboardRepo;

impl DashboardRepo {
    pub async fn admin_summary(pool: &PgPool) -> RepoResult<AdminSummary> {
        sqlx::query_as::<_, AdminSummary>(
            "SELECT
                (SELECT COUNT(*) FROM users) AS user_count,
                (SELECT COUNT(*) FROM projects WHERE status_id = $1) AS projects_in_progress,
                (SELECT COUNT(*) FROM tasks WHERE status_id = $2) AS tasks_in_progress,
                (SELECT COUNT(*) FROM tasks
                  WHERE priority_id = ANY($3) AND status_id <> $4) AS attention_required",
        )
        .bind(ProjectStatus::InProgress)
        .bind(TaskStatus::InProgress)
        .bind(attention_priority_ids())
        .bind(TaskStatus::Completed)
        .fetch_one(pool)
        .await
        .map_err(RepoError::at("dashboard.admin_summary"))
    }

    /// Counts over the tasks assigned to `user_id`. `today` decides which
    /// open tasks are overdue.
    pub async fn user_summary(
        pool: &PgPool,
        user_id: DbId,
        today: Date,
    ) -> RepoResult<UserSummary> {
        sqlx::query_as::<_, UserSummary>(
            "SELECT
                COUNT(*) AS assigned,
                COUNT(*) FILTER (WHERE status_id = $2) AS todo,
                COUNT(*) FILTER (WHERE status_id = $3) AS in_progress,
                COUNT(*) FILTER (WHERE status_id = $4) AS completed,
                COUNT(*) FILTER (WHERE due_date < $5 AND status_id <> $4) AS overdue
             FROM tasks
             WHERE assigned_to = $1",
        )
        .bind(user_id)
        .bind(TaskStatus::Todo)
        .bind(TaskStatus::InProgress)
        .bind(TaskStatus::Completed)
        .bind(today)
        .fetch_one(pool)
        .await
        .map_err(RepoError::at("dashboard.user_summary"))
    }
}

//! Repository for the `tasks` table.
//!
//! Reads return [`TaskView`]s hydrated by joining `projects` (always present)
//! and `users` (absent for unassigned tasks).

use sqlx::PgPool;
use taskmaster_core::types::{Date, DbId};
use validator::Validate;

use crate::error::{RepoError, RepoResult};
use crate::models::status::{TaskPriority, TaskStatus};
use crate::models::task::{CreateTask, Task, TaskSearch, TaskView, UpdateTask};
use crate::repositories::like_pattern;

/// Column list for plain `tasks` rows.
const COLUMNS: &str = "id, title, description, project_id, assigned_to, priority_id, status_id, \
                       due_date, created_by, created_at, updated_at";

/// Column list for [`TaskView`] queries over [`VIEW_FROM`].
const VIEW_COLUMNS: &str = "t.id, t.title, t.description, t.project_id, t.assigned_to, \
                            t.priority_id, t.status_id, t.due_date, t.created_by, \
                            t.created_at, t.updated_at, \
                            p.name AS project_name, \
                            u.first_name || ' ' || u.last_name AS assigned_to_name";

const VIEW_FROM: &str = "FROM tasks t \
                         JOIN projects p ON p.id = t.project_id \
                         LEFT JOIN users u ON u.id = t.assigned_to";

/// Soonest due first, undated last, ties broken by id.
const DUE_ORDER: &str = "ORDER BY t.due_date ASC NULLS LAST, t.id ASC";

const NEWEST_ORDER: &str = "ORDER BY t.created_at DESC, t.id DESC";

/// Provides CRUD, search, and statistics operations for tasks.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a new task, returning the created row.
    ///
    /// The status comes from the DTO; use [`CreateTask::new`] for a TODO
    /// task. An unknown project, assignee, or creator yields
    /// [`RepoError::MissingReference`].
    pub async fn create(pool: &PgPool, input: &CreateTask) -> RepoResult<Task> {
        input.validate()?;
        let query = format!(
            "INSERT INTO tasks (title, description, project_id, assigned_to, priority_id, status_id, due_date, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        let task = sqlx::query_as::<_, Task>(&query)
            .bind(input.title.trim())
            .bind(&input.description)
            .bind(input.project_id)
            .bind(input.assigned_to)
            .bind(input.priority)
            .bind(input.status)
            .bind(input.due_date)
            .bind(input.created_by)
            .fetch_one(pool)
            .await
            .map_err(RepoError::at("tasks.create"))?;
        tracing::info!(
            task_id = task.id,
            project_id = task.project_id,
            assigned_to = ?task.assigned_to,
            "Task created"
        );
        Ok(task)
    }

    /// All tasks, newest first.
    pub async fn find_all(pool: &PgPool) -> RepoResult<Vec<TaskView>> {
        let query = format!("SELECT {VIEW_COLUMNS} {VIEW_FROM} {NEWEST_ORDER}");
        sqlx::query_as::<_, TaskView>(&query)
            .fetch_all(pool)
            .await
            .map_err(RepoError::at("tasks.find_all"))
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> RepoResult<Option<TaskView>> {
        let query = format!("SELECT {VIEW_COLUMNS} {VIEW_FROM} WHERE t.id = $1");
        sqlx::query_as::<_, TaskView>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(RepoError::at("tasks.find_by_id"))
    }

    /// Tasks assigned to `user_id`, soonest due first.
    pub async fn find_by_user_id(pool: &PgPool, user_id: DbId) -> RepoResult<Vec<TaskView>> {
        let query =
            format!("SELECT {VIEW_COLUMNS} {VIEW_FROM} WHERE t.assigned_to = $1 {DUE_ORDER}");
        sqlx::query_as::<_, TaskView>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
            .map_err(RepoError::at("tasks.find_by_user_id"))
    }

    /// Tasks in `project_id`, soonest due first.
    pub async fn find_by_project_id(
        pool: &PgPool,
        project_id: DbId,
    ) -> RepoResult<Vec<TaskView>> {
        let query =
            format!("SELECT {VIEW_COLUMNS} {VIEW_FROM} WHERE t.project_id = $1 {DUE_ORDER}");
        sqlx::query_as::<_, TaskView>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
            .map_err(RepoError::at("tasks.find_by_project_id"))
    }

    /// HIGH and URGENT tasks not yet completed, soonest due first.
    pub async fn find_attention_required(pool: &PgPool) -> RepoResult<Vec<TaskView>> {
        let query = format!(
            "SELECT {VIEW_COLUMNS} {VIEW_FROM}
             WHERE t.priority_id = ANY($1) AND t.status_id <> $2
             {DUE_ORDER}"
        );
        sqlx::query_as::<_, TaskView>(&query)
            .bind(attention_priority_ids())
            .bind(TaskStatus::Completed)
            .fetch_all(pool)
            .await
            .map_err(RepoError::at("tasks.find_attention_required"))
    }

    /// Title substring AND each filter that is set, newest first.
    ///
    /// The default [`TaskSearch`] returns the same rows as [`Self::find_all`].
    pub async fn search(pool: &PgPool, criteria: &TaskSearch) -> RepoResult<Vec<TaskView>> {
        let mut conditions = vec!["t.title ILIKE $1".to_string()];
        let mut bind_idx = 2u32;

        let status = criteria.status.value();
        let priority = criteria.priority.value();

        if status.is_some() {
            conditions.push(format!("t.status_id = ${bind_idx}"));
            bind_idx += 1;
        }
        if priority.is_some() {
            conditions.push(format!("t.priority_id = ${bind_idx}"));
            bind_idx += 1;
        }
        if criteria.project_id.is_some() {
            conditions.push(format!("t.project_id = ${bind_idx}"));
        }

        let query = format!(
            "SELECT {VIEW_COLUMNS} {VIEW_FROM} WHERE {} {NEWEST_ORDER}",
            conditions.join(" AND ")
        );

        let mut q = sqlx::query_as::<_, TaskView>(&query).bind(like_pattern(&criteria.term));
        if let Some(status) = status {
            q = q.bind(status);
        }
        if let Some(priority) = priority {
            q = q.bind(priority);
        }
        if let Some(project_id) = criteria.project_id {
            q = q.bind(project_id);
        }
        q.fetch_all(pool)
            .await
            .map_err(RepoError::at("tasks.search"))
    }

    /// Replace every editable column.
    pub async fn update(pool: &PgPool, id: DbId, input: &UpdateTask) -> RepoResult<Task> {
        input.validate()?;
        let query = format!(
            "UPDATE tasks SET
                title = $2,
                description = $3,
                project_id = $4,
                assigned_to = $5,
                priority_id = $6,
                status_id = $7,
                due_date = $8
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(input.title.trim())
            .bind(&input.description)
            .bind(input.project_id)
            .bind(input.assigned_to)
            .bind(input.priority)
            .bind(input.status)
            .bind(input.due_date)
            .fetch_optional(pool)
            .await
            .map_err(RepoError::at("tasks.update"))?
            .ok_or(RepoError::NotFound { entity: "Task", id })
    }

    /// Change only the status. This is the one edit an assignee may make.
    pub async fn update_status(pool: &PgPool, id: DbId, status: TaskStatus) -> RepoResult<()> {
        let result = sqlx::query("UPDATE tasks SET status_id = $2 WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(pool)
            .await
            .map_err(RepoError::at("tasks.update_status"))?;
        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound { entity: "Task", id });
        }
        tracing::debug!(task_id = id, %status, "Task status updated");
        Ok(())
    }

    /// Delete a task and its comments. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .map_err(RepoError::at("tasks.delete"))?;
        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::info!(task_id = id, "Task deleted");
        }
        Ok(deleted)
    }

    pub async fn count(pool: &PgPool) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tasks")
            .fetch_one(pool)
            .await
            .map_err(RepoError::at("tasks.count"))
    }

    pub async fn count_by_status(pool: &PgPool, status: TaskStatus) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tasks WHERE status_id = $1")
            .bind(status)
            .fetch_one(pool)
            .await
            .map_err(RepoError::at("tasks.count_by_status"))
    }

    /// Tasks due before `today` that are not completed.
    pub async fn count_overdue(pool: &PgPool, today: Date) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM tasks WHERE due_date < $1 AND status_id <> $2",
        )
        .bind(today)
        .bind(TaskStatus::Completed)
        .fetch_one(pool)
        .await
        .map_err(RepoError::at("tasks.count_overdue"))
    }
}

/// Priority ids that put an open task on the attention list.
pub(crate) fn attention_priority_ids() -> Vec<i16> {
    TaskPriority::ALL
        .iter()
        .filter(|p| p.needs_attention())
        .map(|p| p.id())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attention_priorities_are_high_and_urgent() {
        assert_eq!(
            attention_priority_ids(),
            vec![TaskPriority::High.id(), TaskPriority::Urgent.id()]
        );
    }
}

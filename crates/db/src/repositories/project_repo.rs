//! Repository for the `projects` table.

use sqlx::PgPool;
use taskmaster_core::types::DbId;
use validator::Validate;

use crate::error::{RepoError, RepoResult};
use crate::models::project::{CreateProject, Project, UpdateProject};
use crate::models::status::{Filter, ProjectStatus};
use crate::repositories::like_pattern;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, start_date, end_date, status_id, manager_id, \
                       created_by, created_at, updated_at";

/// Provides CRUD and search operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project, returning the created row.
    ///
    /// An unknown `manager_id` or `created_by` yields
    /// [`RepoError::MissingReference`].
    pub async fn create(pool: &PgPool, input: &CreateProject) -> RepoResult<Project> {
        input.validate()?;
        let query = format!(
            "INSERT INTO projects (name, description, start_date, end_date, status_id, manager_id, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(input.name.trim())
            .bind(input.description.trim())
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.status)
            .bind(input.manager_id)
            .bind(input.created_by)
            .fetch_one(pool)
            .await
            .map_err(RepoError::at("projects.create"))?;
        tracing::info!(
            project_id = project.id,
            created_by = project.created_by,
            "Project created"
        );
        Ok(project)
    }

    /// List all projects ordered by most recently created first.
    pub async fn find_all(pool: &PgPool) -> RepoResult<Vec<Project>> {
        let query = format!("SELECT {COLUMNS} FROM projects ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Project>(&query)
            .fetch_all(pool)
            .await
            .map_err(RepoError::at("projects.find_all"))
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> RepoResult<Option<Project>> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(RepoError::at("projects.find_by_id"))
    }

    pub async fn find_by_status(pool: &PgPool, status: ProjectStatus) -> RepoResult<Vec<Project>> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects WHERE status_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(status)
            .fetch_all(pool)
            .await
            .map_err(RepoError::at("projects.find_by_status"))
    }

    /// Projects managed by `user_id`.
    pub async fn find_by_manager(pool: &PgPool, user_id: DbId) -> RepoResult<Vec<Project>> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects WHERE manager_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
            .map_err(RepoError::at("projects.find_by_manager"))
    }

    /// Case-insensitive name substring, optionally narrowed to one status.
    pub async fn search(
        pool: &PgPool,
        term: &str,
        status: Filter<ProjectStatus>,
    ) -> RepoResult<Vec<Project>> {
        let mut conditions = vec!["name ILIKE $1".to_string()];
        if status.value().is_some() {
            conditions.push("status_id = $2".to_string());
        }

        let query = format!(
            "SELECT {COLUMNS} FROM projects WHERE {} ORDER BY created_at DESC, id DESC",
            conditions.join(" AND ")
        );
        let mut q = sqlx::query_as::<_, Project>(&query).bind(like_pattern(term));
        if let Some(status) = status.value() {
            q = q.bind(status);
        }
        q.fetch_all(pool)
            .await
            .map_err(RepoError::at("projects.search"))
    }

    /// Replace every editable column. `manager_id: None` clears the manager.
    pub async fn update(pool: &PgPool, id: DbId, input: &UpdateProject) -> RepoResult<Project> {
        input.validate()?;
        let query = format!(
            "UPDATE projects SET
                name = $2,
                description = $3,
                start_date = $4,
                end_date = $5,
                status_id = $6,
                manager_id = $7
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(input.name.trim())
            .bind(input.description.trim())
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.status)
            .bind(input.manager_id)
            .fetch_optional(pool)
            .await
            .map_err(RepoError::at("projects.update"))?
            .ok_or(RepoError::NotFound {
                entity: "Project",
                id,
            })
    }

    /// Delete a project together with its tasks and their comments.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .map_err(RepoError::at("projects.delete"))?;
        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::info!(project_id = id, "Project deleted");
        }
        Ok(deleted)
    }

    pub async fn count(pool: &PgPool) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM projects")
            .fetch_one(pool)
            .await
            .map_err(RepoError::at("projects.count"))
    }

    pub async fn count_by_status(pool: &PgPool, status: ProjectStatus) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM projects WHERE status_id = $1")
            .bind(status)
            .fetch_one(pool)
            .await
            .map_err(RepoError::at("projects.count_by_status"))
    }

    /// Case-insensitive exact name match. Names are not unique in storage;
    /// callers use this to warn before creating a duplicate.
    pub async fn name_exists(pool: &PgPool, name: &str) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM projects WHERE lower(name) = lower($1))",
        )
        .bind(name.trim())
        .fetch_one(pool)
        .await
        .map_err(RepoError::at("projects.name_exists"))
    }
}

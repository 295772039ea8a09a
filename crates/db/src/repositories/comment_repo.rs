//! Repository for the `comments` table.

use sqlx::PgPool;
use taskmaster_core::types::DbId;
use validator::Validate;

use crate::error::{RepoError, RepoResult};
use crate::models::comment::{Comment, CommentView, CreateComment};

const COLUMNS: &str = "id, task_id, user_id, content, created_at, updated_at";

const VIEW_COLUMNS: &str = "c.id, c.task_id, c.user_id, c.content, c.created_at, c.updated_at, \
                            u.first_name || ' ' || u.last_name AS author_name";

const VIEW_FROM: &str = "FROM comments c JOIN users u ON u.id = c.user_id";

/// Append, read, and delete comments. Comments are never edited.
pub struct CommentRepo;

impl CommentRepo {
    /// Append a comment. An unknown task or author yields
    /// [`RepoError::MissingReference`].
    pub async fn create(pool: &PgPool, input: &CreateComment) -> RepoResult<Comment> {
        input.validate()?;
        let query = format!(
            "INSERT INTO comments (task_id, user_id, content)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let comment = sqlx::query_as::<_, Comment>(&query)
            .bind(input.task_id)
            .bind(input.user_id)
            .bind(input.content.trim())
            .fetch_one(pool)
            .await
            .map_err(RepoError::at("comments.create"))?;
        tracing::debug!(
            comment_id = comment.id,
            task_id = comment.task_id,
            "Comment added"
        );
        Ok(comment)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> RepoResult<Option<CommentView>> {
        let query = format!("SELECT {VIEW_COLUMNS} {VIEW_FROM} WHERE c.id = $1");
        sqlx::query_as::<_, CommentView>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(RepoError::at("comments.find_by_id"))
    }

    /// Comments on a task, newest first.
    pub async fn find_by_task_id(pool: &PgPool, task_id: DbId) -> RepoResult<Vec<CommentView>> {
        let query = format!(
            "SELECT {VIEW_COLUMNS} {VIEW_FROM} WHERE c.task_id = $1
             ORDER BY c.created_at DESC, c.id DESC"
        );
        sqlx::query_as::<_, CommentView>(&query)
            .bind(task_id)
            .fetch_all(pool)
            .await
            .map_err(RepoError::at("comments.find_by_task_id"))
    }

    /// Comments written by a user, newest first.
    pub async fn find_by_user_id(pool: &PgPool, user_id: DbId) -> RepoResult<Vec<CommentView>> {
        let query = format!(
            "SELECT {VIEW_COLUMNS} {VIEW_FROM} WHERE c.user_id = $1
             ORDER BY c.created_at DESC, c.id DESC"
        );
        sqlx::query_as::<_, CommentView>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
            .map_err(RepoError::at("comments.find_by_user_id"))
    }

    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .map_err(RepoError::at("comments.delete"))?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count_by_task_id(pool: &PgPool, task_id: DbId) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM comments WHERE task_id = $1")
            .bind(task_id)
            .fetch_one(pool)
            .await
            .map_err(RepoError::at("comments.count_by_task_id"))
    }
}

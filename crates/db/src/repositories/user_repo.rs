//! Repository for the `users` table.

use std::sync::LazyLock;

use sqlx::PgPool;
use taskmaster_core::error::CoreError;
use taskmaster_core::password::{hash_password, is_password_hash, verify_password};
use taskmaster_core::types::DbId;
use taskmaster_core::validation::password_error;
use validator::Validate;

use crate::error::{RepoError, RepoResult};
use crate::models::status::UserRole;
use crate::models::user::{CreateUser, UpdateUser, User};
use crate::repositories::like_pattern;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, first_name, last_name, email, username, password_hash, role_id, \
                       is_active, created_at, updated_at";

/// Verified against when the username is unknown, so a miss costs the same
/// as a wrong password.
static DUMMY_HASH: LazyLock<String> =
    LazyLock::new(|| hash_password("timing-equalizer").unwrap_or_default());

/// Provides CRUD, search, and credential operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Check credentials against the active user with exactly this username.
    ///
    /// Returns `None` for an unknown username, an inactive account, and a
    /// wrong password alike.
    pub async fn authenticate(
        pool: &PgPool,
        username: &str,
        password: &str,
    ) -> RepoResult<Option<User>> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1 AND is_active = true");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
            .map_err(RepoError::at("users.authenticate"))?;

        match user {
            Some(user) if verify_password(password, &user.password_hash) => {
                tracing::debug!(user_id = user.id, "Credentials accepted");
                Ok(Some(user))
            }
            Some(_) => {
                tracing::debug!("Credentials rejected");
                Ok(None)
            }
            None => {
                verify_password(password, &DUMMY_HASH);
                tracing::debug!("Credentials rejected");
                Ok(None)
            }
        }
    }

    /// Insert a new user, returning the created row.
    ///
    /// The DTO must carry an already-computed hash. A duplicate email or
    /// username yields [`RepoError::Conflict`].
    pub async fn create(pool: &PgPool, input: &CreateUser) -> RepoResult<User> {
        input.validate()?;
        let query = format!(
            "INSERT INTO users (first_name, last_name, email, username, password_hash, role_id, is_active)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(input.first_name.trim())
            .bind(input.last_name.trim())
            .bind(input.email.trim())
            .bind(input.username.trim())
            .bind(&input.password_hash)
            .bind(input.role)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
            .map_err(RepoError::at("users.create"))?;
        tracing::info!(
            user_id = user.id,
            username = %user.username,
            role = %user.role,
            "User created"
        );
        Ok(user)
    }

    /// List all users ordered by most recently created first.
    pub async fn find_all(pool: &PgPool) -> RepoResult<Vec<User>> {
        let query = format!("SELECT {COLUMNS} FROM users ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, User>(&query)
            .fetch_all(pool)
            .await
            .map_err(RepoError::at("users.find_all"))
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> RepoResult<Option<User>> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(RepoError::at("users.find_by_id"))
    }

    /// Find a user by the exact username, active or not.
    pub async fn find_by_username(pool: &PgPool, username: &str) -> RepoResult<Option<User>> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
            .map_err(RepoError::at("users.find_by_username"))
    }

    /// Find a user by the exact email, active or not.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> RepoResult<Option<User>> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
            .map_err(RepoError::at("users.find_by_email"))
    }

    /// Case-insensitive substring search over first name, last name, email
    /// and username, optionally restricted to one role.
    ///
    /// An empty term with no role returns the same rows as [`Self::find_all`].
    pub async fn search(
        pool: &PgPool,
        term: &str,
        role: Option<UserRole>,
    ) -> RepoResult<Vec<User>> {
        let mut conditions = vec!["(first_name ILIKE $1 OR last_name ILIKE $1 \
                                   OR email ILIKE $1 OR username ILIKE $1)"
            .to_string()];
        if role.is_some() {
            conditions.push("role_id = $2".to_string());
        }

        let query = format!(
            "SELECT {COLUMNS} FROM users WHERE {} ORDER BY created_at DESC, id DESC",
            conditions.join(" AND ")
        );
        let mut q = sqlx::query_as::<_, User>(&query).bind(like_pattern(term));
        if let Some(role) = role {
            q = q.bind(role);
        }
        q.fetch_all(pool)
            .await
            .map_err(RepoError::at("users.search"))
    }

    /// Replace a user's profile columns. The password hash is untouched.
    pub async fn update(pool: &PgPool, id: DbId, input: &UpdateUser) -> RepoResult<User> {
        input.validate()?;
        let query = format!(
            "UPDATE users SET
                first_name = $2,
                last_name = $3,
                email = $4,
                username = $5,
                role_id = $6,
                is_active = $7
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(input.first_name.trim())
            .bind(input.last_name.trim())
            .bind(input.email.trim())
            .bind(input.username.trim())
            .bind(input.role)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
            .map_err(RepoError::at("users.update"))?
            .ok_or(RepoError::NotFound { entity: "User", id })
    }

    /// Store a new password hash. Rejects anything that is not a PHC string.
    pub async fn update_password(pool: &PgPool, id: DbId, password_hash: &str) -> RepoResult<()> {
        if !is_password_hash(password_hash) {
            return Err(RepoError::Invalid(
                "password must be stored as a hash".into(),
            ));
        }
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(pool)
            .await
            .map_err(RepoError::at("users.update_password"))?;
        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound { entity: "User", id });
        }
        tracing::info!(user_id = id, "Password updated");
        Ok(())
    }

    /// Verify `current`, check the strength of `new`, then store its hash.
    ///
    /// A wrong current password is [`CoreError::Unauthorized`]; a weak new
    /// password is [`CoreError::Validation`] carrying the broken rule.
    pub async fn change_password(
        pool: &PgPool,
        id: DbId,
        current: &str,
        new: &str,
    ) -> Result<(), CoreError> {
        let user = Self::find_by_id(pool, id)
            .await?
            .ok_or(CoreError::NotFound { entity: "User", id })?;

        if !verify_password(current, &user.password_hash) {
            tracing::warn!(
                user_id = id,
                "Password change rejected: wrong current password"
            );
            return Err(CoreError::Unauthorized(
                "Current password is incorrect".into(),
            ));
        }
        if let Some(err) = password_error(new) {
            return Err(CoreError::Validation(err.to_string()));
        }

        let hash = hash_password(new)?;
        Self::update_password(pool, id, &hash).await?;
        Ok(())
    }

    /// Delete a user. Rows they created cascade; tasks assigned to them and
    /// projects they manage are kept and cleared.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .map_err(RepoError::at("users.delete"))?;
        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::info!(user_id = id, "User deleted");
        }
        Ok(deleted)
    }

    /// Case-insensitive, like the unique index on `lower(email)`.
    pub async fn email_exists(pool: &PgPool, email: &str) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE lower(email) = lower($1))",
        )
        .bind(email.trim())
        .fetch_one(pool)
        .await
        .map_err(RepoError::at("users.email_exists"))
    }

    pub async fn username_exists(pool: &PgPool, username: &str) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE lower(username) = lower($1))",
        )
        .bind(username.trim())
        .fetch_one(pool)
        .await
        .map_err(RepoError::at("users.username_exists"))
    }

    /// Whether a user other than `id` already holds `email`. Used when
    /// editing a profile, where keeping one's own email is not a clash.
    pub async fn email_taken_by_other(pool: &PgPool, email: &str, id: DbId) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE lower(email) = lower($1) AND id <> $2)",
        )
        .bind(email.trim())
        .bind(id)
        .fetch_one(pool)
        .await
        .map_err(RepoError::at("users.email_taken_by_other"))
    }

    pub async fn count(pool: &PgPool) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await
            .map_err(RepoError::at("users.count"))
    }

    pub async fn count_active(pool: &PgPool) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE is_active = true")
            .fetch_one(pool)
            .await
            .map_err(RepoError::at("users.count_active"))
    }
}

//! PostgreSQL persistence and access control for the task tracker.
//!
//! - [`models`] -- entity rows, create/update DTOs, and join-hydrated read models.
//! - [`repositories`] -- zero-sized repo structs with async CRUD and search methods.
//! - [`session`] -- the authenticated identity, passed explicitly to callers.
//! - [`access`] -- role and ownership checks consulted before mutations.

use std::str::FromStr;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

pub mod access;
pub mod config;
pub mod error;
pub mod models;
pub mod repositories;
pub mod session;

pub use config::DbConfig;
pub use error::{RepoError, RepoResult};

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from configuration.
///
/// Every connection gets a server-side `statement_timeout`, and acquiring a
/// connection waits at most `acquire_timeout`, so no repository call can
/// block indefinitely on a stalled database.
pub async fn create_pool(config: &DbConfig) -> Result<DbPool, sqlx::Error> {
    let statement_timeout_ms = config.statement_timeout.as_millis().to_string();
    let options = PgConnectOptions::from_str(&config.database_url)?
        .options([("statement_timeout", statement_timeout_ms)]);

    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect_with(options)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}

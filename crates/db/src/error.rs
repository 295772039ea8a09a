//! Typed repository failures.
//!
//! Every repository method returns [`RepoResult`]. Raw `sqlx` errors are
//! classified once, at the repository boundary, so callers can tell a
//! duplicate value from a missing parent row from a dead connection.

use sqlx::error::ErrorKind;
use taskmaster_core::error::CoreError;
use taskmaster_core::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// A mutation targeted an id that does not exist.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// A unique constraint rejected the write. `field` is the column the
    /// `uq_<table>_<field>` constraint protects.
    #[error("duplicate value for {field}")]
    Conflict { field: String },

    /// A foreign key pointed at a row that does not exist.
    #[error("referenced row does not exist ({constraint})")]
    MissingReference { constraint: String },

    /// A check constraint rejected the row.
    #[error("row violates {constraint}")]
    InvalidData { constraint: String },

    /// Input failed validation before reaching the database.
    #[error("invalid input: {0}")]
    Invalid(String),

    /// No pooled connection became available in time.
    #[error("timed out waiting for a database connection")]
    Timeout,

    #[error("database error: {0}")]
    Storage(#[source] sqlx::Error),
}

pub type RepoResult<T> = Result<T, RepoError>;

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut => RepoError::Timeout,
            sqlx::Error::Database(db_err) => {
                let constraint = db_err.constraint().unwrap_or("unknown").to_string();
                match db_err.kind() {
                    ErrorKind::UniqueViolation => RepoError::Conflict {
                        field: field_from_constraint(&constraint, db_err.table()),
                    },
                    ErrorKind::ForeignKeyViolation => RepoError::MissingReference { constraint },
                    ErrorKind::CheckViolation | ErrorKind::NotNullViolation => {
                        RepoError::InvalidData { constraint }
                    }
                    _ => RepoError::Storage(sqlx::Error::Database(db_err)),
                }
            }
            other => RepoError::Storage(other),
        }
    }
}

impl From<validator::ValidationErrors> for RepoError {
    fn from(errors: validator::ValidationErrors) -> Self {
        RepoError::Invalid(errors.to_string())
    }
}

impl RepoError {
    /// Build a `map_err` adapter that classifies a `sqlx` error and logs it
    /// against the named operation.
    ///
    /// ```ignore
    /// query.fetch_one(pool).await.map_err(RepoError::at("users.create"))?;
    /// ```
    pub(crate) fn at(operation: &'static str) -> impl FnOnce(sqlx::Error) -> RepoError {
        move |err| {
            let err = RepoError::from(err);
            err.log(operation);
            err
        }
    }

    /// `true` for failures caused by the caller's data rather than the
    /// storage layer.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            RepoError::NotFound { .. }
                | RepoError::Conflict { .. }
                | RepoError::MissingReference { .. }
                | RepoError::InvalidData { .. }
                | RepoError::Invalid(_)
        )
    }

    fn log(&self, operation: &'static str) {
        if self.is_rejection() {
            tracing::warn!(operation, error = %self, "Repository call rejected");
        } else {
            tracing::error!(operation, error = %self, "Repository call failed");
        }
    }
}

/// `uq_users_email` on table `users` -> `email`.
fn field_from_constraint(constraint: &str, table: Option<&str>) -> String {
    let rest = constraint.strip_prefix("uq_").unwrap_or(constraint);
    table
        .and_then(|t| rest.strip_prefix(t))
        .and_then(|r| r.strip_prefix('_'))
        .unwrap_or(rest)
        .to_string()
}

impl From<RepoError> for CoreError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound { entity, id } => CoreError::NotFound { entity, id },
            RepoError::Conflict { field } => CoreError::Conflict(format!("{field} already exists")),
            RepoError::MissingReference { constraint } => {
                CoreError::Validation(format!("Referenced record does not exist ({constraint})"))
            }
            RepoError::InvalidData { constraint } => {
                CoreError::Validation(format!("Invalid data ({constraint})"))
            }
            RepoError::Invalid(msg) => CoreError::Validation(msg),
            RepoError::Timeout => CoreError::Internal("database timed out".into()),
            RepoError::Storage(e) => CoreError::Internal(e.to_string()),
        }
    }
}

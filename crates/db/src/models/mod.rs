//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A `Validate` create DTO for inserts
//! - A `Validate` update DTO carrying the full editable row
//! - Join-hydrated read models (`*View`) where callers need display names

use std::borrow::Cow;

use taskmaster_core::error::CoreError;
use validator::ValidationError;

pub mod comment;
pub mod dashboard;
pub mod project;
pub mod status;
pub mod task;
pub mod user;

/// Adapt a core validation rule to a `validator` field or schema check.
pub(crate) fn core_rule(
    code: &'static str,
    result: Result<(), CoreError>,
) -> Result<(), ValidationError> {
    result.map_err(|err| {
        let message = match err {
            CoreError::Validation(msg) => msg,
            other => other.to_string(),
        };
        ValidationError::new(code).with_message(Cow::Owned(message))
    })
}

//! Comment entity model and DTOs. Comments are append-only; there is no
//! update DTO.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use taskmaster_core::types::{Date, DbId, Timestamp};
use taskmaster_core::validation::validate_comment;
use validator::{Validate, ValidationError};

use crate::models::core_rule;

/// Longest content shown unabridged by [`Comment::preview`].
pub const PREVIEW_LENGTH: usize = 50;

/// A comment row from the `comments` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    pub task_id: DbId,
    pub user_id: DbId,
    pub content: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Comment {
    /// Content cut to [`PREVIEW_LENGTH`] characters, ending in `"..."` when
    /// shortened.
    pub fn preview(&self) -> String {
        if self.content.chars().count() <= PREVIEW_LENGTH {
            return self.content.clone();
        }
        let head: String = self.content.chars().take(PREVIEW_LENGTH - 3).collect();
        format!("{head}...")
    }

    /// Whether the comment was posted on `date` (UTC).
    pub fn is_from_day(&self, date: Date) -> bool {
        self.created_at.date_naive() == date
    }
}

/// A comment joined with its author's display name.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct CommentView {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub comment: Comment,
    pub author_name: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateComment {
    pub task_id: DbId,
    pub user_id: DbId,
    #[validate(custom(function = "check_content"))]
    pub content: String,
}

fn check_content(content: &str) -> Result<(), ValidationError> {
    core_rule("content", validate_comment(content))
}

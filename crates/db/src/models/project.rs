//! Project entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use taskmaster_core::types::{Date, DbId, Timestamp};
use taskmaster_core::validation::validate_project_fields;
use validator::{Validate, ValidationError};

use crate::models::core_rule;
use crate::models::status::ProjectStatus;

/// A project row from the `projects` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub start_date: Date,
    pub end_date: Date,
    #[sqlx(rename = "status_id")]
    pub status: ProjectStatus,
    /// Cleared when the managing user is deleted.
    pub manager_id: Option<DbId>,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Project {
    pub fn is_in_progress(&self) -> bool {
        self.status == ProjectStatus::InProgress
    }

    pub fn is_completed(&self) -> bool {
        self.status == ProjectStatus::Completed
    }

    /// Whole days from start to end.
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }
}

/// DTO for creating a new project.
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "check_create"))]
pub struct CreateProject {
    pub name: String,
    pub description: String,
    pub start_date: Date,
    pub end_date: Date,
    pub status: ProjectStatus,
    pub manager_id: Option<DbId>,
    pub created_by: DbId,
}

/// DTO for editing a project. Replaces every editable column, including
/// clearing the manager with `None`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "check_update"))]
pub struct UpdateProject {
    pub name: String,
    pub description: String,
    pub start_date: Date,
    pub end_date: Date,
    pub status: ProjectStatus,
    pub manager_id: Option<DbId>,
}

impl From<&Project> for UpdateProject {
    fn from(project: &Project) -> Self {
        Self {
            name: project.name.clone(),
            description: project.description.clone(),
            start_date: project.start_date,
            end_date: project.end_date,
            status: project.status,
            manager_id: project.manager_id,
        }
    }
}

fn check_create(input: &CreateProject) -> Result<(), ValidationError> {
    core_rule(
        "project",
        validate_project_fields(
            &input.name,
            &input.description,
            input.start_date,
            input.end_date,
        ),
    )
}

fn check_update(input: &UpdateProject) -> Result<(), ValidationError> {
    core_rule(
        "project",
        validate_project_fields(
            &input.name,
            &input.description,
            input.start_date,
            input.end_date,
        ),
    )
}

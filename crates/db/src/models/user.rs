//! User entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use taskmaster_core::password::is_password_hash;
use taskmaster_core::types::{DbId, Timestamp};
use taskmaster_core::validation::{is_valid_email, is_valid_name, is_valid_username};
use validator::{Validate, ValidationError};

use crate::models::status::UserRole;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct User {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    #[sqlx(rename = "role_id")]
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// "First Last".
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn is_regular_user(&self) -> bool {
        self.role == UserRole::User
    }
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub email: String,
    pub username: String,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: Timestamp,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            full_name: user.full_name(),
            email: user.email.clone(),
            username: user.username.clone(),
            role: user.role,
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}

/// DTO for creating a new user. The password must already be hashed.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUser {
    #[validate(custom(function = "check_name", message = "Invalid first name"))]
    pub first_name: String,
    #[validate(custom(function = "check_name", message = "Invalid last name"))]
    pub last_name: String,
    #[validate(custom(function = "check_email", message = "Invalid email address"))]
    pub email: String,
    #[validate(custom(
        function = "check_username",
        message = "Username must be 3-20 letters, digits, '_' or '-'"
    ))]
    pub username: String,
    #[validate(custom(
        function = "check_password_hash",
        message = "Password must be stored as a hash"
    ))]
    pub password_hash: String,
    pub role: UserRole,
    pub is_active: bool,
}

/// DTO for editing a user's profile. Replaces every editable column; the
/// password hash is changed only through the dedicated password operations.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateUser {
    #[validate(custom(function = "check_name", message = "Invalid first name"))]
    pub first_name: String,
    #[validate(custom(function = "check_name", message = "Invalid last name"))]
    pub last_name: String,
    #[validate(custom(function = "check_email", message = "Invalid email address"))]
    pub email: String,
    #[validate(custom(
        function = "check_username",
        message = "Username must be 3-20 letters, digits, '_' or '-'"
    ))]
    pub username: String,
    pub role: UserRole,
    pub is_active: bool,
}

impl From<&User> for UpdateUser {
    /// Start an edit from the row as currently stored.
    fn from(user: &User) -> Self {
        Self {
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            username: user.username.clone(),
            role: user.role,
            is_active: user.is_active,
        }
    }
}

fn check_name(value: &str) -> Result<(), ValidationError> {
    is_valid_name(value)
        .then_some(())
        .ok_or_else(|| ValidationError::new("name"))
}

fn check_email(value: &str) -> Result<(), ValidationError> {
    is_valid_email(value)
        .then_some(())
        .ok_or_else(|| ValidationError::new("email"))
}

fn check_username(value: &str) -> Result<(), ValidationError> {
    is_valid_username(value)
        .then_some(())
        .ok_or_else(|| ValidationError::new("username"))
}

fn check_password_hash(value: &str) -> Result<(), ValidationError> {
    is_password_hash(value)
        .then_some(())
        .ok_or_else(|| ValidationError::new("password_hash"))
}

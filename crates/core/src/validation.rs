//! Input validation rules applied before any repository mutation.
//!
//! All functions are pure. String inputs are trimmed where the rule says so;
//! password rules never trim, since whitespace is a legal password character.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;
use crate::types::Date;

/// Minimum password length, counted in characters.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Inclusive bounds on a trimmed first or last name, in characters.
pub const NAME_LENGTH: (usize, usize) = (2, 100);

pub const PROJECT_NAME_MIN_LENGTH: usize = 3;
pub const PROJECT_DESCRIPTION_MIN_LENGTH: usize = 10;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9+_.-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("valid regex")
});

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{3,20}$").expect("valid regex"));

// Letters, Latin-1 accented letters (U+00C0..=U+00FF), ASCII whitespace,
// apostrophes and hyphens.
static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z\x{C0}-\x{FF}\t\n\x0B\x0C\r '-]+$").expect("valid regex")
});

/// Check an email address after trimming. Empty input is invalid.
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    !email.is_empty() && EMAIL_RE.is_match(email)
}

/// Check a username after trimming: 3 to 20 of `[A-Za-z0-9_-]`.
pub fn is_valid_username(username: &str) -> bool {
    USERNAME_RE.is_match(username.trim())
}

/// Check a first or last name after trimming.
///
/// Accepts "Jean-Pierre" and "O'Connor"; rejects digits and single letters.
pub fn is_valid_name(name: &str) -> bool {
    let name = name.trim();
    let len = name.chars().count();
    (NAME_LENGTH.0..=NAME_LENGTH.1).contains(&len) && NAME_RE.is_match(name)
}

/// `true` when the string has content once whitespace is trimmed.
pub fn is_not_blank(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Exact equality of a password and its confirmation. Missing on either side
/// never matches.
pub fn passwords_match(password: Option<&str>, confirmation: Option<&str>) -> bool {
    match (password, confirmation) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// The first rule a weak password breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordError {
    Empty,
    TooShort,
    MissingUppercase,
    MissingLowercase,
    MissingDigit,
}

impl fmt::Display for PasswordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Password cannot be empty"),
            Self::TooShort => write!(
                f,
                "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
            ),
            Self::MissingUppercase => {
                write!(f, "Password must contain at least one uppercase letter")
            }
            Self::MissingLowercase => {
                write!(f, "Password must contain at least one lowercase letter")
            }
            Self::MissingDigit => write!(f, "Password must contain at least one digit"),
        }
    }
}

impl std::error::Error for PasswordError {}

/// Return the first failing password rule, checked in the order
/// empty, length, uppercase, lowercase, digit. `None` means the password is
/// strong.
pub fn password_error(password: &str) -> Option<PasswordError> {
    if password.is_empty() {
        return Some(PasswordError::Empty);
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Some(PasswordError::TooShort);
    }

    let has_upper = password.chars().any(char::is_uppercase);
    let has_lower = password.chars().any(char::is_lowercase);
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if !has_upper {
        Some(PasswordError::MissingUppercase)
    } else if !has_lower {
        Some(PasswordError::MissingLowercase)
    } else if !has_digit {
        Some(PasswordError::MissingDigit)
    } else {
        None
    }
}

/// Human-readable reason a password is weak, or an empty string when it is
/// strong.
pub fn password_error_message(password: &str) -> String {
    password_error(password)
        .map(|e| e.to_string())
        .unwrap_or_default()
}

/// At least 8 characters with an uppercase letter, a lowercase letter, and a
/// digit. No special character is required.
pub fn is_strong_password(password: &str) -> bool {
    password_error(password).is_none()
}

/// Fields collected by a registration or admin "create user" form.
#[derive(Debug, Clone, Copy)]
pub struct Registration<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub username: &'a str,
    pub password: &'a str,
    pub confirmation: &'a str,
}

/// Validate a registration form, reporting the first failing field.
pub fn validate_registration(form: &Registration<'_>) -> Result<(), CoreError> {
    if !is_valid_name(form.first_name) {
        return Err(CoreError::Validation("Invalid first name".into()));
    }
    if !is_valid_name(form.last_name) {
        return Err(CoreError::Validation("Invalid last name".into()));
    }
    if !is_valid_email(form.email) {
        return Err(CoreError::Validation("Invalid email address".into()));
    }
    if !is_valid_username(form.username) {
        return Err(CoreError::Validation(
            "Username must be 3-20 letters, digits, '_' or '-'".into(),
        ));
    }
    if let Some(err) = password_error(form.password) {
        return Err(CoreError::Validation(err.to_string()));
    }
    if !passwords_match(Some(form.password), Some(form.confirmation)) {
        return Err(CoreError::Validation("Passwords do not match".into()));
    }
    Ok(())
}

/// Validate the project form: name and description lengths (trimmed) and an
/// end date strictly after the start date.
pub fn validate_project_fields(
    name: &str,
    description: &str,
    start_date: Date,
    end_date: Date,
) -> Result<(), CoreError> {
    if name.trim().chars().count() < PROJECT_NAME_MIN_LENGTH {
        return Err(CoreError::Validation(format!(
            "Project name must be at least {PROJECT_NAME_MIN_LENGTH} characters"
        )));
    }
    if description.trim().chars().count() < PROJECT_DESCRIPTION_MIN_LENGTH {
        return Err(CoreError::Validation(format!(
            "Description must be at least {PROJECT_DESCRIPTION_MIN_LENGTH} characters"
        )));
    }
    if end_date <= start_date {
        return Err(CoreError::Validation(
            "End date must be after the start date".into(),
        ));
    }
    Ok(())
}

pub fn validate_task_fields(title: &str) -> Result<(), CoreError> {
    if !is_not_blank(title) {
        return Err(CoreError::Validation("Task title is required".into()));
    }
    Ok(())
}

pub fn validate_comment(content: &str) -> Result<(), CoreError> {
    if !is_not_blank(content) {
        return Err(CoreError::Validation("Comment cannot be empty".into()));
    }
    Ok(())
}

//! Authorization checks consulted before repository mutations.
//!
//! Admins may do anything. Regular users may change the status of tasks
//! assigned to them, delete their own comments, and edit their own profile.

use taskmaster_core::error::CoreError;
use taskmaster_core::types::DbId;

use crate::models::comment::Comment;
use crate::models::task::Task;
use crate::models::user::User;
use crate::session::SessionManager;

/// The logged-in user, or [`CoreError::Unauthorized`].
pub fn require_authenticated(session: &SessionManager) -> Result<User, CoreError> {
    session
        .current_user()
        .ok_or_else(|| CoreError::Unauthorized("Login required".into()))
}

/// The logged-in admin. A guest is [`CoreError::Unauthorized`]; a regular
/// user is [`CoreError::Forbidden`].
pub fn require_admin(session: &SessionManager) -> Result<User, CoreError> {
    let user = require_authenticated(session)?;
    if !user.is_admin() {
        tracing::warn!(username = %user.username, "Admin role required");
        return Err(CoreError::Forbidden("Admin role required".into()));
    }
    Ok(user)
}

pub fn can_manage_projects(session: &SessionManager) -> bool {
    session.is_admin()
}

/// Editing a task's fields, reassigning it, or deleting it.
pub fn can_edit_task(session: &SessionManager, _task: &Task) -> bool {
    session.is_admin()
}

pub fn can_update_task_status(session: &SessionManager, task: &Task) -> bool {
    session.is_admin() || (task.assigned_to.is_some() && task.assigned_to == session.actor_id())
}

pub fn can_delete_comment(session: &SessionManager, comment: &Comment) -> bool {
    session.is_admin() || session.actor_id() == Some(comment.user_id)
}

pub fn can_edit_user(session: &SessionManager, user_id: DbId) -> bool {
    session.is_admin() || session.actor_id() == Some(user_id)
}

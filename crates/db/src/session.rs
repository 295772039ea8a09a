//! The authenticated identity for the running application.
//!
//! A [`SessionManager`] is created once at startup and cloned into every
//! component that needs to know who is acting. Clones share state.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use taskmaster_core::types::DbId;

use crate::models::user::User;

/// Actor id reported when nobody is logged in.
pub const NO_ACTOR: DbId = -1;

/// Display name reported when nobody is logged in.
pub const GUEST_NAME: &str = "Guest";

#[derive(Debug, Clone, Default)]
pub struct SessionManager {
    current: Arc<RwLock<Option<User>>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `user` as the current identity, replacing any previous one.
    pub fn login(&self, user: User) {
        tracing::info!(username = %user.username, role = %user.role, "Session started");
        *self.write() = Some(user);
    }

    /// Clear the current identity. A no-op when nobody is logged in.
    pub fn logout(&self) {
        if let Some(user) = self.write().take() {
            tracing::info!(username = %user.username, role = %user.role, "Session ended");
        }
    }

    /// A snapshot of the current user.
    pub fn current_user(&self) -> Option<User> {
        self.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.read().as_ref().is_some_and(User::is_admin)
    }

    pub fn is_regular_user(&self) -> bool {
        self.read().as_ref().is_some_and(User::is_regular_user)
    }

    /// The current user's id, or [`NO_ACTOR`].
    pub fn current_user_id(&self) -> DbId {
        self.actor_id().unwrap_or(NO_ACTOR)
    }

    pub fn actor_id(&self) -> Option<DbId> {
        self.read().as_ref().map(|u| u.id)
    }

    /// "First Last" of the current user, or [`GUEST_NAME`].
    pub fn current_user_full_name(&self) -> String {
        self.read()
            .as_ref()
            .map_or_else(|| GUEST_NAME.to_string(), User::full_name)
    }

    /// Replace the cached identity with a freshly loaded row after a profile
    /// or password edit. Ignored unless `user` is the one logged in.
    ///
    /// Returns `true` if the cached identity was replaced.
    pub fn refresh(&self, user: User) -> bool {
        let mut current = self.write();
        match current.as_ref() {
            Some(existing) if existing.id == user.id => {
                *current = Some(user);
                true
            }
            _ => false,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<User>> {
        self.current.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<User>> {
        self.current.write().unwrap_or_else(PoisonError::into_inner)
    }
}

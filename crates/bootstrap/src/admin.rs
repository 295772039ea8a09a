//! First-run seeding of the administrator account.

use anyhow::{bail, Context};
use taskmaster_core::password::hash_password;
use taskmaster_core::validation::{is_valid_email, is_valid_username, password_error};
use taskmaster_db::models::status::UserRole;
use taskmaster_db::models::user::CreateUser;
use taskmaster_db::repositories::UserRepo;
use taskmaster_db::DbPool;

/// Credentials for the first administrator.
///
/// | Env Var                    |
/// |----------------------------|
/// | `BOOTSTRAP_ADMIN_USERNAME` |
/// | `BOOTSTRAP_ADMIN_EMAIL`    |
/// | `BOOTSTRAP_ADMIN_PASSWORD` |
///
/// Seeding is skipped unless all three are set.
pub struct AdminSeed {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for AdminSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminSeed")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum SeedOutcome {
    Created,
    AlreadyExists,
}

impl AdminSeed {
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Some(Self {
            username: get("BOOTSTRAP_ADMIN_USERNAME")?.trim().to_string(),
            email: get("BOOTSTRAP_ADMIN_EMAIL")?.trim().to_string(),
            password: get("BOOTSTRAP_ADMIN_PASSWORD")?,
        })
    }

    /// Reject seed values the login and profile screens would refuse.
    pub fn check(&self) -> anyhow::Result<()> {
        if !is_valid_username(&self.username) {
            bail!("BOOTSTRAP_ADMIN_USERNAME is not a valid username");
        }
        if !is_valid_email(&self.email) {
            bail!("BOOTSTRAP_ADMIN_EMAIL is not a valid email address");
        }
        if let Some(err) = password_error(&self.password) {
            bail!("BOOTSTRAP_ADMIN_PASSWORD is too weak: {err}");
        }
        Ok(())
    }
}

/// Create the administrator unless a user with that username exists.
pub async fn seed_admin(pool: &DbPool, seed: &AdminSeed) -> anyhow::Result<SeedOutcome> {
    seed.check()?;

    if UserRepo::username_exists(pool, &seed.username).await? {
        return Ok(SeedOutcome::AlreadyExists);
    }

    let input = CreateUser {
        first_name: "System".into(),
        last_name: "Administrator".into(),
        email: seed.email.clone(),
        username: seed.username.clone(),
        password_hash: hash_password(&seed.password)?,
        role: UserRole::Admin,
        is_active: true,
    };
    UserRepo::create(pool, &input)
        .await
        .context("Failed to create the administrator account")?;
    Ok(SeedOutcome::Created)
}

use std::time::Duration;

/// Database configuration loaded from environment variables.
///
/// | Env Var                     | Default    |
/// |-----------------------------|------------|
/// | `DATABASE_URL`              | (required) |
/// | `DB_MAX_CONNECTIONS`        | `10`       |
/// | `DB_ACQUIRE_TIMEOUT_SECS`   | `5`        |
/// | `DB_STATEMENT_TIMEOUT_SECS` | `10`       |
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub database_url: String,
    pub max_connections: u32,
    /// How long a repository call may wait for a pooled connection.
    pub acquire_timeout: Duration,
    /// Server-side cap on a single statement.
    pub statement_timeout: Duration,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} must be a positive integer, got {value:?}")]
    Invalid { var: &'static str, value: String },
}

impl DbConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let max_connections = parse_positive(&lookup, "DB_MAX_CONNECTIONS", 10)?;
        let acquire_timeout_secs = parse_positive(&lookup, "DB_ACQUIRE_TIMEOUT_SECS", 5)?;
        let statement_timeout_secs = parse_positive(&lookup, "DB_STATEMENT_TIMEOUT_SECS", 10)?;

        Ok(Self {
            database_url,
            max_connections,
            acquire_timeout: Duration::from_secs(u64::from(acquire_timeout_secs)),
            statement_timeout: Duration::from_secs(u64::from(statement_timeout_secs)),
        })
    }
}

fn parse_positive<F>(lookup: &F, var: &'static str, default: u32) -> Result<u32, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(default),
        Some(value) => match value.trim().parse::<u32>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(ConfigError::Invalid { var, value }),
        },
    }
}

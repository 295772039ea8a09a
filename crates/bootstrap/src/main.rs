mod admin;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use taskmaster_db::DbConfig;

use admin::{AdminSeed, SeedOutcome};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskmaster_db=debug,taskmaster_bootstrap=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(err) = run().await {
        tracing::error!(error = %format!("{err:#}"), "Bootstrap failed");
        return Err(err);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // --- Configuration ---
    let config = DbConfig::from_env().context("Invalid database configuration")?;
    tracing::info!(
        max_connections = config.max_connections,
        acquire_timeout_secs = config.acquire_timeout.as_secs(),
        statement_timeout_secs = config.statement_timeout.as_secs(),
        "Loaded database configuration"
    );

    // --- Database ---
    let pool = taskmaster_db::create_pool(&config)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connection pool created");

    taskmaster_db::health_check(&pool)
        .await
        .context("Database health check failed")?;
    tracing::info!("Database health check passed");

    taskmaster_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");

    // --- Administrator ---
    match AdminSeed::from_env() {
        None => tracing::info!("BOOTSTRAP_ADMIN_* not set, skipping administrator seed"),
        Some(seed) => match admin::seed_admin(&pool, &seed).await? {
            SeedOutcome::Created => {
                tracing::info!(username = %seed.username, "Administrator account created")
            }
            SeedOutcome::AlreadyExists => {
                tracing::info!(username = %seed.username, "Administrator account already exists")
            }
        },
    }

    pool.close().await;
    Ok(())
}

//! Database migration commands.
//!
//! # Usage
//!
//! ```bash
//! bc-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `CONCIERGE_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! # Migration Files
//!
//! Migrations live in `crates/concierge/migrations/` and are embedded into the
//! binary at compile time.

use brew_concierge::config::{ConfigError, database_url_from_env};
use brew_concierge::db;

/// Errors from running migrations.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run the concierge database migrations.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the connection fails, or
/// a migration fails to apply.
pub async fn run() -> Result<(), MigrationError> {
    let database_url = database_url_from_env()?;

    tracing::info!("Connecting to concierge database...");
    let pool = db::create_pool(&database_url).await?;

    tracing::info!("Running concierge migrations...");
    sqlx::migrate!("../concierge/migrations").run(&pool).await?;

    tracing::info!("Concierge migrations complete!");
    Ok(())
}

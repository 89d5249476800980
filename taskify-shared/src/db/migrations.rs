//! Schema migrations
//!
//! The SQL files live in the workspace-level `migrations/` directory and are
//! embedded at compile time, so each binary can bring the schema up to date
//! on startup (`RUN_MIGRATIONS=true`). sqlx takes an advisory lock while
//! migrating, which makes concurrent startups of several binaries safe.

use sqlx::{migrate::Migrator, PgPool};
use tracing::{info, warn};

static MIGRATOR: Migrator = sqlx::migrate!("../migrations");

/// Applies every pending migration.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!(
        available = MIGRATOR.iter().count(),
        "Running database migrations"
    );

    MIGRATOR.run(pool).await.map_err(|err| {
        warn!(error = %err, "Migration failed");
        err
    })?;

    info!("Database schema is up to date");
    Ok(())
}

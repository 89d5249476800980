//! # Taskify API Gateway
//!
//! REST front for users, boards, columns and tasks. Users and boards are
//! proxied to their gRPC services unless switched to local; columns and
//! tasks go straight to PostgreSQL.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p taskify-api
//! ```

use anyhow::Context;
use taskify_api::app::{build_router, AppState, Gateways};
use taskify_api::config::Config;
use taskify_shared::db::{migrations::run_migrations, pool};
use taskify_shared::telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init("taskify_api=debug,taskify_shared=info,tower_http=info")?;

    tracing::info!(
        "Taskify API gateway v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let db = pool::create_pool(config.database.clone())
        .await
        .context("failed to connect to database")?;

    if config.run_migrations {
        run_migrations(&db)
            .await
            .context("failed to run database migrations")?;
    }

    let gateways = Gateways::from_config(&config, &db)?;
    let bind_address = config.bind_address();
    let app = build_router(AppState::new(db.clone(), config, gateways));

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("failed to bind {bind_address}"))?;
    tracing::info!("Server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool::close_pool(db).await;
    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received, draining connections...");
}

//! users-service: `taskify.users.v1.UsersService` over PostgreSQL.
//!
//! ```bash
//! cargo run -p taskify-services --bin users-service
//! ```

use std::sync::Arc;
use taskify_services::config::ServiceConfig;
use taskify_services::grpc::UsersGrpc;
use taskify_services::server::{connect_database, serve, shutdown_signal};
use taskify_shared::db::pool::close_pool;
use taskify_shared::services::PgUserService;
use taskify_shared::telemetry;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init("taskify_services=debug,taskify_shared=info,tower_http=info")?;

    let config = ServiceConfig::from_env("USERS_SERVICE_ADDR", ([0, 0, 0, 0], 50051).into())?;
    let pool = connect_database(&config).await?;

    let service = UsersGrpc::new(Arc::new(PgUserService::new(pool.clone()))).into_server();

    let listener = TcpListener::bind(config.addr).await?;
    tracing::info!(
        addr = %listener.local_addr()?,
        "users-service v{} listening",
        env!("CARGO_PKG_VERSION")
    );

    serve("users-service", service, listener, shutdown_signal()).await?;

    close_pool(pool).await;
    Ok(())
}

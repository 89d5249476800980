//! boards-service: `taskify.boards.v1.BoardsService` over PostgreSQL.
//!
//! ```bash
//! cargo run -p taskify-services --bin boards-service
//! ```

use std::sync::Arc;
use taskify_services::config::ServiceConfig;
use taskify_services::grpc::BoardsGrpc;
use taskify_services::server::{connect_database, serve, shutdown_signal};
use taskify_shared::db::ordering::OrderingAllocator;
use taskify_shared::db::pool::close_pool;
use taskify_shared::services::PgBoardService;
use taskify_shared::telemetry;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init("taskify_services=debug,taskify_shared=info,tower_http=info")?;

    let config = ServiceConfig::from_env("BOARDS_SERVICE_ADDR", ([0, 0, 0, 0], 50052).into())?;
    let pool = connect_database(&config).await?;

    let allocator = OrderingAllocator::new(config.ordering_max_attempts);
    let service = BoardsGrpc::new(Arc::new(PgBoardService::new(pool.clone(), allocator))).into_server();

    let listener = TcpListener::bind(config.addr).await?;
    tracing::info!(
        addr = %listener.local_addr()?,
        "boards-service v{} listening",
        env!("CARGO_PKG_VERSION")
    );

    serve("boards-service", service, listener, shutdown_signal()).await?;

    close_pool(pool).await;
    Ok(())
}

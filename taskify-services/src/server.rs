//! gRPC transport setup shared by both service binaries
//!
//! Every request passes through:
//!
//! ```text
//! SetRequestId (x-request-id, UUID when absent)
//!   -> Trace (span: request{service, req_id, method, path})
//!     -> generated service -> adapter -> use case
//! ```
//!
//! so service-side log lines carry the caller's `req_id`.

use anyhow::Context;
use std::convert::Infallible;
use std::future::Future;
use taskify_shared::correlation::RequestSpan;
use taskify_shared::db::{migrations::run_migrations, pool::create_pool};
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::body::BoxBody;
use tonic::codegen::http;
use tonic::server::NamedService;
use tonic::transport::Server;
use tower::{Service, ServiceBuilder};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServiceConfig;

/// Connects the pool and, if enabled, applies migrations.
pub async fn connect_database(config: &ServiceConfig) -> anyhow::Result<sqlx::PgPool> {
    let pool = create_pool(config.database.clone())
        .await
        .context("failed to connect to database")?;

    if config.run_migrations {
        run_migrations(&pool)
            .await
            .context("failed to run database migrations")?;
    }

    Ok(pool)
}

/// Serves one gRPC service on `listener` until `shutdown` resolves.
pub async fn serve<S, F>(
    service_name: &'static str,
    service: S,
    listener: TcpListener,
    shutdown: F,
) -> Result<(), tonic::transport::Error>
where
    S: Service<http::Request<BoxBody>, Response = http::Response<BoxBody>, Error = Infallible>
        + NamedService
        + Clone
        + Send
        + 'static,
    S::Future: Send + 'static,
    F: Future<Output = ()>,
{
    let layers = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_grpc().make_span_with(RequestSpan::new(service_name)))
        .layer(PropagateRequestIdLayer::x_request_id())
        .into_inner();

    Server::builder()
        .layer(layers)
        .add_service(service)
        .serve_with_incoming_shutdown(TcpListenerStream::new(listener), shutdown)
        .await
}

/// Resolves on Ctrl+C.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}

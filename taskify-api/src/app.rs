//! Application state and router builder
//!
//! # Example
//!
//! ```no_run
//! use taskify_api::app::{build_router, AppState, Gateways};
//! use taskify_api::config::Config;
//! use taskify_shared::db::pool::create_pool;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::from_env()?;
//! let pool = create_pool(config.database.clone()).await?;
//! let gateways = Gateways::from_config(&config, &pool)?;
//! let app = build_router(AppState::new(pool, config, gateways));
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

use crate::config::{Backend, Config};
use crate::error::ApiError;
use crate::gateway::{
    remote::lazy_channel, BoardsGateway, ColumnsGateway, LocalBoards, LocalColumns, LocalTasks,
    LocalUsers, RemoteBoards, RemoteUsers, TasksGateway, UsersGateway,
};
use crate::middleware::request_id::request_context;
use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use taskify_shared::correlation::{RequestSpan, REQUEST_ID_HEADER};
use taskify_shared::db::ordering::OrderingAllocator;
use taskify_shared::services::{
    MemoryStore, PgBoardService, PgColumnService, PgTaskService, PgUserService,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// One backend per entity group.
#[derive(Clone)]
pub struct Gateways {
    pub users: Arc<dyn UsersGateway>,
    pub boards: Arc<dyn BoardsGateway>,
    pub columns: Arc<dyn ColumnsGateway>,
    pub tasks: Arc<dyn TasksGateway>,
}

impl Gateways {
    /// Users and boards follow `USERS_BACKEND` / `BOARDS_BACKEND`; columns
    /// and tasks always use the database directly.
    ///
    /// Remote channels connect lazily, so a service that is down surfaces
    /// as a 500 on the first call instead of failing startup.
    pub fn from_config(config: &Config, pool: &PgPool) -> anyhow::Result<Self> {
        let allocator = OrderingAllocator::new(config.ordering_max_attempts);
        let backends = &config.backends;

        let users: Arc<dyn UsersGateway> = match backends.users {
            Backend::Remote => Arc::new(RemoteUsers::new(
                lazy_channel(&backends.users_url, backends.rpc_timeout)?,
                backends.rpc_timeout,
            )),
            Backend::Local => Arc::new(LocalUsers::new(Arc::new(PgUserService::new(pool.clone())))),
        };

        let boards: Arc<dyn BoardsGateway> = match backends.boards {
            Backend::Remote => Arc::new(RemoteBoards::new(
                lazy_channel(&backends.boards_url, backends.rpc_timeout)?,
                backends.rpc_timeout,
            )),
            Backend::Local => Arc::new(LocalBoards::new(Arc::new(PgBoardService::new(
                pool.clone(),
                allocator,
            )))),
        };

        tracing::info!(
            users = %backends.users,
            boards = %backends.boards,
            "Gateway backends configured"
        );

        Ok(Self {
            users,
            boards,
            columns: Arc::new(LocalColumns::new(Arc::new(PgColumnService::new(
                pool.clone(),
                allocator,
            )))),
            tasks: Arc::new(LocalTasks::new(Arc::new(PgTaskService::new(
                pool.clone(),
                allocator,
            )))),
        })
    }

    /// Every group served locally from one in-memory store.
    pub fn in_memory(store: &MemoryStore) -> Self {
        Self {
            users: Arc::new(LocalUsers::new(Arc::new(store.clone()))),
            boards: Arc::new(LocalBoards::new(Arc::new(store.clone()))),
            columns: Arc::new(LocalColumns::new(Arc::new(store.clone()))),
            tasks: Arc::new(LocalTasks::new(Arc::new(store.clone()))),
        }
    }
}

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    /// Used by the health check and the local-direct backends
    pub db: PgPool,

    pub config: Arc<Config>,

    pub users: Arc<dyn UsersGateway>,

    pub boards: Arc<dyn BoardsGateway>,

    pub columns: Arc<dyn ColumnsGateway>,

    pub tasks: Arc<dyn TasksGateway>,
}

impl AppState {
    pub fn new(db: PgPool, config: Config, gateways: Gateways) -> Self {
        Self {
            db,
            config: Arc::new(config),
            users: gateways.users,
            boards: gateways.boards,
            columns: gateways.columns,
            tasks: gateways.tasks,
        }
    }
}

/// Builds the router with all routes and middleware
///
/// ```text
/// /health
/// /api/users                          POST
/// /api/users/:user_id                 GET PUT DELETE
/// /api/users/:user_id/boards          GET POST
/// /api/users/:user_id/boards/:id      GET PUT DELETE
/// /api/boards/:board_id/columns       POST
/// /api/boards/:board_id/columns/:id   GET PUT DELETE
/// /api/columns/:column_id/tasks       POST
/// /api/columns/:column_id/tasks/:id   GET PUT DELETE
/// ```
///
/// Middleware, outermost first: request id generation, request context
/// (sanitize, extension, echo header), trace span, CORS.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let api_routes = Router::new()
        .route("/users", post(routes::users::create_user))
        .route(
            "/users/:user_id",
            get(routes::users::get_user)
                .put(routes::users::update_user)
                .delete(routes::users::delete_user),
        )
        .route(
            "/users/:user_id/boards",
            get(routes::boards::list_boards).post(routes::boards::create_board),
        )
        .route(
            "/users/:user_id/boards/:id",
            get(routes::boards::get_board)
                .put(routes::boards::update_board)
                .delete(routes::boards::delete_board),
        )
        .route("/boards/:board_id/columns", post(routes::columns::create_column))
        .route(
            "/boards/:board_id/columns/:id",
            get(routes::columns::get_column)
                .put(routes::columns::update_column)
                .delete(routes::columns::delete_column),
        )
        .route("/columns/:column_id/tasks", post(routes::tasks::create_task))
        .route(
            "/columns/:column_id/tasks/:id",
            get(routes::tasks::get_task)
                .put(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        );

    let cors = cors_layer(&state.config.api.cors_origins);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api", api_routes)
        .fallback(|| async { ApiError::NotFound("route not found".to_string()) })
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(axum::middleware::from_fn(request_context))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(RequestSpan::new("api-gateway"))
                        .on_response(DefaultOnResponse::new().level(Level::INFO)),
                )
                .layer(cors),
        )
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    if origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, request_id.clone()])
        .expose_headers([request_id])
        .max_age(std::time::Duration::from_secs(3600))
}

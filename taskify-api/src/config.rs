//! Configuration management for the API gateway
//!
//! # Environment Variables
//!
//! - `API_HOST`: Host to bind to (default: 0.0.0.0)
//! - `API_PORT`: Port to bind to (default: 3000)
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
//! - `USERS_SERVICE_URL`: users-service endpoint (default: http://127.0.0.1:50051)
//! - `BOARDS_SERVICE_URL`: boards-service endpoint (default: http://127.0.0.1:50052)
//! - `USERS_BACKEND` / `BOARDS_BACKEND`: `remote` or `local` (default: remote)
//! - `RPC_TIMEOUT_MS`: Deadline for each outbound RPC (default: 5000)
//! - `CORS_ORIGINS`: Comma-separated origins, `*` for any (default: *)
//! - `ORDERING_MAX_ATTEMPTS`: Position allocation attempts (default: 5)
//! - `RUN_MIGRATIONS`: Apply migrations on startup (default: true)
//! - `RUST_LOG`: Log filter (default: info for taskify crates)

use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use taskify_shared::db::ordering::DEFAULT_MAX_ATTEMPTS;
use taskify_shared::db::pool::DatabaseConfig;
use taskify_shared::env;

/// Complete gateway configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,

    pub database: DatabaseConfig,

    pub backends: BackendConfig,

    /// Attempts per create for boards, columns and tasks created locally
    pub ordering_max_attempts: u32,

    pub run_migrations: bool,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,

    pub port: u16,

    /// Allowed CORS origins; `*` allows any
    pub cors_origins: Vec<String>,
}

/// Where each entity group is served from.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub users: Backend,

    pub boards: Backend,

    pub users_url: String,

    pub boards_url: String,

    /// Deadline sent with every outbound RPC
    pub rpc_timeout: Duration,
}

/// Dispatch strategy for an entity group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Forward to the gRPC service
    Remote,

    /// Call the use case in-process against the database
    Local,
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "remote" => Ok(Backend::Remote),
            "local" => Ok(Backend::Local),
            other => Err(format!("unknown backend {other:?}, expected remote or local")),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Remote => write!(f, "remote"),
            Backend::Local => write!(f, "local"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                cors_origins: vec!["*".to_string()],
            },
            database: DatabaseConfig::default(),
            backends: BackendConfig {
                users: Backend::Remote,
                boards: Backend::Remote,
                users_url: "http://127.0.0.1:50051".to_string(),
                boards_url: "http://127.0.0.1:50052".to_string(),
                rpc_timeout: Duration::from_millis(5000),
            },
            ordering_max_attempts: DEFAULT_MAX_ATTEMPTS,
            run_migrations: true,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables, with `.env` support.
    ///
    /// # Errors
    ///
    /// Fails if `DATABASE_URL` is missing or any variable has an invalid
    /// value.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let cors_origins = std::env::var("CORS_ORIGINS")
            .map(|origins| split_origins(&origins))
            .unwrap_or(defaults.api.cors_origins);

        let rpc_timeout_ms = env::parse_or("RPC_TIMEOUT_MS", 5000u64)?;

        Ok(Self {
            api: ApiConfig {
                host: env::parse_or("API_HOST", defaults.api.host)?,
                port: env::parse_or("API_PORT", defaults.api.port)?,
                cors_origins,
            },
            database: DatabaseConfig {
                url: env::required("DATABASE_URL")?,
                max_connections: env::parse_or(
                    "DATABASE_MAX_CONNECTIONS",
                    defaults.database.max_connections,
                )?,
                ..defaults.database
            },
            backends: BackendConfig {
                users: env::parse_or("USERS_BACKEND", defaults.backends.users)?,
                boards: env::parse_or("BOARDS_BACKEND", defaults.backends.boards)?,
                users_url: env::parse_or("USERS_SERVICE_URL", defaults.backends.users_url)?,
                boards_url: env::parse_or("BOARDS_SERVICE_URL", defaults.backends.boards_url)?,
                rpc_timeout: Duration::from_millis(rpc_timeout_ms),
            },
            ordering_max_attempts: env::parse_or(
                "ORDERING_MAX_ATTEMPTS",
                defaults.ordering_max_attempts,
            )?,
            run_migrations: env::flag_or("RUN_MIGRATIONS", defaults.run_migrations)?,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

fn split_origins(origins: &str) -> Vec<String> {
    origins
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

//! Configuration for a service binary
//!
//! # Environment Variables
//!
//! - `USERS_SERVICE_ADDR` / `BOARDS_SERVICE_ADDR`: listen address
//!   (default `0.0.0.0:50051` / `0.0.0.0:50052`)
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `DATABASE_MAX_CONNECTIONS`: pool size (default: 10)
//! - `ORDERING_MAX_ATTEMPTS`: position allocation attempts (default: 5)
//! - `RUN_MIGRATIONS`: apply migrations on startup (default: true)

use std::net::SocketAddr;
use taskify_shared::db::ordering::DEFAULT_MAX_ATTEMPTS;
use taskify_shared::db::pool::DatabaseConfig;
use taskify_shared::env;

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address the gRPC server binds to
    pub addr: SocketAddr,

    pub database: DatabaseConfig,

    pub ordering_max_attempts: u32,

    pub run_migrations: bool,
}

impl ServiceConfig {
    /// Loads configuration, reading the listen address from `addr_var`.
    pub fn from_env(addr_var: &str, default_addr: SocketAddr) -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            addr: env::parse_or(addr_var, default_addr)?,
            database: DatabaseConfig {
                url: env::required("DATABASE_URL")?,
                max_connections: env::parse_or("DATABASE_MAX_CONNECTIONS", 10)?,
                ..Default::default()
            },
            ordering_max_attempts: env::parse_or("ORDERING_MAX_ATTEMPTS", DEFAULT_MAX_ATTEMPTS)?,
            run_migrations: env::flag_or("RUN_MIGRATIONS", true)?,
        })
    }
}

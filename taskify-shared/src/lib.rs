//! # Taskify Shared Library
//!
//! Types and business logic shared by the API gateway and the gRPC services.
//!
//! ## Module Organization
//!
//! - `correlation`: request ids, outbound RPC metadata, per-request spans
//! - `db`: connection pool, migrations, position allocation
//! - `env`: typed environment variable lookups
//! - `error`: domain error taxonomy
//! - `models`: database models and CRUD
//! - `password`: Argon2id hashing
//! - `proto`: generated gRPC types
//! - `services`: use-case traits with PostgreSQL and in-memory backends
//! - `telemetry`: tracing subscriber setup

pub mod correlation;
pub mod db;
pub mod env;
pub mod error;
pub mod models;
pub mod password;
pub mod proto;
pub mod services;
pub mod telemetry;

pub use error::{DomainError, DomainResult};

/// Current version of the Taskify shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

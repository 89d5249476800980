//! Database layer
//!
//! - `pool`: PostgreSQL connection pool with a startup health check
//! - `migrations`: embedded sqlx migrations from the workspace `migrations/`
//! - `ordering`: server-side position allocation for boards, columns and tasks
//!
//! Entity CRUD lives in `crate::models`.

pub mod migrations;
pub mod ordering;
pub mod pool;

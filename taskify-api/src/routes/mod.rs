//! API route handlers, one module per resource:
//!
//! - `health`: health check endpoint
//! - `users`: user CRUD
//! - `boards`: boards owned by a user
//! - `columns`: columns of a board
//! - `tasks`: tasks of a column

pub mod boards;
pub mod columns;
pub mod health;
pub mod tasks;
pub mod users;

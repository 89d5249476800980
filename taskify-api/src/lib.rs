//! # Taskify API Gateway Library
//!
//! REST surface for users, boards, columns and tasks.
//!
//! ## Modules
//!
//! - `app`: application state and router builder
//! - `config`: configuration management
//! - `error`: error handling and HTTP response mapping
//! - `extract`: extractors whose rejections use the JSON error body
//! - `gateway`: per-entity-group backends (remote-proxy or local-direct)
//! - `middleware`: request correlation
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod gateway;
pub mod middleware;
pub mod routes;

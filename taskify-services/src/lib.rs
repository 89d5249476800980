//! # Taskify gRPC Services
//!
//! The users and boards services. Each runs as its own binary
//! (`users-service`, `boards-service`) on top of the use cases in
//! `taskify_shared::services`.
//!
//! ## Module Organization
//!
//! - `config`: environment configuration for a service binary
//! - `grpc`: tonic adapters implementing the generated server traits
//! - `server`: transport setup (request ids, request spans, shutdown)
//! - `status`: domain error to `tonic::Status` mapping

pub mod config;
pub mod grpc;
pub mod server;
pub mod status;

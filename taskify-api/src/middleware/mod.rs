//! Middleware for the API gateway
//!
//! - `request_id`: correlation id sanitizing, request context, echo header

pub mod request_id;

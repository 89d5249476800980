//! Extractors with JSON error bodies
//!
//! axum's own `Path` and `Json` reject with plain text. These wrappers route
//! the rejection through [`ApiError`], so a non-numeric id or a malformed
//! body yields `400 {"error": ...}` before any backend is called.

use crate::error::ApiError;
use axum::extract::{FromRequest, FromRequestParts};

/// Path parameters, e.g. `ApiPath((user_id, id)): ApiPath<(i64, i64)>`.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// JSON request body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

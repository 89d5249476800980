//! User endpoints
//!
//! - `POST /api/users` - Create user
//! - `GET /api/users/:user_id` - Fetch user
//! - `PUT /api/users/:user_id` - Replace email and username, optionally the password
//! - `DELETE /api/users/:user_id` - Delete user and everything they own
//!
//! Responses never include the password hash.

use crate::{
    app::AppState,
    error::{validate_request, ApiResult},
    extract::{ApiJson, ApiPath},
};
use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use taskify_shared::correlation::RequestContext;
use taskify_shared::models::user::UserProfile;
use taskify_shared::services::{NewUser, UserChanges};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,

    #[validate(length(min = 1, max = 64, message = "must be 1-64 characters"))]
    pub username: String,

    #[validate(length(min = 6, message = "must be at least 6 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,

    #[validate(length(min = 1, max = 64, message = "must be 1-64 characters"))]
    pub username: String,

    /// Omitted keeps the current password
    #[serde(default)]
    #[validate(length(min = 6, message = "must be at least 6 characters"))]
    pub password: Option<String>,
}

/// Create user
///
/// ```text
/// POST /api/users
/// {"email": "ada@example.com", "username": "ada", "password": "secret-password"}
/// ```
///
/// `201 Created` with `{"id": 1, "email": "ada@example.com", "username": "ada"}`.
///
/// # Errors
///
/// - `400 Bad Request`: malformed body or validation failed
/// - `409 Conflict`: email already registered
pub async fn create_user(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiJson(req): ApiJson<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserProfile>)> {
    validate_request(&req)?;

    let user = state
        .users
        .create(
            &ctx,
            NewUser {
                email: req.email,
                username: req.username,
                password: req.password,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn get_user(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(user_id): ApiPath<i64>,
) -> ApiResult<Json<UserProfile>> {
    let user = state.users.get(&ctx, user_id).await?;
    Ok(Json(user))
}

pub async fn update_user(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(user_id): ApiPath<i64>,
    ApiJson(req): ApiJson<UpdateUserRequest>,
) -> ApiResult<Json<UserProfile>> {
    validate_request(&req)?;

    let user = state
        .users
        .update(
            &ctx,
            user_id,
            UserChanges {
                email: req.email,
                username: req.username,
                password: req.password,
            },
        )
        .await?;

    Ok(Json(user))
}

/// `204 No Content`; a second delete is `404`.
pub async fn delete_user(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(user_id): ApiPath<i64>,
) -> ApiResult<StatusCode> {
    state.users.delete(&ctx, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

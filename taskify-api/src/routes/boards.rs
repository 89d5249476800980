//! Board endpoints, scoped by owner
//!
//! - `GET /api/users/:user_id/boards` - List boards in position order
//! - `POST /api/users/:user_id/boards` - Create board at the next position
//! - `GET /api/users/:user_id/boards/:id` - Fetch board
//! - `PUT /api/users/:user_id/boards/:id` - Replace name and description
//! - `DELETE /api/users/:user_id/boards/:id` - Delete board with its columns and tasks
//!
//! A board that belongs to another user is reported as not found.

use crate::{
    app::AppState,
    error::{validate_request, ApiResult},
    extract::{ApiJson, ApiPath},
};
use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use taskify_shared::correlation::RequestContext;
use taskify_shared::models::board::{Board, CreateBoard, UpdateBoard};
use validator::Validate;

/// Body of both create and update.
#[derive(Debug, Deserialize, Validate)]
pub struct BoardRequest {
    #[validate(length(min = 1, max = 255, message = "must be 1-255 characters"))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 4096, message = "must be at most 4096 characters"))]
    pub description: String,
}

/// Create board
///
/// ```text
/// POST /api/users/2/boards
/// {"name": "Deposit", "description": "Deposit feature development"}
/// ```
///
/// `201 Created` with the stored board, including its position.
///
/// # Errors
///
/// - `400 Bad Request`: malformed path or body, or a blank name
/// - `404 Not Found`: the user does not exist
pub async fn create_board(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(user_id): ApiPath<i64>,
    ApiJson(req): ApiJson<BoardRequest>,
) -> ApiResult<(StatusCode, Json<Board>)> {
    validate_request(&req)?;

    let board = state
        .boards
        .create(
            &ctx,
            CreateBoard {
                user_id,
                name: req.name,
                description: req.description,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(board)))
}

/// List boards
///
/// `200 OK` with the owner's boards, lowest position first. An unknown user
/// has an empty list.
pub async fn list_boards(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(user_id): ApiPath<i64>,
) -> ApiResult<Json<Vec<Board>>> {
    let boards = state.boards.list(&ctx, user_id).await?;
    Ok(Json(boards))
}

pub async fn get_board(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath((user_id, id)): ApiPath<(i64, i64)>,
) -> ApiResult<Json<Board>> {
    let board = state.boards.get(&ctx, user_id, id).await?;
    Ok(Json(board))
}

pub async fn update_board(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath((user_id, id)): ApiPath<(i64, i64)>,
    ApiJson(req): ApiJson<BoardRequest>,
) -> ApiResult<Json<Board>> {
    validate_request(&req)?;

    let board = state
        .boards
        .update(
            &ctx,
            user_id,
            id,
            UpdateBoard {
                name: req.name,
                description: req.description,
            },
        )
        .await?;

    Ok(Json(board))
}

pub async fn delete_board(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath((user_id, id)): ApiPath<(i64, i64)>,
) -> ApiResult<StatusCode> {
    state.boards.delete(&ctx, user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

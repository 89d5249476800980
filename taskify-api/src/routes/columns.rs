//! Column endpoints, scoped by board
//!
//! - `POST /api/boards/:board_id/columns` - Create column at the next position
//! - `GET /api/boards/:board_id/columns/:id` - Fetch column
//! - `PUT /api/boards/:board_id/columns/:id` - Rename column
//! - `DELETE /api/boards/:board_id/columns/:id` - Delete column with its tasks

use crate::{
    app::AppState,
    error::{validate_request, ApiResult},
    extract::{ApiJson, ApiPath},
};
use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use taskify_shared::correlation::RequestContext;
use taskify_shared::models::column::{Column, CreateColumn, UpdateColumn};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct ColumnRequest {
    #[validate(length(min = 1, max = 255, message = "must be 1-255 characters"))]
    pub name: String,
}

pub async fn create_column(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(board_id): ApiPath<i64>,
    ApiJson(req): ApiJson<ColumnRequest>,
) -> ApiResult<(StatusCode, Json<Column>)> {
    validate_request(&req)?;

    let column = state
        .columns
        .create(
            &ctx,
            CreateColumn {
                board_id,
                name: req.name,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(column)))
}

pub async fn get_column(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath((board_id, id)): ApiPath<(i64, i64)>,
) -> ApiResult<Json<Column>> {
    Ok(Json(state.columns.get(&ctx, board_id, id).await?))
}

pub async fn update_column(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath((board_id, id)): ApiPath<(i64, i64)>,
    ApiJson(req): ApiJson<ColumnRequest>,
) -> ApiResult<Json<Column>> {
    validate_request(&req)?;

    let column = state
        .columns
        .update(&ctx, board_id, id, UpdateColumn { name: req.name })
        .await?;

    Ok(Json(column))
}

pub async fn delete_column(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath((board_id, id)): ApiPath<(i64, i64)>,
) -> ApiResult<StatusCode> {
    state.columns.delete(&ctx, board_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

//! Task endpoints, scoped by column
//!
//! - `POST /api/columns/:column_id/tasks` - Create task at the next position
//! - `GET /api/columns/:column_id/tasks/:id` - Fetch task
//! - `PUT /api/columns/:column_id/tasks/:id` - Replace title, description and assignee
//! - `DELETE /api/columns/:column_id/tasks/:id` - Delete task

use crate::{
    app::AppState,
    error::{validate_request, ApiResult},
    extract::{ApiJson, ApiPath},
};
use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use taskify_shared::correlation::RequestContext;
use taskify_shared::models::task::{CreateTask, Task, UpdateTask};
use validator::Validate;

/// Body of both create and update.
#[derive(Debug, Deserialize, Validate)]
pub struct TaskRequest {
    #[validate(length(min = 1, max = 255, message = "must be 1-255 characters"))]
    pub title: String,

    #[serde(default)]
    #[validate(length(max = 4096, message = "must be at most 4096 characters"))]
    pub description: String,

    /// User the task is assigned to; `null` or omitted for none
    #[serde(default)]
    pub assignee_id: Option<i64>,
}

/// Create task
///
/// ```text
/// POST /api/columns/3/tasks
/// {"title": "Write tests", "assignee_id": 2}
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: malformed path or body, or a blank title
/// - `404 Not Found`: the column or the assignee does not exist
pub async fn create_task(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath(column_id): ApiPath<i64>,
    ApiJson(req): ApiJson<TaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    validate_request(&req)?;

    let task = state
        .tasks
        .create(
            &ctx,
            CreateTask {
                column_id,
                title: req.title,
                description: req.description,
                assignee_id: req.assignee_id,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn get_task(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath((column_id, id)): ApiPath<(i64, i64)>,
) -> ApiResult<Json<Task>> {
    Ok(Json(state.tasks.get(&ctx, column_id, id).await?))
}

pub async fn update_task(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath((column_id, id)): ApiPath<(i64, i64)>,
    ApiJson(req): ApiJson<TaskRequest>,
) -> ApiResult<Json<Task>> {
    validate_request(&req)?;

    let task = state
        .tasks
        .update(
            &ctx,
            column_id,
            id,
            UpdateTask {
                title: req.title,
                description: req.description,
                assignee_id: req.assignee_id,
            },
        )
        .await?;

    Ok(Json(task))
}

pub async fn delete_task(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiPath((column_id, id)): ApiPath<(i64, i64)>,
) -> ApiResult<StatusCode> {
    state.tasks.delete(&ctx, column_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

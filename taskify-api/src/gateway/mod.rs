//! Gateway dispatch
//!
//! One trait per entity group. Route handlers only see `Arc<dyn ...Gateway>`
//! and never learn which strategy serves the group:
//!
//! - remote-proxy ([`remote`]): forward to the gRPC service, carrying the
//!   correlation id and a per-call deadline; status codes map to HTTP
//! - local-direct ([`local`]): call the use case in-process; domain errors
//!   map to HTTP
//!
//! Users and boards are remote by default and can be switched to local with
//! `USERS_BACKEND` / `BOARDS_BACKEND`. Columns and tasks are always local.

pub mod local;
pub mod remote;

use crate::error::ApiResult;
use async_trait::async_trait;
use taskify_shared::correlation::RequestContext;
use taskify_shared::models::board::{Board, CreateBoard, UpdateBoard};
use taskify_shared::models::column::{Column, CreateColumn, UpdateColumn};
use taskify_shared::models::task::{CreateTask, Task, UpdateTask};
use taskify_shared::models::user::UserProfile;
use taskify_shared::services::{NewUser, UserChanges};

pub use local::{LocalBoards, LocalColumns, LocalTasks, LocalUsers};
pub use remote::{RemoteBoards, RemoteUsers};

#[async_trait]
pub trait UsersGateway: Send + Sync {
    async fn create(&self, ctx: &RequestContext, input: NewUser) -> ApiResult<UserProfile>;

    async fn get(&self, ctx: &RequestContext, id: i64) -> ApiResult<UserProfile>;

    async fn update(
        &self,
        ctx: &RequestContext,
        id: i64,
        changes: UserChanges,
    ) -> ApiResult<UserProfile>;

    async fn delete(&self, ctx: &RequestContext, id: i64) -> ApiResult<()>;
}

/// Boards are addressed by `(user_id, id)`.
#[async_trait]
pub trait BoardsGateway: Send + Sync {
    async fn create(&self, ctx: &RequestContext, input: CreateBoard) -> ApiResult<Board>;

    async fn get(&self, ctx: &RequestContext, user_id: i64, id: i64) -> ApiResult<Board>;

    /// Owner's boards, lowest position first.
    async fn list(&self, ctx: &RequestContext, user_id: i64) -> ApiResult<Vec<Board>>;

    async fn update(
        &self,
        ctx: &RequestContext,
        user_id: i64,
        id: i64,
        changes: UpdateBoard,
    ) -> ApiResult<Board>;

    async fn delete(&self, ctx: &RequestContext, user_id: i64, id: i64) -> ApiResult<()>;
}

/// Columns are addressed by `(board_id, id)`.
#[async_trait]
pub trait ColumnsGateway: Send + Sync {
    async fn create(&self, ctx: &RequestContext, input: CreateColumn) -> ApiResult<Column>;

    async fn get(&self, ctx: &RequestContext, board_id: i64, id: i64) -> ApiResult<Column>;

    async fn update(
        &self,
        ctx: &RequestContext,
        board_id: i64,
        id: i64,
        changes: UpdateColumn,
    ) -> ApiResult<Column>;

    async fn delete(&self, ctx: &RequestContext, board_id: i64, id: i64) -> ApiResult<()>;
}

/// Tasks are addressed by `(column_id, id)`.
#[async_trait]
pub trait TasksGateway: Send + Sync {
    async fn create(&self, ctx: &RequestContext, input: CreateTask) -> ApiResult<Task>;

    async fn get(&self, ctx: &RequestContext, column_id: i64, id: i64) -> ApiResult<Task>;

    async fn update(
        &self,
        ctx: &RequestContext,
        column_id: i64,
        id: i64,
        changes: UpdateTask,
    ) -> ApiResult<Task>;

    async fn delete(&self, ctx: &RequestContext, column_id: i64, id: i64) -> ApiResult<()>;
}

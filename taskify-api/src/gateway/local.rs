//! Local-direct backends: in-process use cases, domain errors mapped
//! straight to HTTP.

use super::{BoardsGateway, ColumnsGateway, TasksGateway, UsersGateway};
use crate::error::ApiResult;
use async_trait::async_trait;
use std::sync::Arc;
use taskify_shared::correlation::RequestContext;
use taskify_shared::models::board::{Board, CreateBoard, UpdateBoard};
use taskify_shared::models::column::{Column, CreateColumn, UpdateColumn};
use taskify_shared::models::task::{CreateTask, Task, UpdateTask};
use taskify_shared::models::user::UserProfile;
use taskify_shared::services::{
    BoardService, ColumnService, NewUser, TaskService, UserChanges, UserService,
};

pub struct LocalUsers {
    service: Arc<dyn UserService>,
}

impl LocalUsers {
    pub fn new(service: Arc<dyn UserService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl UsersGateway for LocalUsers {
    async fn create(&self, _ctx: &RequestContext, input: NewUser) -> ApiResult<UserProfile> {
        Ok(self.service.create_user(input).await?)
    }

    async fn get(&self, _ctx: &RequestContext, id: i64) -> ApiResult<UserProfile> {
        Ok(self.service.get_user(id).await?)
    }

    async fn update(
        &self,
        _ctx: &RequestContext,
        id: i64,
        changes: UserChanges,
    ) -> ApiResult<UserProfile> {
        Ok(self.service.update_user(id, changes).await?)
    }

    async fn delete(&self, _ctx: &RequestContext, id: i64) -> ApiResult<()> {
        Ok(self.service.delete_user(id).await?)
    }
}

pub struct LocalBoards {
    service: Arc<dyn BoardService>,
}

impl LocalBoards {
    pub fn new(service: Arc<dyn BoardService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl BoardsGateway for LocalBoards {
    async fn create(&self, _ctx: &RequestContext, input: CreateBoard) -> ApiResult<Board> {
        Ok(self.service.create_board(input).await?)
    }

    async fn get(&self, _ctx: &RequestContext, user_id: i64, id: i64) -> ApiResult<Board> {
        Ok(self.service.get_board(user_id, id).await?)
    }

    async fn list(&self, _ctx: &RequestContext, user_id: i64) -> ApiResult<Vec<Board>> {
        Ok(self.service.list_boards(user_id).await?)
    }

    async fn update(
        &self,
        _ctx: &RequestContext,
        user_id: i64,
        id: i64,
        changes: UpdateBoard,
    ) -> ApiResult<Board> {
        Ok(self.service.update_board(user_id, id, changes).await?)
    }

    async fn delete(&self, _ctx: &RequestContext, user_id: i64, id: i64) -> ApiResult<()> {
        Ok(self.service.delete_board(user_id, id).await?)
    }
}

pub struct LocalColumns {
    service: Arc<dyn ColumnService>,
}

impl LocalColumns {
    pub fn new(service: Arc<dyn ColumnService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl ColumnsGateway for LocalColumns {
    async fn create(&self, _ctx: &RequestContext, input: CreateColumn) -> ApiResult<Column> {
        Ok(self.service.create_column(input).await?)
    }

    async fn get(&self, _ctx: &RequestContext, board_id: i64, id: i64) -> ApiResult<Column> {
        Ok(self.service.get_column(board_id, id).await?)
    }

    async fn update(
        &self,
        _ctx: &RequestContext,
        board_id: i64,
        id: i64,
        changes: UpdateColumn,
    ) -> ApiResult<Column> {
        Ok(self.service.update_column(board_id, id, changes).await?)
    }

    async fn delete(&self, _ctx: &RequestContext, board_id: i64, id: i64) -> ApiResult<()> {
        Ok(self.service.delete_column(board_id, id).await?)
    }
}

pub struct LocalTasks {
    service: Arc<dyn TaskService>,
}

impl LocalTasks {
    pub fn new(service: Arc<dyn TaskService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl TasksGateway for LocalTasks {
    async fn create(&self, _ctx: &RequestContext, input: CreateTask) -> ApiResult<Task> {
        Ok(self.service.create_task(input).await?)
    }

    async fn get(&self, _ctx: &RequestContext, column_id: i64, id: i64) -> ApiResult<Task> {
        Ok(self.service.get_task(column_id, id).await?)
    }

    async fn update(
        &self,
        _ctx: &RequestContext,
        column_id: i64,
        id: i64,
        changes: UpdateTask,
    ) -> ApiResult<Task> {
        Ok(self.service.update_task(column_id, id, changes).await?)
    }

    async fn delete(&self, _ctx: &RequestContext, column_id: i64, id: i64) -> ApiResult<()> {
        Ok(self.service.delete_task(column_id, id).await?)
    }
}

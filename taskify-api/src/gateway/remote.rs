//! Remote-proxy backends
//!
//! Each call wraps the message with [`RequestContext::outbound`] (which adds
//! `x-request-id` metadata) and a `grpc-timeout` deadline. A non-OK status
//! becomes an [`ApiError`] through `From<tonic::Status>`.
//!
//! Dropping the handler future (client went away) drops the RPC future,
//! which resets the HTTP/2 stream.

use super::{BoardsGateway, UsersGateway};
use crate::error::{ApiError, ApiResult};
use async_trait::async_trait;
use std::time::Duration;
use taskify_shared::correlation::RequestContext;
use taskify_shared::models::board::{Board, CreateBoard, UpdateBoard};
use taskify_shared::models::user::UserProfile;
use taskify_shared::proto::boards::boards_service_client::BoardsServiceClient;
use taskify_shared::proto::boards::{
    CreateBoardRequest, DeleteBoardRequest, GetBoardRequest, ListBoardsRequest,
    UpdateBoardRequest,
};
use taskify_shared::proto::users::users_service_client::UsersServiceClient;
use taskify_shared::proto::users::{
    CreateUserRequest, DeleteUserRequest, GetUserRequest, UpdateUserRequest,
};
use taskify_shared::services::{NewUser, UserChanges};
use tonic::transport::{Channel, Endpoint};

/// Lazily connected channel; the first call opens the connection.
pub fn lazy_channel(url: &str, timeout: Duration) -> ApiResult<Channel> {
    let endpoint = Endpoint::from_shared(url.to_string())
        .map_err(|e| ApiError::InternalError(format!("invalid service url {url}: {e}")))?;

    Ok(endpoint.connect_timeout(timeout).connect_lazy())
}

fn with_deadline<T>(ctx: &RequestContext, message: T, timeout: Duration) -> tonic::Request<T> {
    let mut request = ctx.outbound(message);
    request.set_timeout(timeout);
    request
}

fn missing(field: &str) -> ApiError {
    ApiError::InternalError(format!("rpc response is missing `{field}`"))
}

#[derive(Clone)]
pub struct RemoteUsers {
    client: UsersServiceClient<Channel>,
    timeout: Duration,
}

impl RemoteUsers {
    pub fn new(channel: Channel, timeout: Duration) -> Self {
        Self {
            client: UsersServiceClient::new(channel),
            timeout,
        }
    }
}

#[async_trait]
impl UsersGateway for RemoteUsers {
    async fn create(&self, ctx: &RequestContext, input: NewUser) -> ApiResult<UserProfile> {
        let request = CreateUserRequest {
            email: input.email,
            username: input.username,
            password: input.password,
        };

        let response = self
            .client
            .clone()
            .create_user(with_deadline(ctx, request, self.timeout))
            .await?;

        response
            .into_inner()
            .user
            .map(UserProfile::from)
            .ok_or_else(|| missing("user"))
    }

    async fn get(&self, ctx: &RequestContext, id: i64) -> ApiResult<UserProfile> {
        let response = self
            .client
            .clone()
            .get_user_by_id(with_deadline(ctx, GetUserRequest { id }, self.timeout))
            .await?;

        response
            .into_inner()
            .user
            .map(UserProfile::from)
            .ok_or_else(|| missing("user"))
    }

    async fn update(
        &self,
        ctx: &RequestContext,
        id: i64,
        changes: UserChanges,
    ) -> ApiResult<UserProfile> {
        let request = UpdateUserRequest {
            id,
            email: changes.email,
            username: changes.username,
            password: changes.password,
        };

        let response = self
            .client
            .clone()
            .update_user(with_deadline(ctx, request, self.timeout))
            .await?;

        response
            .into_inner()
            .user
            .map(UserProfile::from)
            .ok_or_else(|| missing("user"))
    }

    async fn delete(&self, ctx: &RequestContext, id: i64) -> ApiResult<()> {
        self.client
            .clone()
            .delete_user(with_deadline(ctx, DeleteUserRequest { id }, self.timeout))
            .await?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct RemoteBoards {
    client: BoardsServiceClient<Channel>,
    timeout: Duration,
}

impl RemoteBoards {
    pub fn new(channel: Channel, timeout: Duration) -> Self {
        Self {
            client: BoardsServiceClient::new(channel),
            timeout,
        }
    }
}

#[async_trait]
impl BoardsGateway for RemoteBoards {
    async fn create(&self, ctx: &RequestContext, input: CreateBoard) -> ApiResult<Board> {
        let request = CreateBoardRequest {
            user_id: input.user_id,
            name: input.name,
            description: input.description,
        };

        tracing::debug!(user_id = request.user_id, "forwarding CreateBoard");
        let response = self
            .client
            .clone()
            .create_board(with_deadline(ctx, request, self.timeout))
            .await?;

        response
            .into_inner()
            .board
            .map(Board::from)
            .ok_or_else(|| missing("board"))
    }

    async fn get(&self, ctx: &RequestContext, user_id: i64, id: i64) -> ApiResult<Board> {
        tracing::debug!(user_id, board_id = id, "forwarding GetBoardByID");
        let response = self
            .client
            .clone()
            .get_board_by_id(with_deadline(ctx, GetBoardRequest { user_id, id }, self.timeout))
            .await?;

        response
            .into_inner()
            .board
            .map(Board::from)
            .ok_or_else(|| missing("board"))
    }

    async fn list(&self, ctx: &RequestContext, user_id: i64) -> ApiResult<Vec<Board>> {
        tracing::debug!(user_id, "forwarding ListBoards");
        let response = self
            .client
            .clone()
            .list_boards(with_deadline(ctx, ListBoardsRequest { user_id }, self.timeout))
            .await?;

        Ok(response.into_inner().boards.into_iter().map(Board::from).collect())
    }

    async fn update(
        &self,
        ctx: &RequestContext,
        user_id: i64,
        id: i64,
        changes: UpdateBoard,
    ) -> ApiResult<Board> {
        let request = UpdateBoardRequest {
            user_id,
            id,
            name: changes.name,
            description: changes.description,
        };

        tracing::debug!(user_id, board_id = id, "forwarding UpdateBoard");
        let response = self
            .client
            .clone()
            .update_board(with_deadline(ctx, request, self.timeout))
            .await?;

        response
            .into_inner()
            .board
            .map(Board::from)
            .ok_or_else(|| missing("board"))
    }

    async fn delete(&self, ctx: &RequestContext, user_id: i64, id: i64) -> ApiResult<()> {
        tracing::debug!(user_id, board_id = id, "forwarding DeleteBoard");
        self.client
            .clone()
            .delete_board(with_deadline(ctx, DeleteBoardRequest { user_id, id }, self.timeout))
            .await?;
        Ok(())
    }
}

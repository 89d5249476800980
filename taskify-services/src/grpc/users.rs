//! `taskify.users.v1.UsersService`

use crate::status::into_status;
use std::sync::Arc;
use taskify_shared::proto::users::users_service_server::{UsersService, UsersServiceServer};
use taskify_shared::proto::users::{
    CreateUserRequest, CreateUserResponse, DeleteUserRequest, DeleteUserResponse, GetUserRequest,
    GetUserResponse, UpdateUserRequest, UpdateUserResponse,
};
use taskify_shared::services::{NewUser, UserChanges, UserService};
use tonic::{Request, Response, Status};

pub struct UsersGrpc {
    service: Arc<dyn UserService>,
}

impl UsersGrpc {
    pub fn new(service: Arc<dyn UserService>) -> Self {
        Self { service }
    }

    pub fn into_server(self) -> UsersServiceServer<Self> {
        UsersServiceServer::new(self)
    }
}

#[tonic::async_trait]
impl UsersService for UsersGrpc {
    async fn create_user(
        &self,
        request: Request<CreateUserRequest>,
    ) -> Result<Response<CreateUserResponse>, Status> {
        let req = request.into_inner();
        tracing::debug!("CreateUser called");

        let user = self
            .service
            .create_user(NewUser {
                email: req.email,
                username: req.username,
                password: req.password,
            })
            .await
            .map_err(into_status)?;

        Ok(Response::new(CreateUserResponse {
            user: Some(user.into()),
        }))
    }

    async fn get_user_by_id(
        &self,
        request: Request<GetUserRequest>,
    ) -> Result<Response<GetUserResponse>, Status> {
        let id = request.into_inner().id;
        tracing::debug!(user_id = id, "GetUserByID called");

        let user = self.service.get_user(id).await.map_err(into_status)?;

        Ok(Response::new(GetUserResponse {
            user: Some(user.into()),
        }))
    }

    async fn update_user(
        &self,
        request: Request<UpdateUserRequest>,
    ) -> Result<Response<UpdateUserResponse>, Status> {
        let req = request.into_inner();
        tracing::debug!(user_id = req.id, "UpdateUser called");

        let user = self
            .service
            .update_user(
                req.id,
                UserChanges {
                    email: req.email,
                    username: req.username,
                    password: req.password,
                },
            )
            .await
            .map_err(into_status)?;

        Ok(Response::new(UpdateUserResponse {
            user: Some(user.into()),
        }))
    }

    async fn delete_user(
        &self,
        request: Request<DeleteUserRequest>,
    ) -> Result<Response<DeleteUserResponse>, Status> {
        let id = request.into_inner().id;
        tracing::debug!(user_id = id, "DeleteUser called");

        self.service.delete_user(id).await.map_err(into_status)?;

        Ok(Response::new(DeleteUserResponse {}))
    }
}

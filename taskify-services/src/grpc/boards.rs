//! `taskify.boards.v1.BoardsService`

use crate::status::into_status;
use std::sync::Arc;
use taskify_shared::models::board::{CreateBoard, UpdateBoard};
use taskify_shared::proto::boards::boards_service_server::{BoardsService, BoardsServiceServer};
use taskify_shared::proto::boards::{
    CreateBoardRequest, CreateBoardResponse, DeleteBoardRequest, DeleteBoardResponse,
    GetBoardRequest, GetBoardResponse, ListBoardsRequest, ListBoardsResponse, UpdateBoardRequest,
    UpdateBoardResponse,
};
use taskify_shared::services::BoardService;
use tonic::{Request, Response, Status};

pub struct BoardsGrpc {
    service: Arc<dyn BoardService>,
}

impl BoardsGrpc {
    pub fn new(service: Arc<dyn BoardService>) -> Self {
        Self { service }
    }

    pub fn into_server(self) -> BoardsServiceServer<Self> {
        BoardsServiceServer::new(self)
    }
}

#[tonic::async_trait]
impl BoardsService for BoardsGrpc {
    async fn create_board(
        &self,
        request: Request<CreateBoardRequest>,
    ) -> Result<Response<CreateBoardResponse>, Status> {
        let req = request.into_inner();
        tracing::info!(user_id = req.user_id, "CreateBoard called");

        let board = self
            .service
            .create_board(CreateBoard {
                user_id: req.user_id,
                name: req.name,
                description: req.description,
            })
            .await
            .map_err(into_status)?;

        Ok(Response::new(CreateBoardResponse {
            board: Some(board.into()),
        }))
    }

    async fn get_board_by_id(
        &self,
        request: Request<GetBoardRequest>,
    ) -> Result<Response<GetBoardResponse>, Status> {
        let req = request.into_inner();
        tracing::info!(user_id = req.user_id, board_id = req.id, "GetBoardByID called");

        let board = self
            .service
            .get_board(req.user_id, req.id)
            .await
            .map_err(into_status)?;

        Ok(Response::new(GetBoardResponse {
            board: Some(board.into()),
        }))
    }

    async fn list_boards(
        &self,
        request: Request<ListBoardsRequest>,
    ) -> Result<Response<ListBoardsResponse>, Status> {
        let req = request.into_inner();
        tracing::info!(user_id = req.user_id, "ListBoards called");

        let boards = self
            .service
            .list_boards(req.user_id)
            .await
            .map_err(into_status)?;

        Ok(Response::new(ListBoardsResponse {
            boards: boards.into_iter().map(Into::into).collect(),
        }))
    }

    async fn update_board(
        &self,
        request: Request<UpdateBoardRequest>,
    ) -> Result<Response<UpdateBoardResponse>, Status> {
        let req = request.into_inner();
        tracing::info!(user_id = req.user_id, board_id = req.id, "UpdateBoard called");

        let board = self
            .service
            .update_board(
                req.user_id,
                req.id,
                UpdateBoard {
                    name: req.name,
                    description: req.description,
                },
            )
            .await
            .map_err(into_status)?;

        Ok(Response::new(UpdateBoardResponse {
            board: Some(board.into()),
        }))
    }

    async fn delete_board(
        &self,
        request: Request<DeleteBoardRequest>,
    ) -> Result<Response<DeleteBoardResponse>, Status> {
        let req = request.into_inner();
        tracing::info!(user_id = req.user_id, board_id = req.id, "DeleteBoard called");

        self.service
            .delete_board(req.user_id, req.id)
            .await
            .map_err(into_status)?;

        Ok(Response::new(DeleteBoardResponse {}))
    }
}

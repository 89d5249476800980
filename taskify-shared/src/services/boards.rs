//! Boards use case

use crate::db::ordering::OrderingAllocator;
use crate::error::{DomainError, DomainResult};
use crate::models::board::{Board, CreateBoard, UpdateBoard};
use async_trait::async_trait;
use sqlx::PgPool;

#[async_trait]
pub trait BoardService: Send + Sync {
    /// Creates a board at the owner's next position.
    async fn create_board(&self, input: CreateBoard) -> DomainResult<Board>;

    async fn get_board(&self, user_id: i64, id: i64) -> DomainResult<Board>;

    /// Boards of one owner ordered by position. An unknown owner has none.
    async fn list_boards(&self, user_id: i64) -> DomainResult<Vec<Board>>;

    async fn update_board(&self, user_id: i64, id: i64, changes: UpdateBoard)
        -> DomainResult<Board>;

    async fn delete_board(&self, user_id: i64, id: i64) -> DomainResult<()>;
}

#[derive(Debug, Clone)]
pub struct PgBoardService {
    pool: PgPool,
    allocator: OrderingAllocator,
}

impl PgBoardService {
    pub fn new(pool: PgPool, allocator: OrderingAllocator) -> Self {
        Self { pool, allocator }
    }
}

#[async_trait]
impl BoardService for PgBoardService {
    async fn create_board(&self, input: CreateBoard) -> DomainResult<Board> {
        let input = input.validated()?;
        let board = Board::create(&self.pool, &self.allocator, &input).await?;

        tracing::info!(
            board_id = board.id,
            user_id = board.user_id,
            position = board.position,
            "board created"
        );
        Ok(board)
    }

    async fn get_board(&self, user_id: i64, id: i64) -> DomainResult<Board> {
        Board::find(&self.pool, user_id, id)
            .await?
            .ok_or(DomainError::NotFound("board"))
    }

    async fn list_boards(&self, user_id: i64) -> DomainResult<Vec<Board>> {
        Ok(Board::list_by_owner(&self.pool, user_id).await?)
    }

    async fn update_board(
        &self,
        user_id: i64,
        id: i64,
        changes: UpdateBoard,
    ) -> DomainResult<Board> {
        let changes = changes.validated()?;
        let board = Board::update(&self.pool, user_id, id, &changes)
            .await?
            .ok_or(DomainError::NotFound("board"))?;

        tracing::info!(board_id = id, user_id, "board updated");
        Ok(board)
    }

    async fn delete_board(&self, user_id: i64, id: i64) -> DomainResult<()> {
        if !Board::delete(&self.pool, user_id, id).await? {
            return Err(DomainError::NotFound("board"));
        }
        tracing::info!(board_id = id, user_id, "board deleted");
        Ok(())
    }
}

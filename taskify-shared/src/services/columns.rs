//! Columns use case

use crate::db::ordering::OrderingAllocator;
use crate::error::{DomainError, DomainResult};
use crate::models::column::{Column, CreateColumn, UpdateColumn};
use async_trait::async_trait;
use sqlx::PgPool;

#[async_trait]
pub trait ColumnService: Send + Sync {
    async fn create_column(&self, input: CreateColumn) -> DomainResult<Column>;

    async fn get_column(&self, board_id: i64, id: i64) -> DomainResult<Column>;

    async fn update_column(
        &self,
        board_id: i64,
        id: i64,
        changes: UpdateColumn,
    ) -> DomainResult<Column>;

    async fn delete_column(&self, board_id: i64, id: i64) -> DomainResult<()>;
}

#[derive(Debug, Clone)]
pub struct PgColumnService {
    pool: PgPool,
    allocator: OrderingAllocator,
}

impl PgColumnService {
    pub fn new(pool: PgPool, allocator: OrderingAllocator) -> Self {
        Self { pool, allocator }
    }
}

#[async_trait]
impl ColumnService for PgColumnService {
    async fn create_column(&self, input: CreateColumn) -> DomainResult<Column> {
        let input = input.validated()?;
        let column = Column::create(&self.pool, &self.allocator, &input).await?;

        tracing::info!(
            column_id = column.id,
            board_id = column.board_id,
            position = column.position,
            "column created"
        );
        Ok(column)
    }

    async fn get_column(&self, board_id: i64, id: i64) -> DomainResult<Column> {
        Column::find(&self.pool, board_id, id)
            .await?
            .ok_or(DomainError::NotFound("column"))
    }

    async fn update_column(
        &self,
        board_id: i64,
        id: i64,
        changes: UpdateColumn,
    ) -> DomainResult<Column> {
        let changes = changes.validated()?;
        Column::update(&self.pool, board_id, id, &changes)
            .await?
            .ok_or(DomainError::NotFound("column"))
    }

    async fn delete_column(&self, board_id: i64, id: i64) -> DomainResult<()> {
        if !Column::delete(&self.pool, board_id, id).await? {
            return Err(DomainError::NotFound("column"));
        }
        tracing::info!(column_id = id, board_id, "column deleted");
        Ok(())
    }
}

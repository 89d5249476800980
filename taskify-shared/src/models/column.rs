//! Column model and database operations
//!
//! Columns belong to a board and are ordered within it. Every query is
//! scoped by `(board_id, id)`.

use crate::db::ordering::{OrderingAllocator, OrderingScope, PositionedInsert};
use crate::error::DomainResult;
use crate::models::board::validate_name;
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgArguments, query::QueryAs, PgPool, Postgres};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Column {
    pub id: i64,
    pub board_id: i64,
    pub position: i64,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct CreateColumn {
    pub board_id: i64,
    pub name: String,
}

impl CreateColumn {
    pub fn validated(self) -> DomainResult<Self> {
        Ok(Self {
            board_id: self.board_id,
            name: validate_name(&self.name)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct UpdateColumn {
    pub name: String,
}

impl UpdateColumn {
    pub fn validated(self) -> DomainResult<Self> {
        Ok(Self {
            name: validate_name(&self.name)?,
        })
    }
}

impl PositionedInsert for CreateColumn {
    type Output = Column;

    const SCOPE: OrderingScope = OrderingScope::ColumnsByBoard;

    fn scope_id(&self) -> i64 {
        self.board_id
    }

    fn insert_query(&self) -> QueryAs<'_, Postgres, Column, PgArguments> {
        sqlx::query_as::<_, Column>(
            r#"
            INSERT INTO columns (board_id, position, name)
            SELECT $1, COALESCE(MAX(position), 0) + 1, $2
            FROM columns
            WHERE board_id = $1
            RETURNING id, board_id, position, name
            "#,
        )
        .bind(self.board_id)
        .bind(self.name.as_str())
    }
}

impl Column {
    pub async fn create(
        pool: &PgPool,
        allocator: &OrderingAllocator,
        data: &CreateColumn,
    ) -> DomainResult<Self> {
        allocator.insert(pool, data).await
    }

    pub async fn find(pool: &PgPool, board_id: i64, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Column>(
            "SELECT id, board_id, position, name FROM columns WHERE board_id = $1 AND id = $2",
        )
        .bind(board_id)
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn update(
        pool: &PgPool,
        board_id: i64,
        id: i64,
        data: &UpdateColumn,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Column>(
            r#"
            UPDATE columns
            SET name = $3
            WHERE board_id = $1 AND id = $2
            RETURNING id, board_id, position, name
            "#,
        )
        .bind(board_id)
        .bind(id)
        .bind(&data.name)
        .fetch_optional(pool)
        .await
    }

    pub async fn delete(pool: &PgPool, board_id: i64, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM columns WHERE board_id = $1 AND id = $2")
            .bind(board_id)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

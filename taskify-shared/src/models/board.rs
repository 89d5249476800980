//! Board model and database operations
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE boards (
//!     id          BIGSERIAL PRIMARY KEY,
//!     user_id     BIGINT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
//!     position    BIGINT NOT NULL CHECK (position > 0),
//!     name        TEXT NOT NULL,
//!     description TEXT NOT NULL DEFAULT '',
//!     CONSTRAINT boards_owner_position_unique UNIQUE (user_id, position)
//! );
//! ```
//!
//! Every read, update and delete is scoped by `(user_id, id)`. A board that
//! exists under another owner is indistinguishable from a missing one.

use crate::db::ordering::{OrderingAllocator, OrderingScope, PositionedInsert};
use crate::error::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgArguments, query::QueryAs, PgPool, Postgres};

pub const MAX_NAME_LEN: usize = 255;
pub const MAX_DESCRIPTION_LEN: usize = 4096;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Board {
    pub id: i64,

    /// Owning user
    pub user_id: i64,

    /// 1-based, unique per owner, assigned on create
    pub position: i64,

    pub name: String,

    pub description: String,
}

#[derive(Debug, Clone)]
pub struct CreateBoard {
    pub user_id: i64,
    pub name: String,
    pub description: String,
}

impl CreateBoard {
    /// Trims and validates the input.
    pub fn validated(self) -> DomainResult<Self> {
        Ok(Self {
            user_id: self.user_id,
            name: validate_name(&self.name)?,
            description: validate_description(&self.description)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct UpdateBoard {
    pub name: String,
    pub description: String,
}

impl UpdateBoard {
    pub fn validated(self) -> DomainResult<Self> {
        Ok(Self {
            name: validate_name(&self.name)?,
            description: validate_description(&self.description)?,
        })
    }
}

pub fn validate_name(name: &str) -> DomainResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::validation("name", "must not be empty"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(DomainError::validation(
            "name",
            format!("must be at most {MAX_NAME_LEN} characters"),
        ));
    }
    Ok(name.to_string())
}

pub fn validate_description(description: &str) -> DomainResult<String> {
    let description = description.trim();
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(DomainError::validation(
            "description",
            format!("must be at most {MAX_DESCRIPTION_LEN} characters"),
        ));
    }
    Ok(description.to_string())
}

impl PositionedInsert for CreateBoard {
    type Output = Board;

    const SCOPE: OrderingScope = OrderingScope::BoardsByOwner;

    fn scope_id(&self) -> i64 {
        self.user_id
    }

    fn insert_query(&self) -> QueryAs<'_, Postgres, Board, PgArguments> {
        sqlx::query_as::<_, Board>(
            r#"
            INSERT INTO boards (user_id, position, name, description)
            SELECT $1, COALESCE(MAX(position), 0) + 1, $2, $3
            FROM boards
            WHERE user_id = $1
            RETURNING id, user_id, position, name, description
            "#,
        )
        .bind(self.user_id)
        .bind(self.name.as_str())
        .bind(self.description.as_str())
    }
}

impl Board {
    /// Inserts a board at the owner's next position.
    pub async fn create(
        pool: &PgPool,
        allocator: &OrderingAllocator,
        data: &CreateBoard,
    ) -> DomainResult<Self> {
        allocator.insert(pool, data).await
    }

    pub async fn find(pool: &PgPool, user_id: i64, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Board>(
            r#"
            SELECT id, user_id, position, name, description
            FROM boards
            WHERE user_id = $1 AND id = $2
            "#,
        )
        .bind(user_id)
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// All boards of one owner, lowest position first.
    pub async fn list_by_owner(pool: &PgPool, user_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Board>(
            r#"
            SELECT id, user_id, position, name, description
            FROM boards
            WHERE user_id = $1
            ORDER BY position
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Updates name and description. Position is immutable.
    pub async fn update(
        pool: &PgPool,
        user_id: i64,
        id: i64,
        data: &UpdateBoard,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Board>(
            r#"
            UPDATE boards
            SET name = $3, description = $4
            WHERE user_id = $1 AND id = $2
            RETURNING id, user_id, position, name, description
            "#,
        )
        .bind(user_id)
        .bind(id)
        .bind(&data.name)
        .bind(&data.description)
        .fetch_optional(pool)
        .await
    }

    /// Deletes a board without touching sibling positions.
    pub async fn delete(pool: &PgPool, user_id: i64, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM boards WHERE user_id = $1 AND id = $2")
            .bind(user_id)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

//! Task model and database operations
//!
//! Tasks belong to a column and are ordered within it. The assignee is an
//! optional user reference; deleting that user clears it
//! (`ON DELETE SET NULL`) and leaves the task in place.

use crate::db::ordering::{OrderingAllocator, OrderingScope, PositionedInsert};
use crate::error::{DomainError, DomainResult};
use crate::models::board::validate_description;
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgArguments, query::QueryAs, PgPool, Postgres};

pub const MAX_TITLE_LEN: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    pub id: i64,
    pub column_id: i64,
    pub position: i64,
    pub title: String,
    pub description: String,

    /// Assigned user, if any
    pub assignee_id: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct CreateTask {
    pub column_id: i64,
    pub title: String,
    pub description: String,
    pub assignee_id: Option<i64>,
}

impl CreateTask {
    pub fn validated(self) -> DomainResult<Self> {
        Ok(Self {
            column_id: self.column_id,
            title: validate_title(&self.title)?,
            description: validate_description(&self.description)?,
            assignee_id: self.assignee_id,
        })
    }
}

/// Full replacement of title, description and assignee.
#[derive(Debug, Clone)]
pub struct UpdateTask {
    pub title: String,
    pub description: String,
    pub assignee_id: Option<i64>,
}

impl UpdateTask {
    pub fn validated(self) -> DomainResult<Self> {
        Ok(Self {
            title: validate_title(&self.title)?,
            description: validate_description(&self.description)?,
            assignee_id: self.assignee_id,
        })
    }
}

pub fn validate_title(title: &str) -> DomainResult<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(DomainError::validation("title", "must not be empty"));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(DomainError::validation(
            "title",
            format!("must be at most {MAX_TITLE_LEN} characters"),
        ));
    }
    Ok(title.to_string())
}

impl PositionedInsert for CreateTask {
    type Output = Task;

    const SCOPE: OrderingScope = OrderingScope::TasksByColumn;

    fn scope_id(&self) -> i64 {
        self.column_id
    }

    fn insert_query(&self) -> QueryAs<'_, Postgres, Task, PgArguments> {
        sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (column_id, position, title, description, assignee_id)
            SELECT $1, COALESCE(MAX(position), 0) + 1, $2, $3, $4
            FROM tasks
            WHERE column_id = $1
            RETURNING id, column_id, position, title, description, assignee_id
            "#,
        )
        .bind(self.column_id)
        .bind(self.title.as_str())
        .bind(self.description.as_str())
        .bind(self.assignee_id)
    }
}

impl Task {
    pub async fn create(
        pool: &PgPool,
        allocator: &OrderingAllocator,
        data: &CreateTask,
    ) -> DomainResult<Self> {
        allocator.insert(pool, data).await
    }

    pub async fn find(pool: &PgPool, column_id: i64, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            SELECT id, column_id, position, title, description, assignee_id
            FROM tasks
            WHERE column_id = $1 AND id = $2
            "#,
        )
        .bind(column_id)
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn update(
        pool: &PgPool,
        column_id: i64,
        id: i64,
        data: &UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET title = $3, description = $4, assignee_id = $5
            WHERE column_id = $1 AND id = $2
            RETURNING id, column_id, position, title, description, assignee_id
            "#,
        )
        .bind(column_id)
        .bind(id)
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.assignee_id)
        .fetch_optional(pool)
        .await
    }

    pub async fn delete(pool: &PgPool, column_id: i64, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE column_id = $1 AND id = $2")
            .bind(column_id)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_validation() {
        assert_eq!(validate_title("  Write tests ").unwrap(), "Write tests");
        assert_eq!(
            validate_title(" "),
            Err(DomainError::validation("title", "must not be empty"))
        );
        assert!(validate_title(&"t".repeat(MAX_TITLE_LEN + 1)).is_err());
    }

    #[test]
    fn test_task_json_includes_null_assignee() {
        let task = Task {
            id: 1,
            column_id: 3,
            position: 1,
            title: "Write tests".to_string(),
            description: String::new(),
            assignee_id: None,
        };

        let json = serde_json::to_value(&task).unwrap();
        assert!(json["assignee_id"].is_null());
        assert_eq!(json["column_id"], 3);
    }
}

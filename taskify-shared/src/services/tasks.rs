//! Tasks use case

use crate::db::ordering::OrderingAllocator;
use crate::error::{DomainError, DomainResult};
use crate::models::task::{CreateTask, Task, UpdateTask};
use async_trait::async_trait;
use sqlx::PgPool;

#[async_trait]
pub trait TaskService: Send + Sync {
    async fn create_task(&self, input: CreateTask) -> DomainResult<Task>;

    async fn get_task(&self, column_id: i64, id: i64) -> DomainResult<Task>;

    async fn update_task(&self, column_id: i64, id: i64, changes: UpdateTask)
        -> DomainResult<Task>;

    async fn delete_task(&self, column_id: i64, id: i64) -> DomainResult<()>;
}

#[derive(Debug, Clone)]
pub struct PgTaskService {
    pool: PgPool,
    allocator: OrderingAllocator,
}

impl PgTaskService {
    pub fn new(pool: PgPool, allocator: OrderingAllocator) -> Self {
        Self { pool, allocator }
    }
}

#[async_trait]
impl TaskService for PgTaskService {
    async fn create_task(&self, input: CreateTask) -> DomainResult<Task> {
        let input = input.validated()?;
        let task = Task::create(&self.pool, &self.allocator, &input).await?;

        tracing::info!(
            task_id = task.id,
            column_id = task.column_id,
            position = task.position,
            "task created"
        );
        Ok(task)
    }

    async fn get_task(&self, column_id: i64, id: i64) -> DomainResult<Task> {
        Task::find(&self.pool, column_id, id)
            .await?
            .ok_or(DomainError::NotFound("task"))
    }

    async fn update_task(&self, column_id: i64, id: i64, changes: UpdateTask) -> DomainResult<Task> {
        let changes = changes.validated()?;
        Task::update(&self.pool, column_id, id, &changes)
            .await?
            .ok_or(DomainError::NotFound("task"))
    }

    async fn delete_task(&self, column_id: i64, id: i64) -> DomainResult<()> {
        if !Task::delete(&self.pool, column_id, id).await? {
            return Err(DomainError::NotFound("task"));
        }
        tracing::info!(task_id = id, column_id, "task deleted");
        Ok(())
    }
}

//! In-memory backend for all four use cases
//!
//! Runs the gateway and the gRPC adapters without PostgreSQL. Behaves like
//! the SQL schema: foreign keys and cascades, `users_email_unique`, and
//! `MAX(position) + 1` allocation per scope. Every operation holds the store
//! lock for its whole duration, which makes allocation trivially atomic.

use crate::error::{DomainError, DomainResult};
use crate::models::board::{Board, CreateBoard, UpdateBoard};
use crate::models::column::{Column, CreateColumn, UpdateColumn};
use crate::models::task::{CreateTask, Task, UpdateTask};
use crate::models::user::{User, UserProfile};
use crate::services::users::{hash_off_thread, NewUser, UserChanges};
use crate::services::{BoardService, ColumnService, TaskService, UserService};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Default)]
struct Tables {
    last_id: i64,
    users: BTreeMap<i64, User>,
    boards: BTreeMap<i64, Board>,
    columns: BTreeMap<i64, Column>,
    tasks: BTreeMap<i64, Task>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.users
            .values()
            .any(|user| user.email == email && Some(user.id) != except)
    }

    fn remove_board_tree(&mut self, board_id: i64) {
        self.boards.remove(&board_id);
        let column_ids: Vec<i64> = self
            .columns
            .values()
            .filter(|column| column.board_id == board_id)
            .map(|column| column.id)
            .collect();
        for column_id in column_ids {
            self.remove_column_tree(column_id);
        }
    }

    fn remove_column_tree(&mut self, column_id: i64) {
        self.columns.remove(&column_id);
        self.tasks.retain(|_, task| task.column_id != column_id);
    }
}

/// Next position inside one scope: highest existing position plus one.
fn next_position(positions: impl Iterator<Item = i64>) -> i64 {
    positions.max().unwrap_or(0) + 1
}

fn duplicate_email() -> DomainError {
    DomainError::AlreadyExists("user with this email already exists".to_string())
}

/// Shared in-memory store. Clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserService for MemoryStore {
    async fn create_user(&self, input: NewUser) -> DomainResult<UserProfile> {
        let input = input.validated()?;
        let password_hash = hash_off_thread(input.password.unwrap_or_default()).await?;

        let mut tables = self.tables.lock().await;
        if tables.email_taken(&input.email, None) {
            return Err(duplicate_email());
        }

        let user = User {
            id: tables.next_id(),
            email: input.email,
            username: input.username,
            password_hash,
        };
        tables.users.insert(user.id, user.clone());

        tracing::info!(user_id = user.id, "user created");
        Ok(user.into())
    }

    async fn get_user(&self, id: i64) -> DomainResult<UserProfile> {
        let tables = self.tables.lock().await;
        tables
            .users
            .get(&id)
            .cloned()
            .map(UserProfile::from)
            .ok_or(DomainError::NotFound("user"))
    }

    async fn update_user(&self, id: i64, changes: UserChanges) -> DomainResult<UserProfile> {
        let changes = changes.validated()?;
        let password_hash = match changes.password {
            Some(password) => Some(hash_off_thread(password).await?),
            None => None,
        };

        let mut tables = self.tables.lock().await;
        if !tables.users.contains_key(&id) {
            return Err(DomainError::NotFound("user"));
        }
        if tables.email_taken(&changes.email, Some(id)) {
            return Err(duplicate_email());
        }

        let user = tables
            .users
            .get_mut(&id)
            .ok_or(DomainError::NotFound("user"))?;
        user.email = changes.email;
        user.username = changes.username;
        if let Some(hash) = password_hash {
            user.password_hash = hash;
        }

        tracing::info!(user_id = id, "user updated");
        Ok(user.clone().into())
    }

    async fn delete_user(&self, id: i64) -> DomainResult<()> {
        let mut tables = self.tables.lock().await;
        if tables.users.remove(&id).is_none() {
            return Err(DomainError::NotFound("user"));
        }

        let board_ids: Vec<i64> = tables
            .boards
            .values()
            .filter(|board| board.user_id == id)
            .map(|board| board.id)
            .collect();
        for board_id in board_ids {
            tables.remove_board_tree(board_id);
        }
        for task in tables.tasks.values_mut() {
            if task.assignee_id == Some(id) {
                task.assignee_id = None;
            }
        }

        Ok(())
    }
}

#[async_trait]
impl BoardService for MemoryStore {
    async fn create_board(&self, input: CreateBoard) -> DomainResult<Board> {
        let input = input.validated()?;

        let mut tables = self.tables.lock().await;
        if !tables.users.contains_key(&input.user_id) {
            return Err(DomainError::NotFound("user"));
        }

        let position = next_position(
            tables
                .boards
                .values()
                .filter(|board| board.user_id == input.user_id)
                .map(|board| board.position),
        );
        let board = Board {
            id: tables.next_id(),
            user_id: input.user_id,
            position,
            name: input.name,
            description: input.description,
        };
        tables.boards.insert(board.id, board.clone());

        tracing::info!(board_id = board.id, user_id = board.user_id, position, "board created");
        Ok(board)
    }

    async fn get_board(&self, user_id: i64, id: i64) -> DomainResult<Board> {
        let tables = self.tables.lock().await;
        tables
            .boards
            .get(&id)
            .filter(|board| board.user_id == user_id)
            .cloned()
            .ok_or(DomainError::NotFound("board"))
    }

    async fn list_boards(&self, user_id: i64) -> DomainResult<Vec<Board>> {
        let tables = self.tables.lock().await;
        let mut boards: Vec<Board> = tables
            .boards
            .values()
            .filter(|board| board.user_id == user_id)
            .cloned()
            .collect();
        boards.sort_by_key(|board| board.position);
        Ok(boards)
    }

    async fn update_board(
        &self,
        user_id: i64,
        id: i64,
        changes: UpdateBoard,
    ) -> DomainResult<Board> {
        let changes = changes.validated()?;

        let mut tables = self.tables.lock().await;
        let board = tables
            .boards
            .get_mut(&id)
            .filter(|board| board.user_id == user_id)
            .ok_or(DomainError::NotFound("board"))?;
        board.name = changes.name;
        board.description = changes.description;

        Ok(board.clone())
    }

    async fn delete_board(&self, user_id: i64, id: i64) -> DomainResult<()> {
        let mut tables = self.tables.lock().await;
        let owned = tables
            .boards
            .get(&id)
            .is_some_and(|board| board.user_id == user_id);
        if !owned {
            return Err(DomainError::NotFound("board"));
        }
        tables.remove_board_tree(id);
        Ok(())
    }
}

#[async_trait]
impl ColumnService for MemoryStore {
    async fn create_column(&self, input: CreateColumn) -> DomainResult<Column> {
        let input = input.validated()?;

        let mut tables = self.tables.lock().await;
        if !tables.boards.contains_key(&input.board_id) {
            return Err(DomainError::NotFound("board"));
        }

        let position = next_position(
            tables
                .columns
                .values()
                .filter(|column| column.board_id == input.board_id)
                .map(|column| column.position),
        );
        let column = Column {
            id: tables.next_id(),
            board_id: input.board_id,
            position,
            name: input.name,
        };
        tables.columns.insert(column.id, column.clone());

        Ok(column)
    }

    async fn get_column(&self, board_id: i64, id: i64) -> DomainResult<Column> {
        let tables = self.tables.lock().await;
        tables
            .columns
            .get(&id)
            .filter(|column| column.board_id == board_id)
            .cloned()
            .ok_or(DomainError::NotFound("column"))
    }

    async fn update_column(
        &self,
        board_id: i64,
        id: i64,
        changes: UpdateColumn,
    ) -> DomainResult<Column> {
        let changes = changes.validated()?;

        let mut tables = self.tables.lock().await;
        let column = tables
            .columns
            .get_mut(&id)
            .filter(|column| column.board_id == board_id)
            .ok_or(DomainError::NotFound("column"))?;
        column.name = changes.name;

        Ok(column.clone())
    }

    async fn delete_column(&self, board_id: i64, id: i64) -> DomainResult<()> {
        let mut tables = self.tables.lock().await;
        let owned = tables
            .columns
            .get(&id)
            .is_some_and(|column| column.board_id == board_id);
        if !owned {
            return Err(DomainError::NotFound("column"));
        }
        tables.remove_column_tree(id);
        Ok(())
    }
}

#[async_trait]
impl TaskService for MemoryStore {
    async fn create_task(&self, input: CreateTask) -> DomainResult<Task> {
        let input = input.validated()?;

        let mut tables = self.tables.lock().await;
        if !tables.columns.contains_key(&input.column_id) {
            return Err(DomainError::NotFound("column"));
        }
        if let Some(assignee) = input.assignee_id {
            if !tables.users.contains_key(&assignee) {
                return Err(DomainError::NotFound("assignee"));
            }
        }

        let position = next_position(
            tables
                .tasks
                .values()
                .filter(|task| task.column_id == input.column_id)
                .map(|task| task.position),
        );
        let task = Task {
            id: tables.next_id(),
            column_id: input.column_id,
            position,
            title: input.title,
            description: input.description,
            assignee_id: input.assignee_id,
        };
        tables.tasks.insert(task.id, task.clone());

        Ok(task)
    }

    async fn get_task(&self, column_id: i64, id: i64) -> DomainResult<Task> {
        let tables = self.tables.lock().await;
        tables
            .tasks
            .get(&id)
            .filter(|task| task.column_id == column_id)
            .cloned()
            .ok_or(DomainError::NotFound("task"))
    }

    async fn update_task(&self, column_id: i64, id: i64, changes: UpdateTask) -> DomainResult<Task> {
        let changes = changes.validated()?;

        let mut tables = self.tables.lock().await;
        if let Some(assignee) = changes.assignee_id {
            if !tables.users.contains_key(&assignee) {
                return Err(DomainError::NotFound("assignee"));
            }
        }

        let task = tables
            .tasks
            .get_mut(&id)
            .filter(|task| task.column_id == column_id)
            .ok_or(DomainError::NotFound("task"))?;
        task.title = changes.title;
        task.description = changes.description;
        task.assignee_id = changes.assignee_id;

        Ok(task.clone())
    }

    async fn delete_task(&self, column_id: i64, id: i64) -> DomainResult<()> {
        let mut tables = self.tables.lock().await;
        let owned = tables
            .tasks
            .get(&id)
            .is_some_and(|task| task.column_id == column_id);
        if !owned {
            return Err(DomainError::NotFound("task"));
        }
        tables.tasks.remove(&id);
        Ok(())
    }
}

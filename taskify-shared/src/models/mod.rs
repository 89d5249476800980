//! Database models and their CRUD operations
//!
//! - `user`: accounts; the stored row carries the password hash
//! - `board`: owned by a user, ordered per owner
//! - `column`: owned by a board, ordered per board
//! - `task`: owned by a column, ordered per column
//!
//! Creates for boards, columns and tasks go through
//! [`crate::db::ordering::OrderingAllocator`].

pub mod board;
pub mod column;
pub mod task;
pub mod user;

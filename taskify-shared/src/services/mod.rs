//! Use cases
//!
//! One narrow trait per entity group. The gRPC adapters and the gateway's
//! local-direct backends both call through these traits, so a use case never
//! knows which transport invoked it.
//!
//! Each trait has a PostgreSQL implementation (`Pg*Service`) and all four are
//! implemented by [`memory::MemoryStore`], which runs without a database.

pub mod boards;
pub mod columns;
pub mod memory;
pub mod tasks;
pub mod users;

pub use boards::{BoardService, PgBoardService};
pub use columns::{ColumnService, PgColumnService};
pub use memory::MemoryStore;
pub use tasks::{PgTaskService, TaskService};
pub use users::{NewUser, PgUserService, UserChanges, UserService};

//! tonic adapters
//!
//! Each adapter unpacks the protobuf request, calls the use-case trait and
//! maps the result with [`crate::status::into_status`]. No business rules
//! live here.

pub mod boards;
pub mod users;

pub use boards::BoardsGrpc;
pub use users::UsersGrpc;

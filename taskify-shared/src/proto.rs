//! Generated gRPC types and conversions to the domain models.
//!
//! Only public views cross the wire: `users::User` has no password hash.

pub mod users {
    tonic::include_proto!("taskify.users.v1");
}

pub mod boards {
    tonic::include_proto!("taskify.boards.v1");
}

use crate::models::{board::Board, user::UserProfile};

impl From<UserProfile> for users::User {
    fn from(user: UserProfile) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
        }
    }
}

impl From<users::User> for UserProfile {
    fn from(user: users::User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
        }
    }
}

impl From<Board> for boards::Board {
    fn from(board: Board) -> Self {
        Self {
            id: board.id,
            user_id: board.user_id,
            position: board.position,
            name: board.name,
            description: board.description,
        }
    }
}

impl From<boards::Board> for Board {
    fn from(board: boards::Board) -> Self {
        Self {
            id: board.id,
            user_id: board.user_id,
            position: board.position,
            name: board.name,
            description: board.description,
        }
    }
}

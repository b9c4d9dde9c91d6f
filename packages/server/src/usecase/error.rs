//! UseCase error types.

use thiserror::Error;

use crate::domain::{RepositoryError, ValueObjectError};

/// Room creation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CreateRoomError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] ValueObjectError),

    #[error("Room '{0}' already exists")]
    Conflict(String),

    #[error("could not allocate a free room id after {0} attempt(s)")]
    IdSpaceExhausted(usize),
}

/// Room lookup errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GetRoomError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] ValueObjectError),

    #[error("Room '{0}' not found")]
    NotFound(String),
}

/// Errors of `join-room`
#[derive(Debug, Clone, PartialEq, Error)]
pub enum JoinRoomError {
    #[error("connection already joined room '{0}'")]
    AlreadyJoined(String),

    #[error("invalid input: {0}")]
    InvalidInput(#[from] ValueObjectError),

    #[error("Room '{0}' not found")]
    RoomNotFound(String),

    #[error("connection is gone")]
    ConnectionGone,
}

/// Errors of the room events a joined connection may send
///
/// Every variant means the event was dropped: nothing was persisted and
/// nothing was broadcast.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RoomEventError {
    #[error("connection has not joined a room")]
    NotJoined,

    #[error("connection is bound to room '{bound}', not '{requested}'")]
    RoomMismatch { bound: String, requested: String },

    #[error("identity does not match the joined identity")]
    IdentityMismatch,

    #[error("invalid input: {0}")]
    InvalidInput(#[from] ValueObjectError),

    #[error("{0}")]
    NotFound(String),

    #[error("only the host may do this")]
    Unauthorized,
}

impl From<RepositoryError> for RoomEventError {
    fn from(e: RepositoryError) -> Self {
        Self::NotFound(e.to_string())
    }
}

/// Errors of closing a room through the HTTP API
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CloseRoomError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] ValueObjectError),

    #[error("Room '{0}' not found")]
    NotFound(String),

    #[error("only the host may close the room")]
    Unauthorized,
}

//! Error type shared by the data-access layer and the HTTP handlers.
//!
//! The first four variants are caller mistakes and carry a [`Message`] that is
//! safe to show. The rest are failures whose cause is logged and replaced by a
//! generic message before it reaches a client.

use crate::libs::messages::Message;
use thiserror::Error;

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(Message),

    #[error("{0}")]
    Conflict(Message),

    #[error("{0}")]
    Invalid(Message),

    #[error("{0}")]
    Unauthorized(Message),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Returns `true` when `err` is a UNIQUE constraint violation.
pub fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

//! Error types for ErenAI.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ErenaiError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Session file error: {0}")]
    SessionError(String),

    #[error("Corrupt record: {0}")]
    CorruptRecord(String),
}

use std::io;
use thiserror::Error;

use crate::models::TemplateId;

#[derive(Debug, Error)]
pub enum VidplateError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("Template {0} not found")]
    TemplateNotFound(TemplateId),
    /// Missing or malformed user input; the operation was aborted.
    #[error("{0}")]
    Validation(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Invalid variable assignment: {0}")]
    InvalidAssignment(String),
    #[error("Clipboard error: {0}")]
    Clipboard(String),
    #[error("Error: {0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, VidplateError>;

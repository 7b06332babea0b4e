//! Error types for vocab-core.

use thiserror::Error;

/// Result type alias using EngineError.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors raised by the engine.
///
/// Duplicate or late submissions are not errors: the session operations
/// return `None` for them instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("content unavailable: {0}")]
    ContentUnavailable(String),
}

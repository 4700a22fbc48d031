//! Errors raised while talking to the report executor.

use std::io;
use thiserror::Error;

pub type ExecutorResult<T> = Result<T, ExecutorError>;

/// Transport and remote failures of an executor request.
///
/// Catalog, preview and definition calls all surface this type; the editing
/// session turns it into a warning notice instead of failing.
#[derive(Error, Debug)]
pub enum ExecutorError {
    #[error("failed to spawn executor process: {0}")]
    SpawnFailed(#[source] io::Error),

    #[error("failed to write to executor: {0}")]
    WriteFailed(#[source] io::Error),

    #[error("failed to encode request: {0}")]
    SerializeFailed(#[source] serde_json::Error),

    #[error("failed to decode response: {0}")]
    DeserializeFailed(#[source] serde_json::Error),

    /// No response within the configured `executor.timeout_secs`.
    #[error("request timed out after {0} seconds")]
    Timeout(u64),

    #[error("executor process exited unexpectedly")]
    ExecutorExited,

    /// The reader task dropped the response slot.
    #[error("response channel closed unexpectedly")]
    ChannelClosed,

    /// Error response with a code the client does not classify.
    #[error("executor error: {message} (code: {code})")]
    Remote { code: String, message: String },

    /// Unknown data source or definition.
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("method not found: {0}")]
    MethodNotFound(String),
}

impl ExecutorError {
    pub fn remote(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Remote {
            code: code.into(),
            message: message.into(),
        }
    }
}

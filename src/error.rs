//! Error types for taskflow
//!
//! Exit codes:
//! - 0: Success (including declined confirmations, which carry no side effect)
//! - 2: User error (bad input, unknown id, dashboard not ready)
//! - 4: Operation failed (backend unreachable, IO, serialization)

use thiserror::Error;

/// Exit codes for the taskflow CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for taskflow operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: i64 },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Dashboard is not ready: {0}")]
    NotReady(String),

    // Declined confirmations short-circuit without side effects (exit code 0)
    #[error("Cancelled")]
    ConfirmationDeclined,

    // Operation failures (exit code 4)
    #[error("Backend request failed: {0}")]
    Fetch(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl Error {
    /// Build a `NotFound` for a task id
    pub fn task_not_found(id: i64) -> Self {
        Error::NotFound { kind: "Task", id }
    }

    /// Build a `NotFound` for a category id
    pub fn category_not_found(id: i64) -> Self {
        Error::NotFound { kind: "Category", id }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::ConfirmationDeclined => exit_codes::SUCCESS,

            Error::Validation(_)
            | Error::NotFound { .. }
            | Error::InvalidArgument(_)
            | Error::NotReady(_) => exit_codes::USER_ERROR,

            Error::Fetch(_)
            | Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::TomlSerialize(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// Stable machine-readable category for JSON output
    pub fn kind(&self) -> &'static str {
        match self.exit_code() {
            exit_codes::SUCCESS => "cancelled",
            exit_codes::USER_ERROR => "user_error",
            _ => "operation_failed",
        }
    }
}

/// Result type alias for taskflow operations
pub type Result<T> = std::result::Result<T, Error>;

/// Wrapper for displaying errors in JSON format
#[derive(serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub code: i32,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&Error> for JsonError {
    fn from(err: &Error) -> Self {
        JsonError {
            error: err.to_string(),
            code: err.exit_code(),
            kind: err.kind(),
            details: None,
        }
    }
}

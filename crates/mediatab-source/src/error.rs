//! Error types for mediatab-source.

use crate::StreamKind;
use mediatab_report::ReportError;
use std::path::PathBuf;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to the MediaInfo engine.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The engine could not open or recognize the input.
    #[error("cannot open {}", path.display())]
    CannotOpen { path: PathBuf },

    /// The engine returned no report text.
    #[error("engine returned an empty report")]
    EmptyReport,

    /// A single-field lookup returned nothing.
    #[error("no value for {key} in {kind} stream {stream}")]
    NotFound {
        key: String,
        kind: StreamKind,
        stream: usize,
    },

    /// The handle was already closed.
    #[error("handle is closed")]
    Closed,

    /// A required external tool is not available.
    #[error("tool not found: {tool}")]
    ToolNotFound { tool: String },

    /// An external tool failed to execute.
    #[error("tool execution failed: {tool}: {message}")]
    ToolFailed { tool: String, message: String },

    /// The engine library could not be initialized.
    #[error("engine initialization failed: {0}")]
    InitFailed(String),

    /// Invalid input provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a cannot-open error.
    pub fn cannot_open(path: impl Into<PathBuf>) -> Self {
        Self::CannotOpen { path: path.into() }
    }

    /// Create a not-found error for a field lookup.
    pub fn not_found(key: impl Into<String>, kind: StreamKind, stream: usize) -> Self {
        Self::NotFound {
            key: key.into(),
            kind,
            stream,
        }
    }

    /// Create a tool not found error.
    pub fn tool_not_found(tool: impl Into<String>) -> Self {
        Self::ToolNotFound { tool: tool.into() }
    }

    /// Create a tool execution failed error.
    pub fn tool_failed(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ToolFailed {
            tool: tool.into(),
            message: message.into(),
        }
    }
}

impl From<ReportError> for Error {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::EmptyReport => Error::EmptyReport,
        }
    }
}

//! Error types
//!
//! Defines domain-specific error types for each module of the server.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Credential store errors
///
/// Only `AlreadyExists` is expected in normal operation; every other variant
/// is a hard failure surfaced to the caller as-is.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Username already exists: {0}")]
    AlreadyExists(String),

    #[error("Credential storage unavailable at {path}: {source}")]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Password hashing failed: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    #[error("Malformed input: {0}")]
    MalformedInput(String),
}

impl AuthError {
    pub(crate) fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        AuthError::StorageUnavailable {
            path: path.into(),
            source,
        }
    }

    /// Whether the caller may recover from this error without operator action.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AuthError::AlreadyExists(_) | AuthError::MalformedInput(_)
        )
    }
}

/// Incident and ticket repository errors
#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl AnalyticsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        AnalyticsError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        AnalyticsError::Csv {
            path: path.into(),
            source,
        }
    }
}

/// Text generation collaborator errors
#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("Text generator unavailable: {0}")]
    Unavailable(String),

    #[error("Text generation failed: {0}")]
    Failed(String),
}

/// Protocol session errors
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Command too long ({0} bytes)")]
    CommandTooLong(usize),

    #[error("Command is not valid UTF-8")]
    InvalidEncoding,

    #[error("Too many connections ({0} active)")]
    TooManyConnections(usize),

    #[error("Not logged in")]
    NotLoggedIn,

    #[error("Background task failed: {0}")]
    TaskFailed(String),
}

/// General server error that encompasses all error types
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Analytics error: {0}")]
    Analytics(#[from] AnalyticsError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
}

// src/error.rs
//! Application error types with structured error handling.
//!
//! Error types form the vocabulary for failure modes in the system.
//! Each variant says what went wrong and where, and [`AppError::kind`]
//! sorts them into the three outcomes the harvest cares about: drop the
//! item, abort at startup, or abort the phase.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// MediaWiki API error codes as a typed vocabulary.
///
/// The API reports failures as `{"error": {"code": "...", "info": "..."}}`
/// with an HTTP 200 status, so the code string is the only reliable signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaWikiErrorCode {
    /// Request rate exceeded for this client
    RateLimited,
    /// Replication lag is above the `maxlag` threshold
    MaxLag,
    /// The wiki is in read-only mode
    ReadOnly,
    /// A parameter had an unrecognized or invalid value
    BadValue,
    /// The title is syntactically invalid
    InvalidTitle,
    /// The title does not exist
    MissingTitle,
    /// An unhandled exception on the server (`internal_api_error_*`)
    InternalApiError,
    /// HTTP status code fallback when the body is not an API error document
    HttpStatus(u16),
    /// An error code this client doesn't recognize yet
    Unknown(String),
}

impl MediaWikiErrorCode {
    /// Parse an API error code string into the typed vocabulary.
    pub fn from_api_response(code: &str) -> Self {
        match code {
            "ratelimited" => Self::RateLimited,
            "maxlag" => Self::MaxLag,
            "readonly" => Self::ReadOnly,
            "badvalue" | "unknown_action" | "nosuchparameter" => Self::BadValue,
            "invalidtitle" => Self::InvalidTitle,
            "missingtitle" => Self::MissingTitle,
            other if other.starts_with("internal_api_error") => Self::InternalApiError,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Create from an HTTP status code when the body is not an API error.
    pub fn from_http_status(status: u16) -> Self {
        Self::HttpStatus(status)
    }
}

impl fmt::Display for MediaWikiErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RateLimited => write!(f, "ratelimited"),
            Self::MaxLag => write!(f, "maxlag"),
            Self::ReadOnly => write!(f, "readonly"),
            Self::BadValue => write!(f, "badvalue"),
            Self::InvalidTitle => write!(f, "invalidtitle"),
            Self::MissingTitle => write!(f, "missingtitle"),
            Self::InternalApiError => write!(f, "internal_api_error"),
            Self::HttpStatus(code) => write!(f, "http_{}", code),
            Self::Unknown(code) => write!(f, "{}", code),
        }
    }
}

/// How a failure is handled by the harvest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Per-request failure: log it, drop the item, keep going.
    Transient,
    /// Bad input detected before any worker starts.
    Configuration,
    /// Anything that breaks a whole phase.
    Internal,
}

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Network failure: {0}")]
    NetworkFailure(#[from] reqwest::Error),

    #[error("MediaWiki API returned an error ({code}): {info}")]
    MediaWikiService {
        code: MediaWikiErrorCode,
        info: String,
    },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Filesystem IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Append log {} is closed", path.display())]
    LogClosed { path: PathBuf },

    #[error("Failed to write results: {}", failures.join("; "))]
    DeliveryFailed { failures: Vec<String> },

    #[error("Internal error: {message}")]
    InternalError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error(transparent)]
    ValidationError(#[from] crate::types::ValidationError),
}

impl AppError {
    /// Sorts the error into the harvest's failure taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NetworkFailure(_)
            | Self::MediaWikiService { .. }
            | Self::MalformedResponse(_) => ErrorKind::Transient,
            Self::MissingConfiguration(_)
            | Self::InvalidConfiguration(_)
            | Self::ValidationError(_) => ErrorKind::Configuration,
            Self::Io(_)
            | Self::LogClosed { .. }
            | Self::DeliveryFailed { .. }
            | Self::InternalError { .. } => ErrorKind::Internal,
        }
    }

    pub fn is_transient(&self) -> bool {
        self.kind() == ErrorKind::Transient
    }

    /// The API error code, when the failure came from the wiki itself.
    pub fn service_code(&self) -> Option<&MediaWikiErrorCode> {
        match self {
            Self::MediaWikiService { code, .. } => Some(code),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedResponse(err.to_string())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::InternalError {
            message: format!("worker task failed: {}", err),
            source: Some(Box::new(err)),
        }
    }
}

/// Result type alias for convenience
pub type Result<T, E = AppError> = std::result::Result<T, E>;

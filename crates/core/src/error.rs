//! Unified error types for the log server.
//!
//! Errors fall into two classes:
//! - caller faults (`VALID_*`), returned to the client with their reason
//! - server faults (`DB_001`, internal), logged and answered generically

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Validation error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorCode {
    /// VALID_001: Body or payload could not be parsed
    InvalidFormat,
    /// VALID_002: Bulk body exceeds 1MB
    BatchTooLarge,
    /// VALID_003: app_id is missing
    MissingAppId,
    /// VALID_004: data is missing or empty
    MissingData,
    /// VALID_005: time is older than the staleness window
    StaleTimestamp,
    /// VALID_006: tag is not one of the known tags
    UnknownTag,
    /// VALID_007: a required payload field is missing or zero
    MissingField,
}

impl ValidationErrorCode {
    /// Get the error code string.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidFormat => "VALID_001",
            Self::BatchTooLarge => "VALID_002",
            Self::MissingAppId => "VALID_003",
            Self::MissingData => "VALID_004",
            Self::StaleTimestamp => "VALID_005",
            Self::UnknownTag => "VALID_006",
            Self::MissingField => "VALID_007",
        }
    }

    /// Get the HTTP status code.
    pub fn http_status(&self) -> u16 {
        400
    }
}

/// Database error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbErrorCode {
    /// DB_001: Failed to store a log record
    StoreFailed,
}

impl DbErrorCode {
    /// Get the error code string.
    pub fn code(&self) -> &'static str {
        match self {
            Self::StoreFailed => "DB_001",
        }
    }

    /// Get the HTTP status code.
    pub fn http_status(&self) -> u16 {
        500
    }
}

/// Unified error type for the log server.
#[derive(Debug, Error)]
pub enum Error {
    /// Validation error with code.
    #[error("[{code}] {message}")]
    ValidationWithCode {
        code: &'static str,
        message: String,
        http_status: u16,
    },

    /// Database error with code.
    #[error("[{code}] {message}")]
    Database {
        code: &'static str,
        message: String,
        http_status: u16,
    },

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a validation error with code.
    pub fn validation_code(code: ValidationErrorCode, msg: impl Into<String>) -> Self {
        Self::ValidationWithCode {
            code: code.code(),
            message: msg.into(),
            http_status: code.http_status(),
        }
    }

    /// Create a database error.
    pub fn database(code: DbErrorCode, msg: impl Into<String>) -> Self {
        Self::Database {
            code: code.code(),
            message: msg.into(),
            http_status: code.http_status(),
        }
    }

    pub fn missing_field(msg: impl Into<String>) -> Self {
        Self::validation_code(ValidationErrorCode::MissingField, msg)
    }

    pub fn invalid_format(msg: impl Into<String>) -> Self {
        Self::validation_code(ValidationErrorCode::InvalidFormat, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Get the HTTP status code for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::ValidationWithCode { http_status, .. } => *http_status,
            Self::Database { http_status, .. } => *http_status,
            Self::Internal(_) => 500,
        }
    }

    /// Get the error code if this is a coded error.
    pub fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::ValidationWithCode { code, .. } => Some(code),
            Self::Database { code, .. } => Some(code),
            Self::Internal(_) => None,
        }
    }

    /// Whether the client sent something we refuse to store.
    pub fn is_caller_fault(&self) -> bool {
        (400..500).contains(&self.http_status())
    }

    /// Human readable reason without the code prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::ValidationWithCode { message, .. } => message,
            Self::Database { message, .. } => message,
            Self::Internal(message) => message,
        }
    }
}

//! Service layer error types
//!
//! Provides a unified error type for all service operations.

use recommend_common::error::domain_status;
use recommend_common::AppError;
use recommend_core::DomainError;
use std::fmt;

/// Service layer error type
#[derive(Debug)]
pub enum ServiceError {
    /// Domain rule violation
    Domain(DomainError),

    /// Application error (auth, hashing, infrastructure)
    App(AppError),

    /// Request failed field validation
    Validation {
        message: String,
        details: Option<serde_json::Value>,
    },

    /// Storage work did not finish in time and was rolled back
    Timeout { operation: &'static str },

    /// Internal error
    Internal(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain(e) => write!(f, "{e}"),
            Self::App(e) => write!(f, "{e}"),
            Self::Validation { message, .. } => write!(f, "Validation error: {message}"),
            Self::Timeout { operation } => write!(f, "Operation timed out: {operation}"),
            Self::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Domain(e) => Some(e),
            Self::App(e) => Some(e),
            _ => None,
        }
    }
}

impl ServiceError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            details: None,
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Domain(e) => domain_status(e),
            Self::App(e) => e.status_code(),
            Self::Validation { .. } => 400,
            Self::Timeout { .. } => 503,
            Self::Internal(_) => 500,
        }
    }

    /// Get the error code for API responses
    pub fn error_code(&self) -> &str {
        match self {
            Self::Domain(e) => e.code(),
            Self::App(e) => e.error_code(),
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::Timeout { .. } => "OPERATION_TIMEOUT",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Structured field errors, when the failure came from request validation
    pub fn details(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Validation { details, .. } => details.as_ref(),
            _ => None,
        }
    }

    pub fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl From<AppError> for ServiceError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Domain(e) => Self::Domain(e),
            other => Self::App(other),
        }
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(&errors).ok();
        Self::Validation {
            message: "Request validation failed".to_string(),
            details,
        }
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::entities::InvitationStatus;
use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Application not found: {0}")]
    ApplicationNotFound(Snowflake),

    /// Covers unknown tokens, deleted rows and rows owned by someone else alike
    #[error("Invitation not found")]
    InvitationNotFound,

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Password too weak: {0}")]
    WeakPassword(String),

    #[error("Too many universities: max {max}")]
    TooManyUniversities { max: usize },

    #[error("Invalid university id: {0}")]
    InvalidUniversityId(i64),

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Recommender already invited for this application")]
    AlreadyInvited,

    #[error("Invitation token already exists")]
    InvitationTokenExists,

    // =========================================================================
    // Invalid State Errors
    // =========================================================================
    #[error("Invitation is {status}, not invited")]
    InvitationNotPending { status: InvitationStatus },

    #[error("Invitation has expired")]
    InvitationExpired,

    #[error("Application universities are locked after a recommender confirmed")]
    ApplicationLocked,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Notification error: {0}")]
    NotificationError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::ApplicationNotFound(_) => "UNKNOWN_APPLICATION",
            Self::InvitationNotFound => "UNKNOWN_INVITATION",

            // Validation
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::WeakPassword(_) => "WEAK_PASSWORD",
            Self::TooManyUniversities { .. } => "TOO_MANY_UNIVERSITIES",
            Self::InvalidUniversityId(_) => "INVALID_UNIVERSITY",

            // Conflict
            Self::AlreadyInvited => "ALREADY_INVITED",
            Self::InvitationTokenExists => "INVITATION_TOKEN_EXISTS",

            // Invalid State
            Self::InvitationNotPending { .. } => "INVITATION_NOT_PENDING",
            Self::InvitationExpired => "INVITATION_EXPIRED",
            Self::ApplicationLocked => "APPLICATION_LOCKED",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::NotificationError(_) => "NOTIFICATION_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ApplicationNotFound(_) | Self::InvitationNotFound)
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidEmail
                | Self::WeakPassword(_)
                | Self::TooManyUniversities { .. }
                | Self::InvalidUniversityId(_)
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::AlreadyInvited | Self::InvitationTokenExists)
    }

    /// Check if the target exists but the operation is illegal in its current state
    pub fn is_invalid_state(&self) -> bool {
        matches!(
            self,
            Self::InvitationNotPending { .. } | Self::InvitationExpired | Self::ApplicationLocked
        )
    }
}

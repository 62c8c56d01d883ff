//! Error handling utilities for repositories

use recommend_core::error::DomainError;
use sqlx::Error as SqlxError;

/// Unique index backing token uniqueness
pub const TOKEN_UNIQUE_INDEX: &str = "recommender_invitations_token_key";

/// Partial unique index backing the duplicate guard
pub const ACTIVE_EMAIL_UNIQUE_INDEX: &str = "recommender_invitations_active_email_key";

/// Unique index allowing one profile per invitation
pub const PROFILE_INVITATION_UNIQUE_INDEX: &str = "recommender_profiles_invitation_key";

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Map a unique violation on `index` to `on_unique`, anything else to a database error
pub fn map_unique_violation<F>(e: SqlxError, index: &str, on_unique: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() && db_err.constraint() == Some(index) {
            return on_unique();
        }
    }
    map_db_error(e)
}

/// Classify a failed invitation insert
pub fn map_invitation_insert_error(e: SqlxError, application_id: i64) -> DomainError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return match db_err.constraint() {
                Some(TOKEN_UNIQUE_INDEX) => DomainError::InvitationTokenExists,
                Some(ACTIVE_EMAIL_UNIQUE_INDEX) => DomainError::AlreadyInvited,
                _ => map_db_error(e),
            };
        }
        if db_err.is_foreign_key_violation() {
            return DomainError::ApplicationNotFound(application_id.into());
        }
    }
    map_db_error(e)
}

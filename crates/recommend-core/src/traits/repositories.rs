//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation. Every mutating method is a single atomic
//! unit: implementations either apply all of it or none of it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{Application, Invitation, NewRecommenderProfile, RecommenderProfile};
use crate::error::DomainError;
use crate::value_objects::{InvitationToken, Snowflake};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Application Repository
// ============================================================================

#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Find application by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Application>>;

    /// List applications owned by a student, newest first
    async fn find_by_student(&self, student_id: Snowflake) -> RepoResult<Vec<Application>>;

    /// Create a new application
    async fn create(&self, application: &Application) -> RepoResult<()>;

    /// Replace the university set.
    ///
    /// Fails with `ApplicationLocked` once any invitation under the
    /// application is confirmed, and `ApplicationNotFound` if it is missing.
    async fn update_universities(
        &self,
        id: Snowflake,
        university_ids: &[i64],
        now: DateTime<Utc>,
    ) -> RepoResult<Application>;
}

// ============================================================================
// Invitation Repository
// ============================================================================

#[async_trait]
pub trait InvitationRepository: Send + Sync {
    /// Find invitation by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Invitation>>;

    /// Find invitation by token
    async fn find_by_token(&self, token: &InvitationToken) -> RepoResult<Option<Invitation>>;

    /// List non-deleted invitations for an application, newest first
    async fn find_by_application(&self, application_id: Snowflake)
        -> RepoResult<Vec<Invitation>>;

    /// Insert a new `invited` invitation.
    ///
    /// The duplicate guard lives here: if an `invited` or `confirmed` row
    /// already exists for the same application and email this fails with
    /// `AlreadyInvited`, atomically with the insert. A token collision
    /// fails with `InvitationTokenExists`.
    async fn create(&self, invitation: &Invitation) -> RepoResult<()>;

    /// Move the expiry of a pending invitation to `expires_at`.
    ///
    /// Applies only while the row is `invited` and unexpired at `now`;
    /// returns `None` otherwise. Bumps `resend_count` and `last_sent_at`,
    /// and replaces the custom message when one is given.
    async fn extend_expiry(
        &self,
        id: Snowflake,
        expires_at: DateTime<Utc>,
        custom_message: Option<&str>,
        now: DateTime<Utc>,
    ) -> RepoResult<Option<Invitation>>;

    /// Soft delete a pending invitation. Returns false if it was not pending.
    async fn mark_deleted(&self, id: Snowflake, now: DateTime<Utc>) -> RepoResult<bool>;

    /// Persist expiry of one invitation whose deadline has passed
    async fn mark_expired(&self, id: Snowflake, now: DateTime<Utc>) -> RepoResult<bool>;

    /// Expire every overdue invitation, returning how many moved
    async fn expire_overdue(&self, now: DateTime<Utc>) -> RepoResult<u64>;
}

// ============================================================================
// Recommender Repository
// ============================================================================

#[async_trait]
pub trait RecommenderRepository: Send + Sync {
    /// Find profile by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<RecommenderProfile>>;

    /// Confirm an invitation and provision its recommender, all or nothing.
    ///
    /// Within one transaction: flip the invitation from `invited` to
    /// `confirmed` only if it is still pending and unexpired at `now`, create
    /// the profile, and snapshot the application's universities onto it.
    /// A caller that loses a race sees the invitation's new state as an error
    /// (`InvitationNotPending`, `InvitationExpired` or `InvitationNotFound`).
    async fn confirm_invitation(
        &self,
        invitation_id: Snowflake,
        profile: &NewRecommenderProfile,
        now: DateTime<Utc>,
    ) -> RepoResult<RecommenderProfile>;
}

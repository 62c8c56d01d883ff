//! Invitation entity - a student's request to one recommender, and its lifecycle
//!
//! ```text
//! invited ──confirm──▶ confirmed
//!    │ ───expire────▶ expired
//!    └ ───delete────▶ deleted
//! ```
//!
//! Every state other than `invited` is terminal. An `invited` row whose
//! expiry has been reached behaves as `expired` even before a sweep persists it.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::{InvitationToken, RecommenderEmail, Snowflake};

/// Invitation lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvitationStatus {
    Invited,
    Confirmed,
    Expired,
    Deleted,
}

impl InvitationStatus {
    /// Statuses covered by the one-active-invitation-per-email rule
    pub const ACTIVE: [Self; 2] = [Self::Invited, Self::Confirmed];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Invited => "invited",
            Self::Confirmed => "confirmed",
            Self::Expired => "expired",
            Self::Deleted => "deleted",
        }
    }

    pub fn is_active(self) -> bool {
        Self::ACTIVE.contains(&self)
    }

    pub fn is_terminal(self) -> bool {
        self != Self::Invited
    }

    /// Whether the state machine has an edge from `self` to `next`
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Invited, Self::Confirmed | Self::Expired | Self::Deleted)
        )
    }

    pub fn transition_to(self, next: Self) -> Result<Self, DomainError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(DomainError::InvitationNotPending { status: self })
        }
    }

    /// Status as observed at `now` for a row expiring at `expires_at`
    pub fn effective(self, expires_at: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        if self == Self::Invited && expires_at <= now {
            Self::Expired
        } else {
            self
        }
    }

    /// Guard shared by confirm, resend and delete, applied to an effective status.
    ///
    /// Deleted rows are reported as missing so they stay invisible.
    pub fn ensure_pending(self) -> Result<(), DomainError> {
        match self {
            Self::Invited => Ok(()),
            Self::Expired => Err(DomainError::InvitationExpired),
            Self::Deleted => Err(DomainError::InvitationNotFound),
            status @ Self::Confirmed => Err(DomainError::InvitationNotPending { status }),
        }
    }
}

impl fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvitationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "invited" => Ok(Self::Invited),
            "confirmed" => Ok(Self::Confirmed),
            "expired" => Ok(Self::Expired),
            "deleted" => Ok(Self::Deleted),
            other => Err(DomainError::InternalError(format!(
                "unknown invitation status: {other}"
            ))),
        }
    }
}

/// Invitation entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invitation {
    pub id: Snowflake,
    pub application_id: Snowflake,
    pub recommender_email: RecommenderEmail,
    pub token: InvitationToken,
    pub status: InvitationStatus,
    pub custom_message: Option<String>,
    pub invited_at: DateTime<Utc>,
    pub invitation_expires_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub last_sent_at: DateTime<Utc>,
    pub resend_count: i32,
    /// Back-reference, populated only once confirmed
    pub recommender_profile_id: Option<Snowflake>,
    pub updated_at: DateTime<Utc>,
}

impl Invitation {
    /// Create a fresh `invited` invitation valid for `validity` from `now`
    pub fn new(
        id: Snowflake,
        application_id: Snowflake,
        recommender_email: RecommenderEmail,
        token: InvitationToken,
        custom_message: Option<String>,
        now: DateTime<Utc>,
        validity: Duration,
    ) -> Self {
        Self {
            id,
            application_id,
            recommender_email,
            token,
            status: InvitationStatus::Invited,
            custom_message,
            invited_at: now,
            invitation_expires_at: now + validity,
            confirmed_at: None,
            last_sent_at: now,
            resend_count: 0,
            recommender_profile_id: None,
            updated_at: now,
        }
    }

    /// Expiry is reached at `invitation_expires_at` itself
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.invitation_expires_at <= now
    }

    /// Status as observed at `now`, folding in not-yet-swept expiry
    pub fn effective_status(&self, now: DateTime<Utc>) -> InvitationStatus {
        self.status.effective(self.invitation_expires_at, now)
    }

    pub fn ensure_pending(&self, now: DateTime<Utc>) -> Result<(), DomainError> {
        self.effective_status(now).ensure_pending()
    }

    /// Extend the expiry to `now + validity` and record the send
    pub fn resend(
        &mut self,
        now: DateTime<Utc>,
        validity: Duration,
        custom_message: Option<String>,
    ) -> Result<(), DomainError> {
        self.ensure_pending(now)?;
        self.invitation_expires_at = now + validity;
        self.last_sent_at = now;
        self.resend_count += 1;
        if custom_message.is_some() {
            self.custom_message = custom_message;
        }
        self.updated_at = now;
        Ok(())
    }

    pub fn confirm(
        &mut self,
        now: DateTime<Utc>,
        profile_id: Snowflake,
    ) -> Result<(), DomainError> {
        self.ensure_pending(now)?;
        self.status = self.status.transition_to(InvitationStatus::Confirmed)?;
        self.confirmed_at = Some(now);
        self.recommender_profile_id = Some(profile_id);
        self.updated_at = now;
        Ok(())
    }

    pub fn delete(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        self.ensure_pending(now)?;
        self.status = self.status.transition_to(InvitationStatus::Deleted)?;
        self.updated_at = now;
        Ok(())
    }

    /// Persist lazily detected expiry. Returns whether anything changed.
    pub fn expire(&mut self, now: DateTime<Utc>) -> bool {
        if self.status == InvitationStatus::Invited && self.is_expired_at(now) {
            self.status = InvitationStatus::Expired;
            self.updated_at = now;
            true
        } else {
            false
        }
    }
}

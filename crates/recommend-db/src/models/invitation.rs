//! Invitation database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for recommender_invitations table
#[derive(Debug, Clone, FromRow)]
pub struct InvitationModel {
    pub id: i64,
    pub application_id: i64,
    pub recommender_email: String,
    pub token: String,
    pub status: String,
    pub custom_message: Option<String>,
    pub invited_at: DateTime<Utc>,
    pub invitation_expires_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub last_sent_at: DateTime<Utc>,
    pub resend_count: i32,
    pub recommender_profile_id: Option<i64>,
    pub updated_at: DateTime<Utc>,
}

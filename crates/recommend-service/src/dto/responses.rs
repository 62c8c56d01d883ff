//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.
//! Snowflake IDs are serialized as strings for JavaScript compatibility.

use chrono::{DateTime, Utc};
use serde::Serialize;

use recommend_core::InvitationStatus;

// ============================================================================
// Common Response Types
// ============================================================================

/// Plain acknowledgement body
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ============================================================================
// Application Responses
// ============================================================================

/// Application as seen by its owner
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationResponse {
    pub id: String,
    pub student_id: String,
    pub legal_name: String,
    pub program_type: String,
    pub term: String,
    pub university_ids: Vec<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What a recommender learns about the application before confirming
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationSummary {
    pub legal_name: String,
    pub program_type: String,
    pub term: String,
    pub university_count: usize,
}

// ============================================================================
// Invitation Responses
// ============================================================================

/// Invitation as seen by the owning student.
///
/// `status` is the effective status: a pending invitation past its expiry
/// reports `expired` even before the sweep has persisted it.
#[derive(Debug, Clone, Serialize)]
pub struct InvitationResponse {
    pub id: String,
    pub application_id: String,
    pub recommender_email: String,
    pub status: InvitationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_message: Option<String>,
    pub invite_url: String,
    pub invited_at: DateTime<Utc>,
    pub invitation_expires_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmed_at: Option<DateTime<Utc>>,
    pub last_sent_at: DateTime<Utc>,
    pub resend_count: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommender_profile_id: Option<String>,
}

/// Public view of a pending invitation, reached through its token
#[derive(Debug, Clone, Serialize)]
pub struct InvitationViewResponse {
    pub id: String,
    pub recommender_email: String,
    pub status: InvitationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_message: Option<String>,
    pub invitation_expires_at: DateTime<Utc>,
    pub application: ApplicationSummary,
}

/// Body of a successful resend
#[derive(Debug, Clone, Serialize)]
pub struct ResendInvitationResponse {
    pub message: String,
    pub invitation: InvitationResponse,
}

// ============================================================================
// Recommender Responses
// ============================================================================

/// Recommender profile created by confirmation (never includes the credential)
#[derive(Debug, Clone, Serialize)]
pub struct RecommenderProfileResponse {
    pub id: String,
    pub invitation_id: String,
    pub application_id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub title: String,
    pub organization: String,
    pub relationship_duration: String,
    pub relationship_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile_phone: Option<String>,
    /// Universities this recommender writes for, fixed at confirmation
    pub university_ids: Vec<i64>,
    pub confirmed_at: DateTime<Utc>,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each backing service
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: String,
    /// Absent when Redis is not configured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redis: Option<String>,
}

impl ReadinessResponse {
    /// `redis_healthy` is `None` when no Redis is configured
    pub fn ready(database_healthy: bool, redis_healthy: Option<bool>) -> Self {
        let label = |healthy: bool| if healthy { "healthy" } else { "unhealthy" }.to_string();
        let all_healthy = database_healthy && redis_healthy.unwrap_or(true);
        Self {
            status: if all_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: label(database_healthy),
                redis: redis_healthy.map(label),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}

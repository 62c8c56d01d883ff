//! Test fixtures and data generators
//!
//! Request bodies and the response shapes the tests read back.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// A recommender address no other test uses
pub fn unique_email() -> String {
    format!(
        "recommender{}-{}@example.com",
        unique_suffix(),
        Utc::now().timestamp_micros()
    )
}

#[derive(Debug, Serialize)]
pub struct CreateApplicationRequest {
    pub legal_name: String,
    pub program_type: String,
    pub term: String,
    pub university_ids: Vec<i64>,
}

impl CreateApplicationRequest {
    pub fn with_universities(university_ids: Vec<i64>) -> Self {
        Self {
            legal_name: "Jordan Rivera".to_string(),
            program_type: "PhD".to_string(),
            term: "Fall 2027".to_string(),
            university_ids,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UpdateUniversitiesRequest {
    pub university_ids: Vec<i64>,
}

#[derive(Debug, Serialize)]
pub struct CreateInvitationRequest {
    pub recommender_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_message: Option<String>,
}

impl CreateInvitationRequest {
    pub fn to(email: &str) -> Self {
        Self {
            recommender_email: email.to_string(),
            custom_message: Some("Thank you for supporting my application.".to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfirmInvitationRequest {
    pub first_name: String,
    pub last_name: String,
    pub title: String,
    pub organization: String,
    pub relationship_duration: String,
    pub relationship_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile_phone: Option<String>,
    pub password: String,
}

impl ConfirmInvitationRequest {
    pub fn valid() -> Self {
        Self {
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            title: "Professor".to_string(),
            organization: "Yale University".to_string(),
            relationship_duration: "3 years".to_string(),
            relationship_type: "Research advisor".to_string(),
            mobile_phone: Some("+1 203 555 0100".to_string()),
            password: "Correct-Horse-9".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ApplicationResponse {
    pub id: String,
    pub student_id: String,
    pub university_ids: Vec<i64>,
}

#[derive(Debug, Deserialize)]
pub struct InvitationResponse {
    pub id: String,
    pub application_id: String,
    pub recommender_email: String,
    pub status: String,
    pub invite_url: String,
    pub invitation_expires_at: DateTime<Utc>,
    pub confirmed_at: Option<String>,
    pub resend_count: i32,
    pub recommender_profile_id: Option<String>,
}

impl InvitationResponse {
    /// Token carried in the invite link
    pub fn token(&self) -> &str {
        self.invite_url.rsplit('/').next().unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
pub struct ApplicationSummary {
    pub legal_name: String,
    pub university_count: usize,
}

#[derive(Debug, Deserialize)]
pub struct InvitationViewResponse {
    pub id: String,
    pub recommender_email: String,
    pub status: String,
    pub application: ApplicationSummary,
}

#[derive(Debug, Deserialize)]
pub struct ResendInvitationResponse {
    pub message: String,
    pub invitation: InvitationResponse,
}

#[derive(Debug, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct RecommenderProfileResponse {
    pub id: String,
    pub invitation_id: String,
    pub email: String,
    pub university_ids: Vec<i64>,
    pub confirmed_at: String,
}

//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.

use serde::Deserialize;
use validator::{Validate, ValidationError};

/// Upper bound on a student's note to the recommender
pub const MAX_CUSTOM_MESSAGE_LEN: u64 = 2000;

// ============================================================================
// Application Requests
// ============================================================================

/// Create application request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateApplicationRequest {
    #[validate(length(min = 1, max = 200, message = "Legal name must be 1-200 characters"))]
    #[validate(custom(function = "non_blank"))]
    pub legal_name: String,

    #[validate(length(min = 1, max = 100, message = "Program type must be 1-100 characters"))]
    #[validate(custom(function = "non_blank"))]
    pub program_type: String,

    #[validate(length(min = 1, max = 50, message = "Term must be 1-50 characters"))]
    #[validate(custom(function = "non_blank"))]
    pub term: String,

    #[serde(default)]
    #[validate(length(max = 20, message = "At most 20 universities"))]
    pub university_ids: Vec<i64>,
}

/// Replace the application's target universities
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateUniversitiesRequest {
    #[validate(length(max = 20, message = "At most 20 universities"))]
    pub university_ids: Vec<i64>,
}

// ============================================================================
// Invitation Requests
// ============================================================================

/// Send invitation request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateInvitationRequest {
    #[validate(email(message = "Invalid email format"))]
    #[validate(length(max = 255, message = "Email must be at most 255 characters"))]
    pub recommender_email: String,

    #[validate(length(max = 2000, message = "Message must be at most 2000 characters"))]
    pub custom_message: Option<String>,
}

/// Resend invitation request; omitting the message keeps the previous one
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ResendInvitationRequest {
    #[validate(length(max = 2000, message = "Message must be at most 2000 characters"))]
    pub custom_message: Option<String>,
}

/// Recommender profile submitted with the invitation token
#[derive(Clone, Deserialize, Validate)]
pub struct ConfirmInvitationRequest {
    #[validate(length(min = 1, max = 100, message = "First name must be 1-100 characters"))]
    #[validate(custom(function = "non_blank"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100, message = "Last name must be 1-100 characters"))]
    #[validate(custom(function = "non_blank"))]
    pub last_name: String,

    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    #[validate(custom(function = "non_blank"))]
    pub title: String,

    #[validate(length(min = 1, max = 100, message = "Organization must be 1-100 characters"))]
    #[validate(custom(function = "non_blank"))]
    pub organization: String,

    #[validate(length(
        min = 1,
        max = 100,
        message = "Relationship duration must be 1-100 characters"
    ))]
    #[validate(custom(function = "non_blank"))]
    pub relationship_duration: String,

    #[validate(length(
        min = 1,
        max = 100,
        message = "Relationship type must be 1-100 characters"
    ))]
    #[validate(custom(function = "non_blank"))]
    pub relationship_type: String,

    #[validate(custom(function = "validate_mobile_phone"))]
    pub mobile_phone: Option<String>,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,
}

impl std::fmt::Debug for ConfirmInvitationRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfirmInvitationRequest")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("organization", &self.organization)
            .field("password", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

/// Required text must carry something besides whitespace
fn non_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Must not be blank".into());
        Err(err)
    } else {
        Ok(())
    }
}

/// 7-20 characters of digits, spaces and `+ - ( )`, with at least 7 digits
fn validate_mobile_phone(phone: &str) -> Result<(), ValidationError> {
    let allowed = |c: char| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')');
    let len = phone.chars().count();
    let digits = phone.chars().filter(char::is_ascii_digit).count();

    if (7..=20).contains(&len) && digits >= 7 && phone.chars().all(allowed) {
        Ok(())
    } else {
        let mut err = ValidationError::new("mobile_phone");
        err.message = Some("Mobile phone must be 7-20 digits, spaces or + - ( )".into());
        Err(err)
    }
}

//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use chrono::{DateTime, Utc};
use recommend_core::entities::{Application, Invitation, RecommenderProfile};
use recommend_core::InvitationToken;

use super::responses::{
    ApplicationResponse, ApplicationSummary, InvitationResponse, InvitationViewResponse,
    RecommenderProfileResponse,
};

/// Link a recommender follows to view and confirm an invitation
pub fn invite_url(portal_base_url: &str, token: &InvitationToken) -> String {
    format!(
        "{}/invitations/{}",
        portal_base_url.trim_end_matches('/'),
        token.as_str()
    )
}

// ============================================================================
// Application Mappers
// ============================================================================

impl From<&Application> for ApplicationResponse {
    fn from(app: &Application) -> Self {
        Self {
            id: app.id.to_string(),
            student_id: app.student_id.to_string(),
            legal_name: app.legal_name.clone(),
            program_type: app.program_type.clone(),
            term: app.term.clone(),
            university_ids: app.university_ids.clone(),
            created_at: app.created_at,
            updated_at: app.updated_at,
        }
    }
}

impl From<Application> for ApplicationResponse {
    fn from(app: Application) -> Self {
        Self::from(&app)
    }
}

impl From<&Application> for ApplicationSummary {
    fn from(app: &Application) -> Self {
        Self {
            legal_name: app.legal_name.clone(),
            program_type: app.program_type.clone(),
            term: app.term.clone(),
            university_count: app.university_ids.len(),
        }
    }
}

// ============================================================================
// Invitation Mappers
// ============================================================================

/// Helper struct for rendering an invitation at a point in time
pub struct InvitationAt<'a> {
    pub invitation: &'a Invitation,
    pub now: DateTime<Utc>,
    pub portal_base_url: &'a str,
}

impl From<InvitationAt<'_>> for InvitationResponse {
    fn from(view: InvitationAt<'_>) -> Self {
        let inv = view.invitation;
        Self {
            id: inv.id.to_string(),
            application_id: inv.application_id.to_string(),
            recommender_email: inv.recommender_email.as_str().to_string(),
            status: inv.effective_status(view.now),
            custom_message: inv.custom_message.clone(),
            invite_url: invite_url(view.portal_base_url, &inv.token),
            invited_at: inv.invited_at,
            invitation_expires_at: inv.invitation_expires_at,
            confirmed_at: inv.confirmed_at,
            last_sent_at: inv.last_sent_at,
            resend_count: inv.resend_count,
            recommender_profile_id: inv.recommender_profile_id.map(|id| id.to_string()),
        }
    }
}

/// Helper struct pairing a pending invitation with its application
pub struct InvitationWithApplication<'a> {
    pub invitation: &'a Invitation,
    pub application: &'a Application,
}

impl From<InvitationWithApplication<'_>> for InvitationViewResponse {
    fn from(view: InvitationWithApplication<'_>) -> Self {
        let inv = view.invitation;
        Self {
            id: inv.id.to_string(),
            recommender_email: inv.recommender_email.as_str().to_string(),
            status: inv.status,
            custom_message: inv.custom_message.clone(),
            invitation_expires_at: inv.invitation_expires_at,
            application: ApplicationSummary::from(view.application),
        }
    }
}

// ============================================================================
// Recommender Mappers
// ============================================================================

impl From<&RecommenderProfile> for RecommenderProfileResponse {
    fn from(profile: &RecommenderProfile) -> Self {
        let details = &profile.details;
        Self {
            id: profile.id.to_string(),
            invitation_id: profile.invitation_id.to_string(),
            application_id: profile.application_id.to_string(),
            email: profile.email.as_str().to_string(),
            first_name: details.first_name.clone(),
            last_name: details.last_name.clone(),
            title: details.title.clone(),
            organization: details.organization.clone(),
            relationship_duration: details.relationship_duration.clone(),
            relationship_type: details.relationship_type.clone(),
            mobile_phone: details.mobile_phone.clone(),
            university_ids: profile.university_ids.clone(),
            confirmed_at: profile.confirmed_at,
        }
    }
}

impl From<RecommenderProfile> for RecommenderProfileResponse {
    fn from(profile: RecommenderProfile) -> Self {
        Self::from(&profile)
    }
}

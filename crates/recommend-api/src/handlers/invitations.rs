//! Invitation handlers
//!
//! Student-side invitation management plus the two public token endpoints
//! a recommender reaches from the emailed link.

use axum::{
    extract::{Path, State},
    Json,
};
use recommend_service::dto::{
    ConfirmInvitationRequest, CreateInvitationRequest, InvitationResponse,
    InvitationViewResponse, MessageResponse, RecommenderProfileResponse, ResendInvitationRequest,
    ResendInvitationResponse,
};
use recommend_service::{ConfirmationService, InvitationService};

use crate::extractors::{
    ApplicationPath, AuthStudent, InvitationPath, JsonBody, OptionalJsonBody, TokenPath,
};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Invite a recommender
///
/// POST /applications/{application_id}/invitations
pub async fn create_invitation(
    State(state): State<AppState>,
    auth: AuthStudent,
    Path(path): Path<ApplicationPath>,
    JsonBody(request): JsonBody<CreateInvitationRequest>,
) -> ApiResult<Created<Json<InvitationResponse>>> {
    let application_id = path.application_id()?;

    let service = InvitationService::new(state.service_context());
    let response = service
        .create_invitation(auth.student_id, application_id, request)
        .await?;
    Ok(Created(Json(response)))
}

/// List invitations of an application
///
/// GET /applications/{application_id}/invitations
pub async fn list_invitations(
    State(state): State<AppState>,
    auth: AuthStudent,
    Path(path): Path<ApplicationPath>,
) -> ApiResult<Json<Vec<InvitationResponse>>> {
    let application_id = path.application_id()?;

    let service = InvitationService::new(state.service_context());
    let invitations = service
        .list_invitations(auth.student_id, application_id)
        .await?;
    Ok(Json(invitations))
}

/// Resend a pending invitation with a fresh expiry
///
/// POST /applications/{application_id}/invitations/{recommender_id}/resend
pub async fn resend_invitation(
    State(state): State<AppState>,
    auth: AuthStudent,
    Path(path): Path<InvitationPath>,
    OptionalJsonBody(request): OptionalJsonBody<ResendInvitationRequest>,
) -> ApiResult<Json<ResendInvitationResponse>> {
    let application_id = path.application_id()?;
    let invitation_id = path.invitation_id()?;

    let service = InvitationService::new(state.service_context());
    let response = service
        .resend_invitation(auth.student_id, application_id, invitation_id, request)
        .await?;
    Ok(Json(response))
}

/// Withdraw a pending invitation
///
/// DELETE /applications/{application_id}/invitations/{recommender_id}
pub async fn delete_invitation(
    State(state): State<AppState>,
    auth: AuthStudent,
    Path(path): Path<InvitationPath>,
) -> ApiResult<Json<MessageResponse>> {
    let application_id = path.application_id()?;
    let invitation_id = path.invitation_id()?;

    let service = InvitationService::new(state.service_context());
    let response = service
        .delete_invitation(auth.student_id, application_id, invitation_id)
        .await?;
    Ok(Json(response))
}

/// View an invitation by token (no auth required)
///
/// GET /invitations/{token}
pub async fn view_invitation(
    State(state): State<AppState>,
    Path(path): Path<TokenPath>,
) -> ApiResult<Json<InvitationViewResponse>> {
    let service = InvitationService::new(state.service_context());
    let response = service.view_invitation(&path.token).await?;
    Ok(Json(response))
}

/// Confirm an invitation and create the recommender profile (no auth required)
///
/// POST /invitations/{token}/confirm
pub async fn confirm_invitation(
    State(state): State<AppState>,
    Path(path): Path<TokenPath>,
    JsonBody(request): JsonBody<ConfirmInvitationRequest>,
) -> ApiResult<Created<Json<RecommenderProfileResponse>>> {
    let service = ConfirmationService::new(state.service_context());
    let response = service.confirm_invitation(&path.token, request).await?;
    Ok(Created(Json(response)))
}

//! Confirmation service
//!
//! Turns a pending invitation into a recommender profile. The store claims
//! the invitation, snapshots the application's universities and inserts the
//! profile in one transaction; this layer validates input first and
//! notifies after commit.

use serde_json::json;
use tracing::{debug, info, instrument};
use validator::Validate;

use recommend_common::auth::{hash_password, validate_password_strength};
use recommend_core::entities::{NewRecommenderProfile, ProfileDetails};
use recommend_core::error::DomainError;
use recommend_core::traits::{Notification, NotificationKind};
use recommend_core::InvitationToken;

use crate::dto::{ConfirmInvitationRequest, RecommenderProfileResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::invitation::persist_expiry;
use super::notifier::notify;

/// Confirmation service
pub struct ConfirmationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ConfirmationService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Confirm the invitation behind `raw_token` and provision the recommender
    #[instrument(skip(self, raw_token, request))]
    pub async fn confirm_invitation(
        &self,
        raw_token: &str,
        request: ConfirmInvitationRequest,
    ) -> ServiceResult<RecommenderProfileResponse> {
        let token = InvitationToken::parse(raw_token).ok_or(DomainError::InvitationNotFound)?;
        let now = self.ctx.now();

        let invitation = self
            .ctx
            .invitation_repo()
            .find_by_token(&token)
            .await?
            .ok_or(DomainError::InvitationNotFound)?;

        if let Err(rejection) = invitation.ensure_pending(now) {
            persist_expiry(self.ctx, &invitation, now).await;
            debug!(invitation_id = %invitation.id, code = rejection.code(), "Confirmation rejected");
            return Err(rejection.into());
        }

        // Nothing is written unless every field passes
        request.validate()?;
        validate_password_strength(&request.password)?;
        let password_hash = hash_credential(request.password).await?;

        let profile = NewRecommenderProfile {
            id: self.ctx.generate_id(),
            details: ProfileDetails {
                first_name: request.first_name.trim().to_string(),
                last_name: request.last_name.trim().to_string(),
                title: request.title.trim().to_string(),
                organization: request.organization.trim().to_string(),
                relationship_duration: request.relationship_duration.trim().to_string(),
                relationship_type: request.relationship_type.trim().to_string(),
                mobile_phone: request
                    .mobile_phone
                    .map(|p| p.trim().to_string())
                    .filter(|p| !p.is_empty()),
            },
            password_hash,
        };

        let created = self
            .ctx
            .bounded(
                "confirm_invitation",
                self.ctx
                    .recommender_repo()
                    .confirm_invitation(invitation.id, &profile, now),
            )
            .await
            .inspect_err(|e| {
                debug!(invitation_id = %invitation.id, error = %e, "Confirmation did not commit");
            })?;

        info!(
            invitation_id = %invitation.id,
            profile_id = %created.id,
            application_id = %created.application_id,
            universities = created.university_count(),
            "Recommender confirmed"
        );

        let notification = Notification::new(
            NotificationKind::Confirmation,
            created.email.as_str(),
            json!({
                "profile_id": created.id,
                "invitation_id": created.invitation_id,
                "application_id": created.application_id,
                "recommender_name": created.full_name(),
                "university_ids": created.university_ids,
            }),
            now,
        );
        notify(self.ctx, invitation.id, notification).await;

        Ok(RecommenderProfileResponse::from(created))
    }
}

/// Hash on the blocking pool; Argon2 takes tens of milliseconds
async fn hash_credential(password: String) -> ServiceResult<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| ServiceError::internal(format!("password hashing task failed: {e}")))?
        .map_err(ServiceError::from)
}

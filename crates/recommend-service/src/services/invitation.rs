//! Invitation service
//!
//! Sending, listing, viewing, resending and deleting recommender invitations.
//! Status changes go through conditional updates in the store; when one
//! matches nothing the row is re-read to explain why.

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

use recommend_core::entities::{Application, Invitation, InvitationStatus};
use recommend_core::error::DomainError;
use recommend_core::traits::{Notification, NotificationKind};
use recommend_core::{InvitationToken, RecommenderEmail, Snowflake};

use crate::dto::{
    invite_url, CreateInvitationRequest, InvitationAt, InvitationResponse, InvitationViewResponse,
    InvitationWithApplication, MessageResponse, ResendInvitationRequest, ResendInvitationResponse,
};

use super::application::ApplicationService;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::notifier::notify;

/// Fresh tokens tried before giving up on a create
const TOKEN_ATTEMPTS: usize = 3;

/// Invitation service
pub struct InvitationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> InvitationService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Invite a recommender to write for one of the student's applications
    #[instrument(skip(self, request))]
    pub async fn create_invitation(
        &self,
        student_id: Snowflake,
        application_id: Snowflake,
        request: CreateInvitationRequest,
    ) -> ServiceResult<InvitationResponse> {
        request.validate()?;
        let email = RecommenderEmail::parse(&request.recommender_email)?;
        let custom_message = non_blank(request.custom_message);

        let application = ApplicationService::new(self.ctx)
            .load_owned(student_id, application_id)
            .await?;

        let now = self.ctx.now();
        let validity = self.ctx.settings().expiry_window();

        let invitation = self
            .ctx
            .bounded("create_invitation", async {
                for attempt in 1..=TOKEN_ATTEMPTS {
                    let invitation = Invitation::new(
                        self.ctx.generate_id(),
                        application.id,
                        email.clone(),
                        InvitationToken::issue(),
                        custom_message.clone(),
                        now,
                        validity,
                    );

                    match self.ctx.invitation_repo().create(&invitation).await {
                        Ok(()) => return Ok(invitation),
                        Err(DomainError::InvitationTokenExists) => {
                            warn!(attempt, "Invitation token collision, issuing a new one");
                        }
                        Err(e) => return Err(ServiceError::from(e)),
                    }
                }
                Err(ServiceError::internal("could not issue a unique invitation token"))
            })
            .await
            .inspect_err(|e| {
                if matches!(e, ServiceError::Domain(DomainError::AlreadyInvited)) {
                    info!(application_id = %application.id, "Duplicate invitation rejected");
                }
            })?;

        info!(
            invitation_id = %invitation.id,
            application_id = %application.id,
            token = %invitation.token.redacted(),
            expires_at = %invitation.invitation_expires_at,
            "Invitation created"
        );

        let notification = self.invitation_notification(
            NotificationKind::Invitation,
            &invitation,
            &application,
            now,
        );
        notify(self.ctx, invitation.id, notification).await;

        Ok(self.render(&invitation, now))
    }

    /// Every non-deleted invitation of the application, newest first
    #[instrument(skip(self))]
    pub async fn list_invitations(
        &self,
        student_id: Snowflake,
        application_id: Snowflake,
    ) -> ServiceResult<Vec<InvitationResponse>> {
        ApplicationService::new(self.ctx)
            .load_owned(student_id, application_id)
            .await?;

        let now = self.ctx.now();
        let invitations = self
            .ctx
            .invitation_repo()
            .find_by_application(application_id)
            .await?;

        Ok(invitations
            .iter()
            .map(|invitation| self.render(invitation, now))
            .collect())
    }

    /// Public lookup by token. Anything but a live pending invitation is 404.
    #[instrument(skip(self, raw_token))]
    pub async fn view_invitation(&self, raw_token: &str) -> ServiceResult<InvitationViewResponse> {
        let token = InvitationToken::parse(raw_token).ok_or(DomainError::InvitationNotFound)?;
        let now = self.ctx.now();

        let invitation = self
            .ctx
            .invitation_repo()
            .find_by_token(&token)
            .await?
            .ok_or(DomainError::InvitationNotFound)?;

        match invitation.effective_status(now) {
            InvitationStatus::Invited => {}
            status => {
                persist_expiry(self.ctx, &invitation, now).await;
                debug!(
                    invitation_id = %invitation.id,
                    status = %status,
                    "Token resolves to a closed invitation"
                );
                return Err(DomainError::InvitationNotFound.into());
            }
        }

        let application = self
            .ctx
            .application_repo()
            .find_by_id(invitation.application_id)
            .await?
            .ok_or_else(|| ServiceError::internal("Invitation application not found"))?;

        Ok(InvitationViewResponse::from(InvitationWithApplication {
            invitation: &invitation,
            application: &application,
        }))
    }

    /// Extend a pending invitation's expiry from now and send it again
    #[instrument(skip(self, request))]
    pub async fn resend_invitation(
        &self,
        student_id: Snowflake,
        application_id: Snowflake,
        invitation_id: Snowflake,
        request: ResendInvitationRequest,
    ) -> ServiceResult<ResendInvitationResponse> {
        request.validate()?;
        let custom_message = non_blank(request.custom_message);

        let application = ApplicationService::new(self.ctx)
            .load_owned(student_id, application_id)
            .await?;
        let invitation = self.load_under(&application, invitation_id).await?;

        let now = self.ctx.now();
        self.ensure_pending(&invitation, now).await?;

        let expires_at = now + self.ctx.settings().expiry_window();
        let updated = self
            .ctx
            .bounded(
                "resend_invitation",
                self.ctx.invitation_repo().extend_expiry(
                    invitation.id,
                    expires_at,
                    custom_message.as_deref(),
                    now,
                ),
            )
            .await?;

        let Some(updated) = updated else {
            return Err(self.explain_lost_race(invitation.id, now).await);
        };

        info!(
            invitation_id = %updated.id,
            resend_count = updated.resend_count,
            expires_at = %updated.invitation_expires_at,
            "Invitation resent"
        );

        let notification =
            self.invitation_notification(NotificationKind::Resend, &updated, &application, now);
        notify(self.ctx, updated.id, notification).await;

        Ok(ResendInvitationResponse {
            message: "Invitation resent".to_string(),
            invitation: self.render(&updated, now),
        })
    }

    /// Withdraw a pending invitation
    #[instrument(skip(self))]
    pub async fn delete_invitation(
        &self,
        student_id: Snowflake,
        application_id: Snowflake,
        invitation_id: Snowflake,
    ) -> ServiceResult<MessageResponse> {
        let application = ApplicationService::new(self.ctx)
            .load_owned(student_id, application_id)
            .await?;
        let invitation = self.load_under(&application, invitation_id).await?;

        let now = self.ctx.now();
        self.ensure_pending(&invitation, now).await?;

        let deleted = self
            .ctx
            .bounded(
                "delete_invitation",
                self.ctx.invitation_repo().mark_deleted(invitation.id, now),
            )
            .await?;

        if !deleted {
            return Err(self.explain_lost_race(invitation.id, now).await);
        }

        info!(invitation_id = %invitation.id, application_id = %application.id, "Invitation deleted");
        Ok(MessageResponse::new("Invitation deleted"))
    }

    /// Find an invitation under `application`; deleted or foreign rows are missing
    async fn load_under(
        &self,
        application: &Application,
        invitation_id: Snowflake,
    ) -> ServiceResult<Invitation> {
        match self.ctx.invitation_repo().find_by_id(invitation_id).await? {
            Some(inv)
                if inv.application_id == application.id
                    && inv.status != InvitationStatus::Deleted =>
            {
                Ok(inv)
            }
            _ => Err(DomainError::InvitationNotFound.into()),
        }
    }

    async fn ensure_pending(&self, invitation: &Invitation, now: DateTime<Utc>) -> ServiceResult<()> {
        if let Err(rejection) = invitation.ensure_pending(now) {
            persist_expiry(self.ctx, invitation, now).await;
            debug!(invitation_id = %invitation.id, code = rejection.code(), "Invitation not pending");
            return Err(rejection.into());
        }
        Ok(())
    }

    /// A guarded update matched nothing: someone else moved the row first
    async fn explain_lost_race(&self, invitation_id: Snowflake, now: DateTime<Utc>) -> ServiceError {
        let current = match self.ctx.invitation_repo().find_by_id(invitation_id).await {
            Ok(current) => current,
            Err(e) => return e.into(),
        };

        let Some(current) = current else {
            return DomainError::InvitationNotFound.into();
        };

        debug!(invitation_id = %invitation_id, status = %current.status, "Lost a status race");
        match current.ensure_pending(now) {
            Err(rejection) => rejection.into(),
            Ok(()) => ServiceError::internal(format!(
                "invitation {invitation_id} is pending but could not be updated"
            )),
        }
    }

    fn render(&self, invitation: &Invitation, now: DateTime<Utc>) -> InvitationResponse {
        InvitationResponse::from(InvitationAt {
            invitation,
            now,
            portal_base_url: &self.ctx.settings().portal_base_url,
        })
    }

    fn invitation_notification(
        &self,
        kind: NotificationKind,
        invitation: &Invitation,
        application: &Application,
        now: DateTime<Utc>,
    ) -> Notification {
        Notification::new(
            kind,
            invitation.recommender_email.as_str(),
            json!({
                "invitation_id": invitation.id,
                "application_id": application.id,
                "student_name": application.legal_name,
                "program_type": application.program_type,
                "term": application.term,
                "invite_url": invite_url(&self.ctx.settings().portal_base_url, &invitation.token),
                "custom_message": invitation.custom_message,
                "expires_at": invitation.invitation_expires_at,
            }),
            now,
        )
    }
}

/// Persist an expiry that was only detected on read.
///
/// Best-effort: the caller already treats the row as expired and the sweep
/// catches anything missed here.
pub(crate) async fn persist_expiry(ctx: &ServiceContext, invitation: &Invitation, now: DateTime<Utc>) {
    if invitation.status != InvitationStatus::Invited || !invitation.is_expired_at(now) {
        return;
    }

    match ctx.invitation_repo().mark_expired(invitation.id, now).await {
        Ok(true) => info!(invitation_id = %invitation.id, "Invitation expired on access"),
        Ok(false) => {}
        Err(e) => warn!(invitation_id = %invitation.id, error = %e, "Failed to persist expiry"),
    }
}

fn non_blank(message: Option<String>) -> Option<String> {
    message
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
}

//! PostgreSQL implementation of InvitationRepository
//!
//! Every status change is a single conditional UPDATE keyed on the expected
//! prior status; the affected-row count tells the caller whether it won.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, info, instrument};

use recommend_core::entities::Invitation;
use recommend_core::traits::{InvitationRepository, RepoResult};
use recommend_core::value_objects::{InvitationToken, Snowflake};

use crate::models::InvitationModel;

use super::error::{map_db_error, map_invitation_insert_error};

/// PostgreSQL implementation of InvitationRepository
#[derive(Clone)]
pub struct PgInvitationRepository {
    pool: PgPool,
}

impl PgInvitationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InvitationRepository for PgInvitationRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Invitation>> {
        let result = sqlx::query_as::<_, InvitationModel>(
            r#"
            SELECT id, application_id, recommender_email, token, status, custom_message,
                   invited_at, invitation_expires_at, confirmed_at, last_sent_at,
                   resend_count, recommender_profile_id, updated_at
            FROM recommender_invitations
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Invitation::try_from).transpose()
    }

    #[instrument(skip(self, token), fields(token = %token.redacted()))]
    async fn find_by_token(&self, token: &InvitationToken) -> RepoResult<Option<Invitation>> {
        let result = sqlx::query_as::<_, InvitationModel>(
            r#"
            SELECT id, application_id, recommender_email, token, status, custom_message,
                   invited_at, invitation_expires_at, confirmed_at, last_sent_at,
                   resend_count, recommender_profile_id, updated_at
            FROM recommender_invitations
            WHERE token = $1
            "#,
        )
        .bind(token.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Invitation::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_application(
        &self,
        application_id: Snowflake,
    ) -> RepoResult<Vec<Invitation>> {
        let results = sqlx::query_as::<_, InvitationModel>(
            r#"
            SELECT id, application_id, recommender_email, token, status, custom_message,
                   invited_at, invitation_expires_at, confirmed_at, last_sent_at,
                   resend_count, recommender_profile_id, updated_at
            FROM recommender_invitations
            WHERE application_id = $1 AND status <> 'deleted'
            ORDER BY invited_at DESC, id DESC
            "#,
        )
        .bind(application_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(Invitation::try_from).collect()
    }

    #[instrument(skip(self, invitation), fields(invitation_id = %invitation.id))]
    async fn create(&self, invitation: &Invitation) -> RepoResult<()> {
        // The partial unique index on (application_id, lower(email)) for
        // active statuses makes check-and-insert one atomic step
        sqlx::query(
            r#"
            INSERT INTO recommender_invitations (
                id, application_id, recommender_email, token, status, custom_message,
                invited_at, invitation_expires_at, last_sent_at, resend_count, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(invitation.id.into_inner())
        .bind(invitation.application_id.into_inner())
        .bind(invitation.recommender_email.as_str())
        .bind(invitation.token.as_str())
        .bind(invitation.status.as_str())
        .bind(invitation.custom_message.as_deref())
        .bind(invitation.invited_at)
        .bind(invitation.invitation_expires_at)
        .bind(invitation.last_sent_at)
        .bind(invitation.resend_count)
        .bind(invitation.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_invitation_insert_error(e, invitation.application_id.into_inner()))?;

        Ok(())
    }

    #[instrument(skip(self, custom_message))]
    async fn extend_expiry(
        &self,
        id: Snowflake,
        expires_at: DateTime<Utc>,
        custom_message: Option<&str>,
        now: DateTime<Utc>,
    ) -> RepoResult<Option<Invitation>> {
        let result = sqlx::query_as::<_, InvitationModel>(
            r#"
            UPDATE recommender_invitations
            SET invitation_expires_at = $2,
                custom_message = COALESCE($3, custom_message),
                last_sent_at = $4,
                resend_count = resend_count + 1,
                updated_at = $4
            WHERE id = $1
              AND status = 'invited'
              AND invitation_expires_at > $4
            RETURNING id, application_id, recommender_email, token, status, custom_message,
                      invited_at, invitation_expires_at, confirmed_at, last_sent_at,
                      resend_count, recommender_profile_id, updated_at
            "#,
        )
        .bind(id.into_inner())
        .bind(expires_at)
        .bind(custom_message)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.is_none() {
            debug!(invitation_id = %id, "Expiry extension matched no pending invitation");
        }
        result.map(Invitation::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn mark_deleted(&self, id: Snowflake, now: DateTime<Utc>) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE recommender_invitations
            SET status = 'deleted', updated_at = $2
            WHERE id = $1
              AND status = 'invited'
              AND invitation_expires_at > $2
            "#,
        )
        .bind(id.into_inner())
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self))]
    async fn mark_expired(&self, id: Snowflake, now: DateTime<Utc>) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE recommender_invitations
            SET status = 'expired', updated_at = $2
            WHERE id = $1
              AND status = 'invited'
              AND invitation_expires_at <= $2
            "#,
        )
        .bind(id.into_inner())
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self))]
    async fn expire_overdue(&self, now: DateTime<Utc>) -> RepoResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE recommender_invitations
            SET status = 'expired', updated_at = $1
            WHERE status = 'invited'
              AND invitation_expires_at <= $1
            "#,
        )
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        let expired = result.rows_affected();
        if expired > 0 {
            info!(expired, "Overdue invitations expired");
        }
        Ok(expired)
    }
}

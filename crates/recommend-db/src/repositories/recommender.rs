//! PostgreSQL implementation of RecommenderRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{info, instrument};

use recommend_core::entities::{InvitationStatus, NewRecommenderProfile, RecommenderProfile};
use recommend_core::error::DomainError;
use recommend_core::traits::{RecommenderRepository, RepoResult};
use recommend_core::value_objects::Snowflake;

use crate::models::RecommenderProfileModel;

use super::error::{map_db_error, map_unique_violation, PROFILE_INVITATION_UNIQUE_INDEX};

/// PostgreSQL implementation of RecommenderRepository
#[derive(Clone)]
pub struct PgRecommenderRepository {
    pool: PgPool,
}

impl PgRecommenderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecommenderRepository for PgRecommenderRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<RecommenderProfile>> {
        let result = sqlx::query_as::<_, RecommenderProfileModel>(
            r#"
            SELECT id, invitation_id, application_id, email, first_name, last_name, title,
                   organization, relationship_duration, relationship_type, mobile_phone,
                   university_ids, confirmed_at
            FROM recommender_profiles
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(RecommenderProfile::from))
    }

    #[instrument(skip(self))]
    async fn confirm_invitation(
        &self,
        invitation_id: Snowflake,
        profile: &NewRecommenderProfile,
        now: DateTime<Utc>,
    ) -> RepoResult<RecommenderProfile> {
        // Dropping `tx` on any early return rolls everything back
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // Claim the invitation. A concurrent confirmer blocks on the row lock
        // and then matches zero rows once the status has moved on.
        let claimed = sqlx::query_as::<_, (i64, String)>(
            r#"
            UPDATE recommender_invitations
            SET status = 'confirmed',
                confirmed_at = $2,
                recommender_profile_id = $3,
                updated_at = $2
            WHERE id = $1
              AND status = 'invited'
              AND invitation_expires_at > $2
            RETURNING application_id, recommender_email
            "#,
        )
        .bind(invitation_id.into_inner())
        .bind(now)
        .bind(profile.id.into_inner())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let Some((application_id, email)) = claimed else {
            let current = sqlx::query_as::<_, (String, DateTime<Utc>)>(
                r#"
                SELECT status, invitation_expires_at
                FROM recommender_invitations
                WHERE id = $1
                "#,
            )
            .bind(invitation_id.into_inner())
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_db_error)?;

            return Err(match current {
                None => DomainError::InvitationNotFound,
                Some((status, expires_at)) => {
                    let status = status.parse::<InvitationStatus>()?;
                    match status.effective(expires_at, now).ensure_pending() {
                        Err(rejection) => rejection,
                        // Pending rows always match the claim above
                        Ok(()) => DomainError::InternalError(format!(
                            "invitation {invitation_id} could not be claimed"
                        )),
                    }
                }
            });
        };

        let university_ids = sqlx::query_scalar::<_, Vec<i64>>(
            "SELECT university_ids FROM applications WHERE id = $1 FOR SHARE",
        )
        .bind(application_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let details = &profile.details;
        let created = sqlx::query_as::<_, RecommenderProfileModel>(
            r#"
            INSERT INTO recommender_profiles (
                id, invitation_id, application_id, email, first_name, last_name, title,
                organization, relationship_duration, relationship_type, mobile_phone,
                password_hash, university_ids, confirmed_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING id, invitation_id, application_id, email, first_name, last_name, title,
                      organization, relationship_duration, relationship_type, mobile_phone,
                      university_ids, confirmed_at
            "#,
        )
        .bind(profile.id.into_inner())
        .bind(invitation_id.into_inner())
        .bind(application_id)
        .bind(&email)
        .bind(&details.first_name)
        .bind(&details.last_name)
        .bind(&details.title)
        .bind(&details.organization)
        .bind(&details.relationship_duration)
        .bind(&details.relationship_type)
        .bind(details.mobile_phone.as_deref())
        .bind(&profile.password_hash)
        .bind(&university_ids)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            map_unique_violation(e, PROFILE_INVITATION_UNIQUE_INDEX, || {
                DomainError::InvitationNotPending {
                    status: InvitationStatus::Confirmed,
                }
            })
        })?;

        tx.commit().await.map_err(map_db_error)?;

        info!(
            invitation_id = %invitation_id,
            application_id,
            universities = university_ids.len(),
            "Invitation confirmed and recommender provisioned"
        );
        Ok(RecommenderProfile::from(created))
    }
}

//! PostgreSQL implementation of ApplicationRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{info, instrument};

use recommend_core::entities::Application;
use recommend_core::error::DomainError;
use recommend_core::traits::{ApplicationRepository, RepoResult};
use recommend_core::value_objects::Snowflake;
use recommend_core::MAX_UNIVERSITIES;

use crate::models::ApplicationModel;

use super::error::map_db_error;

/// PostgreSQL implementation of ApplicationRepository
#[derive(Clone)]
pub struct PgApplicationRepository {
    pool: PgPool,
}

impl PgApplicationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApplicationRepository for PgApplicationRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Application>> {
        let result = sqlx::query_as::<_, ApplicationModel>(
            r#"
            SELECT id, student_id, legal_name, program_type, term, university_ids,
                   created_at, updated_at
            FROM applications
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Application::from))
    }

    #[instrument(skip(self))]
    async fn find_by_student(&self, student_id: Snowflake) -> RepoResult<Vec<Application>> {
        let results = sqlx::query_as::<_, ApplicationModel>(
            r#"
            SELECT id, student_id, legal_name, program_type, term, university_ids,
                   created_at, updated_at
            FROM applications
            WHERE student_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(student_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Application::from).collect())
    }

    #[instrument(skip(self, application), fields(application_id = %application.id))]
    async fn create(&self, application: &Application) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO applications (id, student_id, legal_name, program_type, term,
                                      university_ids, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(application.id.into_inner())
        .bind(application.student_id.into_inner())
        .bind(&application.legal_name)
        .bind(&application.program_type)
        .bind(&application.term)
        .bind(&application.university_ids)
        .bind(application.created_at)
        .bind(application.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, university_ids), fields(count = university_ids.len()))]
    async fn update_universities(
        &self,
        id: Snowflake,
        university_ids: &[i64],
        now: DateTime<Utc>,
    ) -> RepoResult<Application> {
        if university_ids.len() > MAX_UNIVERSITIES {
            return Err(DomainError::TooManyUniversities {
                max: MAX_UNIVERSITIES,
            });
        }

        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // Row lock serializes against a confirmation reading the set (FOR SHARE)
        let exists = sqlx::query_scalar::<_, i64>(
            "SELECT id FROM applications WHERE id = $1 FOR UPDATE",
        )
        .bind(id.into_inner())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if exists.is_none() {
            return Err(DomainError::ApplicationNotFound(id));
        }

        let confirmed = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM recommender_invitations
                WHERE application_id = $1 AND status = 'confirmed'
            )
            "#,
        )
        .bind(id.into_inner())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if confirmed {
            return Err(DomainError::ApplicationLocked);
        }

        let updated = sqlx::query_as::<_, ApplicationModel>(
            r#"
            UPDATE applications
            SET university_ids = $2, updated_at = $3
            WHERE id = $1
            RETURNING id, student_id, legal_name, program_type, term, university_ids,
                      created_at, updated_at
            "#,
        )
        .bind(id.into_inner())
        .bind(university_ids)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        info!(application_id = %id, "Application universities replaced");
        Ok(Application::from(updated))
    }
}

//! Application service
//!
//! Thin management of a student's applications: just enough to own
//! invitations and to carry the university set confirmations snapshot.

use recommend_core::entities::{normalize_university_ids, Application};
use recommend_core::error::DomainError;
use recommend_core::Snowflake;
use tracing::{info, instrument};
use validator::Validate;

use crate::dto::{ApplicationResponse, CreateApplicationRequest, UpdateUniversitiesRequest};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Application service
pub struct ApplicationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ApplicationService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create an application owned by `student_id`
    #[instrument(skip(self, request))]
    pub async fn create_application(
        &self,
        student_id: Snowflake,
        request: CreateApplicationRequest,
    ) -> ServiceResult<ApplicationResponse> {
        request.validate()?;
        let university_ids = normalize_university_ids(&request.university_ids)?;

        let application = Application::new(
            self.ctx.generate_id(),
            student_id,
            request.legal_name.trim().to_string(),
            request.program_type.trim().to_string(),
            request.term.trim().to_string(),
            university_ids,
            self.ctx.now(),
        );

        self.ctx
            .bounded(
                "create_application",
                self.ctx.application_repo().create(&application),
            )
            .await?;

        info!(
            application_id = %application.id,
            student_id = %student_id,
            universities = application.university_ids.len(),
            "Application created"
        );

        Ok(ApplicationResponse::from(application))
    }

    #[instrument(skip(self))]
    pub async fn get_application(
        &self,
        student_id: Snowflake,
        application_id: Snowflake,
    ) -> ServiceResult<ApplicationResponse> {
        let application = self.load_owned(student_id, application_id).await?;
        Ok(ApplicationResponse::from(application))
    }

    #[instrument(skip(self))]
    pub async fn list_applications(
        &self,
        student_id: Snowflake,
    ) -> ServiceResult<Vec<ApplicationResponse>> {
        let applications = self.ctx.application_repo().find_by_student(student_id).await?;
        Ok(applications.iter().map(ApplicationResponse::from).collect())
    }

    /// Replace the target universities while no invitation is confirmed
    #[instrument(skip(self, request))]
    pub async fn update_universities(
        &self,
        student_id: Snowflake,
        application_id: Snowflake,
        request: UpdateUniversitiesRequest,
    ) -> ServiceResult<ApplicationResponse> {
        request.validate()?;
        let university_ids = normalize_university_ids(&request.university_ids)?;
        self.load_owned(student_id, application_id).await?;

        let now = self.ctx.now();
        let updated = self
            .ctx
            .bounded(
                "update_universities",
                self.ctx
                    .application_repo()
                    .update_universities(application_id, &university_ids, now),
            )
            .await?;

        Ok(ApplicationResponse::from(updated))
    }

    /// Load an application, reporting someone else's as missing
    pub(crate) async fn load_owned(
        &self,
        student_id: Snowflake,
        application_id: Snowflake,
    ) -> ServiceResult<Application> {
        match self.ctx.application_repo().find_by_id(application_id).await? {
            Some(app) if app.is_owned_by(student_id) => Ok(app),
            _ => Err(DomainError::ApplicationNotFound(application_id).into()),
        }
    }
}

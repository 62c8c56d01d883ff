//! Application handlers
//!
//! A student's own applications and their target universities.

use axum::{
    extract::{Path, State},
    Json,
};
use recommend_service::dto::{
    ApplicationResponse, CreateApplicationRequest, UpdateUniversitiesRequest,
};
use recommend_service::ApplicationService;

use crate::extractors::{ApplicationPath, AuthStudent, JsonBody};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Create application
///
/// POST /applications
pub async fn create_application(
    State(state): State<AppState>,
    auth: AuthStudent,
    JsonBody(request): JsonBody<CreateApplicationRequest>,
) -> ApiResult<Created<Json<ApplicationResponse>>> {
    let service = ApplicationService::new(state.service_context());
    let response = service
        .create_application(auth.student_id, request)
        .await?;
    Ok(Created(Json(response)))
}

/// List the caller's applications
///
/// GET /applications
pub async fn list_applications(
    State(state): State<AppState>,
    auth: AuthStudent,
) -> ApiResult<Json<Vec<ApplicationResponse>>> {
    let service = ApplicationService::new(state.service_context());
    let applications = service.list_applications(auth.student_id).await?;
    Ok(Json(applications))
}

/// Get application
///
/// GET /applications/{application_id}
pub async fn get_application(
    State(state): State<AppState>,
    auth: AuthStudent,
    Path(path): Path<ApplicationPath>,
) -> ApiResult<Json<ApplicationResponse>> {
    let application_id = path.application_id()?;

    let service = ApplicationService::new(state.service_context());
    let response = service
        .get_application(auth.student_id, application_id)
        .await?;
    Ok(Json(response))
}

/// Replace target universities (rejected once a recommender has confirmed)
///
/// PUT /applications/{application_id}/universities
pub async fn update_universities(
    State(state): State<AppState>,
    auth: AuthStudent,
    Path(path): Path<ApplicationPath>,
    JsonBody(request): JsonBody<UpdateUniversitiesRequest>,
) -> ApiResult<Json<ApplicationResponse>> {
    let application_id = path.application_id()?;

    let service = ApplicationService::new(state.service_context());
    let response = service
        .update_universities(auth.student_id, application_id, request)
        .await?;
    Ok(Json(response))
}

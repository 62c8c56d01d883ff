//! Authentication extractor
//!
//! Extracts and validates the student's bearer token from the Authorization header.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use recommend_core::Snowflake;

use crate::response::ApiError;
use crate::state::AppState;

/// Student authenticated by a bearer token
#[derive(Debug, Clone, Copy)]
pub struct AuthStudent {
    pub student_id: Snowflake,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthStudent
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::MissingAuth)?;

        let app_state = AppState::from_ref(state);

        let claims = app_state
            .jwt_service()
            .validate_access_token(bearer.token())
            .map_err(|e| {
                tracing::warn!(error = %e, "Invalid access token");
                ApiError::InvalidAuth
            })?;

        let student_id = claims.student_id().map_err(|e| {
            tracing::warn!(error = %e, "Invalid student id in token");
            ApiError::InvalidAuth
        })?;

        Ok(AuthStudent { student_id })
    }
}

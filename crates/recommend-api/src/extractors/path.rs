//! Path parameter extractors
//!
//! Type-safe extraction of Snowflake ids and invitation tokens from the path.

use recommend_core::{DomainError, Snowflake};
use recommend_service::ServiceError;
use serde::Deserialize;

use crate::response::ApiError;

fn parse_id(raw: &str, name: &str) -> Result<Snowflake, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::invalid_path(format!("Invalid {name} format")))
}

/// Path parameters with application_id
#[derive(Debug, Deserialize)]
pub struct ApplicationPath {
    pub application_id: String,
}

impl ApplicationPath {
    pub fn application_id(&self) -> Result<Snowflake, ApiError> {
        parse_id(&self.application_id, "application_id")
    }
}

/// Path parameters with application_id and the invitation's recommender id
#[derive(Debug, Deserialize)]
pub struct InvitationPath {
    pub application_id: String,
    pub recommender_id: String,
}

impl InvitationPath {
    pub fn application_id(&self) -> Result<Snowflake, ApiError> {
        parse_id(&self.application_id, "application_id")
    }

    /// An id that cannot name an invitation is an unknown invitation
    pub fn invitation_id(&self) -> Result<Snowflake, ApiError> {
        self.recommender_id
            .parse()
            .map_err(|_| ApiError::from(ServiceError::from(DomainError::InvitationNotFound)))
    }
}

/// Public token path. Left unparsed: malformed tokens are simply unknown.
#[derive(Debug, Deserialize)]
pub struct TokenPath {
    pub token: String,
}

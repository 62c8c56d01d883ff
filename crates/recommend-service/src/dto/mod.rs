//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{
    ConfirmInvitationRequest, CreateApplicationRequest, CreateInvitationRequest,
    ResendInvitationRequest, UpdateUniversitiesRequest, MAX_CUSTOM_MESSAGE_LEN,
};

pub use responses::{
    ApplicationResponse, ApplicationSummary, HealthChecks, HealthResponse, InvitationResponse,
    InvitationViewResponse, MessageResponse, ReadinessResponse, RecommenderProfileResponse,
    ResendInvitationResponse,
};

pub use mappers::{invite_url, InvitationAt, InvitationWithApplication};

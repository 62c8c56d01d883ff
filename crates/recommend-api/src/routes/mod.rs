//! Route definitions
//!
//! All API routes mounted under /api/v1; health probes live at the root.

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers::{applications, health, invitations};
use crate::state::AppState;

/// Create the main API router (health routes are separate so they skip rate limiting)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

/// Health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(application_routes())
        .merge(public_invitation_routes())
}

/// Student routes (bearer token required)
fn application_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/applications",
            get(applications::list_applications).post(applications::create_application),
        )
        .route("/applications/:application_id", get(applications::get_application))
        .route(
            "/applications/:application_id/universities",
            put(applications::update_universities),
        )
        .route(
            "/applications/:application_id/invitations",
            get(invitations::list_invitations).post(invitations::create_invitation),
        )
        .route(
            "/applications/:application_id/invitations/:recommender_id",
            delete(invitations::delete_invitation),
        )
        .route(
            "/applications/:application_id/invitations/:recommender_id/resend",
            post(invitations::resend_invitation),
        )
}

/// Recommender routes reached from the emailed link (the token is the credential)
fn public_invitation_routes() -> Router<AppState> {
    Router::new()
        .route("/invitations/:token", get(invitations::view_invitation))
        .route("/invitations/:token/confirm", post(invitations::confirm_invitation))
}

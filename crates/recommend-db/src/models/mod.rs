//! Database models - SQLx-compatible structs for PostgreSQL tables

mod application;
mod invitation;
mod recommender;

pub use application::ApplicationModel;
pub use invitation::InvitationModel;
pub use recommender::RecommenderProfileModel;

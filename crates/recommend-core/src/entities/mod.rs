//! Domain entities - core business objects

mod application;
mod invitation;
mod recommender;

pub use application::{normalize_university_ids, Application, MAX_UNIVERSITIES};
pub use invitation::{Invitation, InvitationStatus};
pub use recommender::{NewRecommenderProfile, ProfileDetails, RecommenderProfile};

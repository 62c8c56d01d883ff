//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in recommend-core.

mod application;
mod error;
mod invitation;
mod recommender;

pub use application::PgApplicationRepository;
pub use error::{ACTIVE_EMAIL_UNIQUE_INDEX, PROFILE_INVITATION_UNIQUE_INDEX, TOKEN_UNIQUE_INDEX};
pub use invitation::PgInvitationRepository;
pub use recommender::PgRecommenderRepository;

//! # recommend-core
//!
//! Domain layer for the recommendation invitation workflow: entities, the
//! invitation state machine, value objects, and the ports (repository,
//! notification, clock) that infrastructure crates implement.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    normalize_university_ids, Application, Invitation, InvitationStatus, NewRecommenderProfile,
    ProfileDetails, RecommenderProfile, MAX_UNIVERSITIES,
};
pub use error::DomainError;
pub use traits::{
    ApplicationRepository, Clock, InvitationRepository, Notification, NotificationDispatcher,
    NotificationKind, RecommenderRepository, RepoResult, SystemClock,
};
pub use value_objects::{
    InvitationToken, RecommenderEmail, Snowflake, SnowflakeError, SnowflakeGenerator,
};

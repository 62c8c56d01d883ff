//! Ports implemented by the infrastructure crates

mod clock;
mod notifications;
mod repositories;

pub use clock::{Clock, SystemClock};
pub use notifications::{Notification, NotificationDispatcher, NotificationKind};
pub use repositories::{
    ApplicationRepository, InvitationRepository, RecommenderRepository, RepoResult,
};

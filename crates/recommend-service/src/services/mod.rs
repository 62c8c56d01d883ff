//! Business logic services
//!
//! Each service borrows the shared [`ServiceContext`] for the length of a
//! request and orchestrates validation, storage and notification.

pub mod application;
pub mod confirmation;
pub mod context;
pub mod error;
pub mod invitation;
pub mod notifier;
pub mod sweeper;

pub use application::ApplicationService;
pub use confirmation::ConfirmationService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use invitation::InvitationService;
pub use notifier::{notify, LogNotificationDispatcher};
pub use sweeper::{spawn_expiry_sweeper, ExpirySweeper};

//! # recommend-service
//!
//! Application layer for the recommendation invitation workflow: services,
//! DTOs and the dependency context they share.

pub mod dto;
pub mod services;

pub use services::{
    spawn_expiry_sweeper, ApplicationService, ConfirmationService, ExpirySweeper,
    InvitationService, LogNotificationDispatcher, ServiceContext, ServiceContextBuilder,
    ServiceError, ServiceResult,
};

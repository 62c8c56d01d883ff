//! Route handlers
//!
//! All HTTP request handlers organized by resource.

pub mod applications;
pub mod health;
pub mod invitations;

//! Axum extractors for request handling
//!
//! Student authentication, id path parameters and JSON bodies.

mod auth;
mod body;
mod path;

pub use auth::AuthStudent;
pub use body::{JsonBody, OptionalJsonBody};
pub use path::{ApplicationPath, InvitationPath, TokenPath};

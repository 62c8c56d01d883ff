//! Value objects - immutable types that represent domain concepts

mod email;
mod invitation_token;
mod snowflake;

pub use email::RecommenderEmail;
pub use invitation_token::InvitationToken;
pub use snowflake::{Snowflake, SnowflakeError, SnowflakeGenerator};

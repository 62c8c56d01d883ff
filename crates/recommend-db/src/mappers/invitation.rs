//! Invitation entity <-> model mapper

use recommend_core::entities::{Invitation, InvitationStatus};
use recommend_core::error::DomainError;
use recommend_core::value_objects::{InvitationToken, RecommenderEmail, Snowflake};

use crate::models::InvitationModel;

impl TryFrom<InvitationModel> for Invitation {
    type Error = DomainError;

    fn try_from(model: InvitationModel) -> Result<Self, Self::Error> {
        Ok(Invitation {
            id: Snowflake::new(model.id),
            application_id: Snowflake::new(model.application_id),
            recommender_email: RecommenderEmail::from_stored(model.recommender_email),
            token: InvitationToken::from_stored(model.token),
            status: model.status.parse::<InvitationStatus>()?,
            custom_message: model.custom_message,
            invited_at: model.invited_at,
            invitation_expires_at: model.invitation_expires_at,
            confirmed_at: model.confirmed_at,
            last_sent_at: model.last_sent_at,
            resend_count: model.resend_count,
            recommender_profile_id: model.recommender_profile_id.map(Snowflake::new),
            updated_at: model.updated_at,
        })
    }
}

//! Recommender profile entity <-> model mapper

use recommend_core::entities::{ProfileDetails, RecommenderProfile};
use recommend_core::value_objects::{RecommenderEmail, Snowflake};

use crate::models::RecommenderProfileModel;

impl From<RecommenderProfileModel> for RecommenderProfile {
    fn from(model: RecommenderProfileModel) -> Self {
        RecommenderProfile {
            id: Snowflake::new(model.id),
            invitation_id: Snowflake::new(model.invitation_id),
            application_id: Snowflake::new(model.application_id),
            email: RecommenderEmail::from_stored(model.email),
            details: ProfileDetails {
                first_name: model.first_name,
                last_name: model.last_name,
                title: model.title,
                organization: model.organization,
                relationship_duration: model.relationship_duration,
                relationship_type: model.relationship_type,
                mobile_phone: model.mobile_phone,
            },
            university_ids: model.university_ids,
            confirmed_at: model.confirmed_at,
        }
    }
}

//! Recommender profile database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for recommender_profiles table.
///
/// The password hash column is never selected into this model.
#[derive(Debug, Clone, FromRow)]
pub struct RecommenderProfileModel {
    pub id: i64,
    pub invitation_id: i64,
    pub application_id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub title: String,
    pub organization: String,
    pub relationship_duration: String,
    pub relationship_type: String,
    pub mobile_phone: Option<String>,
    pub university_ids: Vec<i64>,
    pub confirmed_at: DateTime<Utc>,
}

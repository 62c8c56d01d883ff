//! Recommender profile - the identity provisioned when an invitation is confirmed

use chrono::{DateTime, Utc};

use crate::value_objects::{RecommenderEmail, Snowflake};

/// Details the recommender supplies at confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileDetails {
    pub first_name: String,
    pub last_name: String,
    pub title: String,
    pub organization: String,
    pub relationship_duration: String,
    pub relationship_type: String,
    pub mobile_phone: Option<String>,
}

/// Input to the confirmation transaction.
///
/// Email and university scope are filled in from the invitation and its
/// application inside the transaction.
#[derive(Debug, Clone)]
pub struct NewRecommenderProfile {
    pub id: Snowflake,
    pub details: ProfileDetails,
    pub password_hash: String,
}

/// Recommender profile entity (1:1 with a confirmed invitation)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommenderProfile {
    pub id: Snowflake,
    pub invitation_id: Snowflake,
    pub application_id: Snowflake,
    pub email: RecommenderEmail,
    pub details: ProfileDetails,
    /// Snapshot of the application's universities at confirmation time
    pub university_ids: Vec<i64>,
    pub confirmed_at: DateTime<Utc>,
}

impl RecommenderProfile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.details.first_name, self.details.last_name)
    }

    pub fn university_count(&self) -> usize {
        self.university_ids.len()
    }
}

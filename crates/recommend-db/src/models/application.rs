//! Application database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for applications table
#[derive(Debug, Clone, FromRow)]
pub struct ApplicationModel {
    pub id: i64,
    pub student_id: i64,
    pub legal_name: String,
    pub program_type: String,
    pub term: String,
    pub university_ids: Vec<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//! Application entity - one student's request cycle and its target universities

use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Upper bound on target universities per application
pub const MAX_UNIVERSITIES: usize = 20;

/// Application entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Application {
    pub id: Snowflake,
    pub student_id: Snowflake,
    pub legal_name: String,
    pub program_type: String,
    pub term: String,
    pub university_ids: Vec<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Application {
    pub fn new(
        id: Snowflake,
        student_id: Snowflake,
        legal_name: String,
        program_type: String,
        term: String,
        university_ids: Vec<i64>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            student_id,
            legal_name,
            program_type,
            term,
            university_ids,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, student_id: Snowflake) -> bool {
        self.student_id == student_id
    }
}

/// Drop duplicates (first occurrence wins), reject non-positive ids and
/// enforce [`MAX_UNIVERSITIES`].
pub fn normalize_university_ids(ids: &[i64]) -> Result<Vec<i64>, DomainError> {
    let mut normalized: Vec<i64> = Vec::with_capacity(ids.len());
    for &id in ids {
        if id <= 0 {
            return Err(DomainError::InvalidUniversityId(id));
        }
        if !normalized.contains(&id) {
            normalized.push(id);
        }
    }

    if normalized.len() > MAX_UNIVERSITIES {
        return Err(DomainError::TooManyUniversities {
            max: MAX_UNIVERSITIES,
        });
    }
    Ok(normalized)
}

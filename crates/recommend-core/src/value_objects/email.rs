//! Recommender email - normalized professional email address

use std::fmt;

use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use crate::error::DomainError;

/// Trimmed, lower-cased and syntactically valid email
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecommenderEmail(String);

impl RecommenderEmail {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() || !normalized.validate_email() {
            return Err(DomainError::InvalidEmail);
        }
        Ok(Self(normalized))
    }

    /// Rehydrate an address read back from storage (already normalized on write)
    pub fn from_stored(raw: String) -> Self {
        Self(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for RecommenderEmail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

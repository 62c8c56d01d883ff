//! Notification dispatcher port
//!
//! Delivery (email, SMS) happens outside this system. The core hands over a
//! notification after its transaction commits and never waits on delivery.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// What the recipient is being told
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// First invitation email to a recommender
    Invitation,
    /// Reminder with the refreshed expiry
    Resend,
    /// Welcome message once the recommender has confirmed
    Confirmation,
}

/// Envelope handed to the dispatcher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Consumers deduplicate on this under at-least-once delivery
    pub id: Uuid,
    pub kind: NotificationKind,
    pub recipient: String,
    pub payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(
        kind: NotificationKind,
        recipient: impl Into<String>,
        payload: serde_json::Value,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            recipient: recipient.into(),
            payload,
            created_at: now,
        }
    }
}

#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    /// Hand the notification off for delivery.
    ///
    /// An error only means the hand-off failed; callers log it and move on.
    async fn enqueue(&self, notification: &Notification) -> Result<(), DomainError>;
}

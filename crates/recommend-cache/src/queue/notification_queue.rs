//! Durable hand-off of outbound notifications to Redis.
//!
//! Each notification is serialized as JSON and `LPUSH`ed onto a list; an
//! external mailer pops from the tail. Consumers deduplicate on the
//! envelope id since a retried push can deliver the same notification twice.

use async_trait::async_trait;

use recommend_core::error::DomainError;
use recommend_core::traits::{Notification, NotificationDispatcher};

use crate::pool::{RedisPool, RedisPoolError};

/// Default list consumed by the mailer
pub const NOTIFICATION_QUEUE_KEY: &str = "notifications:outbound";

/// `NotificationDispatcher` backed by a Redis list
#[derive(Debug, Clone)]
pub struct RedisNotificationQueue {
    pool: RedisPool,
    key: String,
}

impl RedisNotificationQueue {
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self::with_key(pool, NOTIFICATION_QUEUE_KEY)
    }

    #[must_use]
    pub fn with_key(pool: RedisPool, key: impl Into<String>) -> Self {
        Self {
            pool,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Number of notifications waiting for the mailer
    pub async fn pending(&self) -> Result<u64, RedisPoolError> {
        self.pool.list_len(&self.key).await
    }
}

#[async_trait]
impl NotificationDispatcher for RedisNotificationQueue {
    async fn enqueue(&self, notification: &Notification) -> Result<(), DomainError> {
        let depth = self
            .pool
            .push_json(&self.key, notification)
            .await
            .map_err(|e| DomainError::NotificationError(e.to_string()))?;

        tracing::debug!(
            queue = %self.key,
            notification_id = %notification.id,
            kind = ?notification.kind,
            depth,
            "Notification queued"
        );
        Ok(())
    }
}

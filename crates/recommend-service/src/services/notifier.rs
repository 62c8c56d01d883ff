//! Post-commit notification hand-off
//!
//! Services call [`notify`] only after their storage work committed. The
//! dispatcher gets a short timeout of its own and any failure is logged,
//! never returned, so delivery problems cannot change an operation's outcome.

use async_trait::async_trait;
use tracing::{info, warn};

use recommend_core::error::DomainError;
use recommend_core::traits::{Notification, NotificationDispatcher};
use recommend_core::Snowflake;

use super::context::ServiceContext;

/// Dispatcher that only logs; used when no Redis queue is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotificationDispatcher;

#[async_trait]
impl NotificationDispatcher for LogNotificationDispatcher {
    async fn enqueue(&self, notification: &Notification) -> Result<(), DomainError> {
        info!(
            notification_id = %notification.id,
            kind = ?notification.kind,
            recipient = %notification.recipient,
            payload = %notification.payload,
            "Notification (log only)"
        );
        Ok(())
    }
}

/// Hand `notification` to the dispatcher, bounded and best-effort.
///
/// Returns whether the hand-off succeeded, for logging callers only.
pub async fn notify(ctx: &ServiceContext, invitation_id: Snowflake, notification: Notification) -> bool {
    let timeout = ctx.settings().notification_timeout();

    match tokio::time::timeout(timeout, ctx.dispatcher().enqueue(&notification)).await {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            warn!(
                invitation_id = %invitation_id,
                notification_id = %notification.id,
                kind = ?notification.kind,
                error = %e,
                "Notification enqueue failed"
            );
            false
        }
        Err(_) => {
            warn!(
                invitation_id = %invitation_id,
                notification_id = %notification.id,
                kind = ?notification.kind,
                timeout_ms = ctx.settings().notification_timeout_ms,
                "Notification enqueue timed out"
            );
            false
        }
    }
}

//! Periodic expiry sweep
//!
//! Persists `expired` for pending invitations past their deadline. Reads
//! already fold expiry in on their own, so the sweep only keeps stored
//! statuses honest for listing and reporting.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Expiry sweeper
pub struct ExpirySweeper<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ExpirySweeper<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Expire every overdue pending invitation once; returns how many moved
    pub async fn sweep_once(&self) -> ServiceResult<u64> {
        let now = self.ctx.now();
        self.ctx
            .bounded("expire_overdue", self.ctx.invitation_repo().expire_overdue(now))
            .await
    }
}

/// Run the sweep every `every` until the returned handle is aborted.
///
/// A failed pass is logged and the loop keeps going.
pub fn spawn_expiry_sweeper(ctx: ServiceContext, every: Duration) -> JoinHandle<()> {
    info!(interval_secs = every.as_secs(), "Starting invitation expiry sweeper");

    tokio::spawn(async move {
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            match ExpirySweeper::new(&ctx).sweep_once().await {
                Ok(0) => debug!("Expiry sweep found nothing overdue"),
                Ok(expired) => info!(expired, "Expiry sweep completed"),
                Err(e) => error!(error = %e, "Expiry sweep failed"),
            }
        }
    })
}

//! Authoritative time source

use chrono::{DateTime, Utc};

/// Every expiry decision reads time through this trait, never from callers
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Server wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

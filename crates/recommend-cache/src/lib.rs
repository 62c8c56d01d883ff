//! # recommend-cache
//!
//! Redis layer: a managed connection pool and the durable queue that hands
//! invitation, reminder and confirmation notifications to the mailer.
//!
//! ## Example
//!
//! ```ignore
//! use recommend_cache::{RedisNotificationQueue, RedisPool, RedisPoolConfig};
//!
//! let pool = RedisPool::new(RedisPoolConfig::default())?;
//! let queue = RedisNotificationQueue::new(pool);
//! queue.enqueue(&notification).await?;
//! ```

pub mod pool;
pub mod queue;

pub use pool::{RedisPool, RedisPoolConfig, RedisPoolError, RedisResult};
pub use queue::{RedisNotificationQueue, NOTIFICATION_QUEUE_KEY};

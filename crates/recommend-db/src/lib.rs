//! # recommend-db
//!
//! Database layer implementing repository traits with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! - Connection pool management and migrations
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ Model mappers
//! - Repository implementations, including the confirmation transaction
//!
//! ## Usage
//!
//! ```rust,ignore
//! use recommend_db::{create_pool, run_migrations, PgInvitationRepository};
//!
//! async fn example(config: &recommend_common::DatabaseConfig) -> anyhow::Result<()> {
//!     let pool = create_pool(config).await?;
//!     run_migrations(&pool).await?;
//!     let invitations = PgInvitationRepository::new(pool);
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, create_pool_from_url, run_migrations, PgPool, MIGRATIONS_DIR};
pub use repositories::{PgApplicationRepository, PgInvitationRepository, PgRecommenderRepository};

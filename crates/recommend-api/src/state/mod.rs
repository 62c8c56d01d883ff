//! Application state
//!
//! Holds the shared state for the Axum application: the service context,
//! the token verifier and the handles the readiness probe checks.

use std::sync::Arc;

use recommend_cache::RedisPool;
use recommend_common::{AppConfig, JwtService};
use recommend_db::PgPool;
use recommend_service::ServiceContext;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    service_context: Arc<ServiceContext>,
    config: Arc<AppConfig>,
    jwt_service: Arc<JwtService>,
    pool: PgPool,
    /// Present only when notifications go through Redis
    redis_pool: Option<RedisPool>,
}

impl AppState {
    pub fn new(
        service_context: ServiceContext,
        config: AppConfig,
        jwt_service: JwtService,
        pool: PgPool,
        redis_pool: Option<RedisPool>,
    ) -> Self {
        Self {
            service_context: Arc::new(service_context),
            config: Arc::new(config),
            jwt_service: Arc::new(jwt_service),
            pool,
            redis_pool,
        }
    }

    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn redis_pool(&self) -> Option<&RedisPool> {
        self.redis_pool.as_ref()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service_context", &"ServiceContext")
            .field("config", &"AppConfig")
            .field("redis", &self.redis_pool.is_some())
            .finish()
    }
}

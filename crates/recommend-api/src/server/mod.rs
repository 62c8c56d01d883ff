//! Server setup and initialization
//!
//! Provides the main application builder and server runner.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use recommend_cache::{RedisNotificationQueue, RedisPool, RedisPoolConfig};
use recommend_common::{AppConfig, AppError, JwtService};
use recommend_core::{NotificationDispatcher, SnowflakeGenerator};
use recommend_db::{create_pool, run_migrations};
use recommend_service::{spawn_expiry_sweeper, LogNotificationDispatcher, ServiceContextBuilder};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::middleware::apply_middleware_with_config;
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware.
///
/// Health probes are merged outside the rate limiter.
pub fn create_app(state: AppState) -> Result<Router, AppError> {
    let config = state.config();
    let api = apply_middleware_with_config(
        create_router(),
        &config.rate_limit,
        &config.cors,
        config.server.request_timeout(),
        config.app.env.is_production(),
    )?;

    Ok(api.merge(health_routes()).with_state(state))
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    info!("Connecting to PostgreSQL...");
    let pool = create_pool(&config.database)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    if config.database.run_migrations {
        run_migrations(&pool)
            .await
            .map_err(|e| AppError::Database(format!("Migration failed: {e}")))?;
    }

    let (dispatcher, redis_pool): (Arc<dyn NotificationDispatcher>, Option<RedisPool>) =
        match &config.redis {
            Some(redis) => {
                info!("Connecting to Redis...");
                let redis_pool = RedisPool::new(RedisPoolConfig::from(redis))
                    .map_err(|e| AppError::Cache(e.to_string()))?;
                if let Err(e) = redis_pool.health_check().await {
                    warn!(error = %e, "Redis not reachable at startup");
                }
                let queue = RedisNotificationQueue::new(redis_pool.clone());
                info!(queue = queue.key(), "Notifications go to the Redis queue");
                (Arc::new(queue), Some(redis_pool))
            }
            None => {
                warn!("REDIS_URL not set; notifications are only logged");
                (Arc::new(LogNotificationDispatcher), None)
            }
        };

    let jwt_service = JwtService::new(&config.jwt.secret, config.jwt.access_token_expiry);

    let snowflake_generator = SnowflakeGenerator::new(config.snowflake.worker_id)
        .map_err(|e| AppError::Config(e.to_string()))?;

    let service_context = ServiceContextBuilder::new()
        .postgres(pool.clone())
        .dispatcher(dispatcher)
        .snowflake_generator(Arc::new(snowflake_generator))
        .settings(config.invitation.clone())
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(
        service_context,
        config,
        jwt_service,
        pool,
        redis_pool,
    ))
}

/// Run the HTTP server
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .server
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid server address: {e}")))?;

    let state = create_app_state(config).await?;

    let sweeper = state.config().invitation.sweep_interval().map(|every| {
        spawn_expiry_sweeper(state.service_context().clone(), every)
    });

    let app = create_app(state)?;
    let served = run_server(app, addr).await;

    if let Some(sweeper) = sweeper {
        sweeper.abort();
    }
    served
}

//! Recommendation API server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p recommend-api
//! ```
//!
//! Configuration is loaded from environment variables (and `.env` if present).

use recommend_common::{try_init_tracing, AppConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = try_init_tracing() {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    if let Err(e) = run().await {
        error!(error = %e, "Server failed to start");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting Recommendation API Server...");

    let config = AppConfig::from_env().map_err(|e| {
        error!(error = %e, "Failed to load configuration");
        e
    })?;

    info!(
        env = ?config.app.env,
        port = config.server.port,
        redis = config.redis.is_some(),
        "Configuration loaded"
    );

    recommend_api::run(config).await?;

    Ok(())
}

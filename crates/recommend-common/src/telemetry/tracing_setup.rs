//! Tracing and logging setup
//!
//! Configures the `tracing` subscriber with `RUST_LOG` filtering and either
//! human-readable or JSON output.

use std::env;

use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

/// Tracing configuration options
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Level used when `RUST_LOG` is unset
    pub level: Level,
    /// Emit one JSON object per event
    pub json: bool,
    /// Log span open/close events
    pub span_events: bool,
    /// Include file and line numbers
    pub file_line: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            json: false,
            span_events: false,
            file_line: true,
        }
    }
}

impl TracingConfig {
    /// Debug logging with span lifecycle events
    pub fn development() -> Self {
        Self {
            level: Level::DEBUG,
            span_events: true,
            ..Self::default()
        }
    }

    /// JSON logging for log shippers
    pub fn production() -> Self {
        Self {
            level: Level::INFO,
            json: true,
            span_events: false,
            file_line: false,
        }
    }

    /// Pick a profile from `APP_ENV`, then let `LOG_FORMAT` override the output format
    pub fn from_env() -> Self {
        let mut config = match env::var("APP_ENV").map(|s| s.to_lowercase()).as_deref() {
            Ok("production" | "staging") => Self::production(),
            Ok("development") => Self::development(),
            _ => Self::default(),
        };

        match env::var("LOG_FORMAT").map(|s| s.to_lowercase()).as_deref() {
            Ok("json") => config.json = true,
            Ok("pretty" | "text") => config.json = false,
            _ => {}
        }
        config
    }
}

/// Initialize tracing from `APP_ENV` / `LOG_FORMAT`
pub fn try_init_tracing() -> Result<(), TracingError> {
    try_init_tracing_with_config(TracingConfig::from_env())
}

/// Initialize tracing with custom configuration
///
/// Returns an error instead of panicking when a subscriber is already set,
/// so tests may call it repeatedly.
pub fn try_init_tracing_with_config(config: TracingConfig) -> Result<(), TracingError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.to_string()));

    let span_events = if config.span_events {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let fmt_layer = fmt::layer()
        .with_file(config.file_line)
        .with_line_number(config.file_line)
        .with_span_events(span_events);

    let fmt_layer = if config.json {
        fmt_layer.json().boxed()
    } else {
        fmt_layer.boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|_| TracingError::AlreadyInitialized)
}

/// Tracing initialization errors
#[derive(Debug, thiserror::Error)]
pub enum TracingError {
    #[error("Tracing subscriber already initialized")]
    AlreadyInitialized,
}

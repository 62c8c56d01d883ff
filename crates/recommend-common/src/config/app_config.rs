//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file when present).

use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    /// Absent when `REDIS_URL` is unset; notifications then go to the log
    pub redis: Option<RedisConfig>,
    pub jwt: JwtConfig,
    pub invitation: InvitationConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
    pub snowflake: SnowflakeConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

impl FromStr for Environment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            "development" => Ok(Self::Development),
            _ => Err(()),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub run_migrations: bool,
}

/// Redis configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: String,
    pub max_connections: u32,
}

/// JWT configuration
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry: i64,
}

/// Invitation workflow tuning
#[derive(Debug, Clone, Deserialize)]
pub struct InvitationConfig {
    /// Validity window applied at creation and again on every resend
    pub expiry_hours: i64,
    pub operation_timeout_ms: u64,
    pub notification_timeout_ms: u64,
    /// 0 disables the background sweep
    pub sweep_interval_secs: u64,
    /// Base of the links recommenders receive
    pub portal_base_url: String,
}

impl InvitationConfig {
    pub fn expiry_window(&self) -> chrono::Duration {
        chrono::Duration::hours(self.expiry_hours)
    }

    pub fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.operation_timeout_ms)
    }

    pub fn notification_timeout(&self) -> Duration {
        Duration::from_millis(self.notification_timeout_ms)
    }

    pub fn sweep_interval(&self) -> Option<Duration> {
        (self.sweep_interval_secs > 0).then(|| Duration::from_secs(self.sweep_interval_secs))
    }
}

impl Default for InvitationConfig {
    fn default() -> Self {
        Self {
            expiry_hours: default_invitation_expiry_hours(),
            operation_timeout_ms: default_operation_timeout_ms(),
            notification_timeout_ms: default_notification_timeout_ms(),
            sweep_interval_secs: default_sweep_interval_secs(),
            portal_base_url: default_portal_base_url(),
        }
    }
}

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    pub requests_per_second: u32,
    pub burst: u32,
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

/// Snowflake ID generator configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SnowflakeConfig {
    pub worker_id: u16,
}

// Default value functions
fn default_app_name() -> String {
    "recommend-api".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_connect_timeout_secs() -> u64 {
    30
}

fn default_redis_max_connections() -> u32 {
    10
}

fn default_access_token_expiry() -> i64 {
    900 // 15 minutes
}

fn default_invitation_expiry_hours() -> i64 {
    336 // 14 days
}

fn default_operation_timeout_ms() -> u64 {
    5000
}

fn default_notification_timeout_ms() -> u64 {
    2000
}

fn default_sweep_interval_secs() -> u64 {
    300
}

fn default_portal_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_requests_per_second() -> u32 {
    10
}

fn default_burst() -> u32 {
    50
}

/// Minimum HMAC secret length for student tokens
const MIN_JWT_SECRET_LEN: usize = 32;

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(lookup);

        let jwt_secret = vars.required("JWT_SECRET")?;
        if jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(ConfigError::InvalidValue(
                "JWT_SECRET",
                format!("must be at least {MIN_JWT_SECRET_LEN} bytes"),
            ));
        }

        let expiry_hours = vars.parsed("INVITATION_EXPIRY_HOURS", default_invitation_expiry_hours)?;
        if expiry_hours <= 0 {
            return Err(ConfigError::InvalidValue(
                "INVITATION_EXPIRY_HOURS",
                expiry_hours.to_string(),
            ));
        }

        let redis = match vars.optional("REDIS_URL") {
            Some(url) => Some(RedisConfig {
                url,
                max_connections: vars
                    .parsed("REDIS_MAX_CONNECTIONS", default_redis_max_connections)?,
            }),
            None => None,
        };

        Ok(Self {
            app: AppSettings {
                name: vars.optional("APP_NAME").unwrap_or_else(default_app_name),
                env: vars
                    .optional("APP_ENV")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_default(),
            },
            server: ServerConfig {
                host: vars.optional("SERVER_HOST").unwrap_or_else(default_host),
                port: vars.parsed("SERVER_PORT", default_port)?,
                request_timeout_secs: vars
                    .parsed("REQUEST_TIMEOUT_SECS", default_request_timeout_secs)?,
            },
            database: DatabaseConfig {
                url: vars.required("DATABASE_URL")?,
                max_connections: vars.parsed("DATABASE_MAX_CONNECTIONS", default_max_connections)?,
                min_connections: vars.parsed("DATABASE_MIN_CONNECTIONS", default_min_connections)?,
                connect_timeout_secs: vars
                    .parsed("DATABASE_CONNECT_TIMEOUT", default_connect_timeout_secs)?,
                run_migrations: vars.parsed("DATABASE_RUN_MIGRATIONS", || true)?,
            },
            redis,
            jwt: JwtConfig {
                secret: jwt_secret,
                access_token_expiry: vars
                    .parsed("JWT_ACCESS_TOKEN_EXPIRY", default_access_token_expiry)?,
            },
            invitation: InvitationConfig {
                expiry_hours,
                operation_timeout_ms: vars
                    .parsed("INVITATION_OPERATION_TIMEOUT_MS", default_operation_timeout_ms)?,
                notification_timeout_ms: vars
                    .parsed("NOTIFICATION_TIMEOUT_MS", default_notification_timeout_ms)?,
                sweep_interval_secs: vars
                    .parsed("INVITATION_SWEEP_INTERVAL_SECS", default_sweep_interval_secs)?,
                portal_base_url: vars
                    .optional("PORTAL_BASE_URL")
                    .map(|url| url.trim_end_matches('/').to_string())
                    .unwrap_or_else(default_portal_base_url),
            },
            rate_limit: RateLimitConfig {
                requests_per_second: vars
                    .parsed("RATE_LIMIT_PER_SECOND", default_requests_per_second)?,
                burst: vars.parsed("RATE_LIMIT_BURST", default_burst)?,
            },
            cors: CorsConfig {
                allowed_origins: vars
                    .optional("CORS_ALLOWED_ORIGINS")
                    .map(|s| {
                        s.split(',')
                            .map(str::trim)
                            .filter(|origin| !origin.is_empty())
                            .map(String::from)
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            snowflake: SnowflakeConfig {
                worker_id: vars.parsed("WORKER_ID", || 0)?,
            },
        })
    }
}

struct Vars<F>(F);

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn required(&self, key: &'static str) -> Result<String, ConfigError> {
        self.optional(key).ok_or(ConfigError::MissingVar(key))
    }

    fn parsed<T: FromStr>(
        &self,
        key: &'static str,
        default: impl FnOnce() -> T,
    ) -> Result<T, ConfigError> {
        match self.optional(key) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(key, raw)),
            None => Ok(default()),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

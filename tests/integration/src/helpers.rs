//! Test helpers for integration tests
//!
//! Spawns the API in-process on a loopback port and wraps the HTTP calls a
//! student or recommender makes.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use anyhow::Result;
use recommend_api::{create_app, create_app_state};
use recommend_common::{AppConfig, JwtService};
use recommend_core::Snowflake;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    jwt: JwtService,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a new test server
    pub async fn start() -> Result<Self> {
        let config = test_config()?;
        Self::start_with_config(config).await
    }

    /// Start a test server with custom config
    pub async fn start_with_config(mut config: AppConfig) -> Result<Self> {
        config.database.run_migrations = true;
        // Tests drive expiry themselves
        config.invitation.sweep_interval_secs = 0;

        let jwt = JwtService::new(&config.jwt.secret, config.jwt.access_token_expiry);

        let state = create_app_state(config).await?;
        let app = create_app(state)?;

        // Port 0 lets the OS pick a free port
        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            addr,
            client,
            jwt,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    /// Mint a bearer token for a fresh student
    pub fn new_student(&self) -> Result<TestStudent> {
        let id = next_student_id();
        let token = self.jwt.issue_access_token(id)?;
        Ok(TestStudent { id, token })
    }

    pub async fn get(&self, path: &str) -> Result<Response> {
        Ok(self.client.get(self.url(path)).send().await?)
    }

    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        Ok(self.client.post(self.url(path)).json(body).send().await?)
    }

    pub async fn get_auth(&self, path: &str, token: &str) -> Result<Response> {
        send(self.client.get(self.url(path)), token).await
    }

    pub async fn post_auth<T: Serialize>(
        &self,
        path: &str,
        token: &str,
        body: &T,
    ) -> Result<Response> {
        send(self.client.post(self.url(path)).json(body), token).await
    }

    /// POST without a body
    pub async fn post_empty_auth(&self, path: &str, token: &str) -> Result<Response> {
        send(self.client.post(self.url(path)), token).await
    }

    pub async fn put_auth<T: Serialize>(
        &self,
        path: &str,
        token: &str,
        body: &T,
    ) -> Result<Response> {
        send(self.client.put(self.url(path)).json(body), token).await
    }

    pub async fn delete_auth(&self, path: &str, token: &str) -> Result<Response> {
        send(self.client.delete(self.url(path)), token).await
    }
}

async fn send(request: RequestBuilder, token: &str) -> Result<Response> {
    Ok(request.bearer_auth(token).send().await?)
}

/// A student identity with a valid access token
#[derive(Debug, Clone)]
pub struct TestStudent {
    pub id: Snowflake,
    pub token: String,
}

/// Student ids unique within and across test runs
fn next_student_id() -> Snowflake {
    static NEXT: AtomicI64 = AtomicI64::new(0);
    let offset = NEXT.fetch_add(1, Ordering::SeqCst);
    Snowflake::new(chrono::Utc::now().timestamp_micros() * 16 + offset)
}

/// Create a test configuration from the environment
pub fn test_config() -> Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().map_err(|e| anyhow::anyhow!("Config error: {e}"))?;

    Ok(config)
}

/// Check that the environment can run a server (Redis is optional)
pub async fn check_test_env() -> bool {
    dotenvy::dotenv().ok();

    for var in ["DATABASE_URL", "JWT_SECRET"] {
        if std::env::var(var).is_err() {
            eprintln!("Skipping test: {var} not set");
            return false;
        }
    }

    true
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(())
}

/// Assert an error response and return its `error.code`
pub async fn assert_error(response: Response, expected_status: StatusCode) -> Result<String> {
    let body: serde_json::Value = assert_json(response, expected_status).await?;
    body["error"]["code"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("error body without a code: {body}"))
}

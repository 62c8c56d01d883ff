//! Service context - dependency container for services
//!
//! Holds the repositories, the notification dispatcher, the clock and the
//! invitation settings every service reads from.

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use recommend_common::InvitationConfig;
use recommend_core::traits::{
    ApplicationRepository, Clock, InvitationRepository, NotificationDispatcher,
    RecommenderRepository, SystemClock,
};
use recommend_core::{Snowflake, SnowflakeGenerator};
use recommend_db::{PgApplicationRepository, PgInvitationRepository, PgPool, PgRecommenderRepository};

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    application_repo: Arc<dyn ApplicationRepository>,
    invitation_repo: Arc<dyn InvitationRepository>,
    recommender_repo: Arc<dyn RecommenderRepository>,
    dispatcher: Arc<dyn NotificationDispatcher>,
    clock: Arc<dyn Clock>,
    snowflake_generator: Arc<SnowflakeGenerator>,
    settings: InvitationConfig,
}

impl ServiceContext {
    pub fn new(
        application_repo: Arc<dyn ApplicationRepository>,
        invitation_repo: Arc<dyn InvitationRepository>,
        recommender_repo: Arc<dyn RecommenderRepository>,
        dispatcher: Arc<dyn NotificationDispatcher>,
        clock: Arc<dyn Clock>,
        snowflake_generator: Arc<SnowflakeGenerator>,
        settings: InvitationConfig,
    ) -> Self {
        Self {
            application_repo,
            invitation_repo,
            recommender_repo,
            dispatcher,
            clock,
            snowflake_generator,
            settings,
        }
    }

    // === Repositories ===

    pub fn application_repo(&self) -> &dyn ApplicationRepository {
        self.application_repo.as_ref()
    }

    pub fn invitation_repo(&self) -> &dyn InvitationRepository {
        self.invitation_repo.as_ref()
    }

    pub fn recommender_repo(&self) -> &dyn RecommenderRepository {
        self.recommender_repo.as_ref()
    }

    // === Collaborators ===

    pub fn dispatcher(&self) -> &dyn NotificationDispatcher {
        self.dispatcher.as_ref()
    }

    pub fn settings(&self) -> &InvitationConfig {
        &self.settings
    }

    /// Current time from the authoritative clock
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> Snowflake {
        self.snowflake_generator.generate()
    }

    /// Run storage work under the operation timeout.
    ///
    /// When the timer fires the future is dropped, and with it any open
    /// transaction, so nothing it started is committed.
    pub async fn bounded<T, E, F>(&self, operation: &'static str, work: F) -> ServiceResult<T>
    where
        F: Future<Output = Result<T, E>>,
        E: Into<ServiceError>,
    {
        match tokio::time::timeout(self.settings.operation_timeout(), work).await {
            Ok(result) => result.map_err(Into::into),
            Err(_) => {
                tracing::error!(
                    operation,
                    timeout_ms = self.settings.operation_timeout_ms,
                    "Operation timed out and was rolled back"
                );
                Err(ServiceError::Timeout { operation })
            }
        }
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("worker_id", &self.snowflake_generator.worker_id())
            .field("settings", &self.settings)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
pub struct ServiceContextBuilder {
    application_repo: Option<Arc<dyn ApplicationRepository>>,
    invitation_repo: Option<Arc<dyn InvitationRepository>>,
    recommender_repo: Option<Arc<dyn RecommenderRepository>>,
    dispatcher: Option<Arc<dyn NotificationDispatcher>>,
    clock: Arc<dyn Clock>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
    settings: InvitationConfig,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            application_repo: None,
            invitation_repo: None,
            recommender_repo: None,
            dispatcher: None,
            clock: Arc::new(SystemClock),
            snowflake_generator: None,
            settings: InvitationConfig::default(),
        }
    }

    /// Wire all three repositories to PostgreSQL
    pub fn postgres(self, pool: PgPool) -> Self {
        self.application_repo(Arc::new(PgApplicationRepository::new(pool.clone())))
            .invitation_repo(Arc::new(PgInvitationRepository::new(pool.clone())))
            .recommender_repo(Arc::new(PgRecommenderRepository::new(pool)))
    }

    pub fn application_repo(mut self, repo: Arc<dyn ApplicationRepository>) -> Self {
        self.application_repo = Some(repo);
        self
    }

    pub fn invitation_repo(mut self, repo: Arc<dyn InvitationRepository>) -> Self {
        self.invitation_repo = Some(repo);
        self
    }

    pub fn recommender_repo(mut self, repo: Arc<dyn RecommenderRepository>) -> Self {
        self.recommender_repo = Some(repo);
        self
    }

    pub fn dispatcher(mut self, dispatcher: Arc<dyn NotificationDispatcher>) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    pub fn settings(mut self, settings: InvitationConfig) -> Self {
        self.settings = settings;
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        let missing = |name: &str| ServiceError::validation(format!("{name} is required"));

        Ok(ServiceContext::new(
            self.application_repo
                .ok_or_else(|| missing("application_repo"))?,
            self.invitation_repo
                .ok_or_else(|| missing("invitation_repo"))?,
            self.recommender_repo
                .ok_or_else(|| missing("recommender_repo"))?,
            self.dispatcher.ok_or_else(|| missing("dispatcher"))?,
            self.clock,
            self.snowflake_generator
                .ok_or_else(|| missing("snowflake_generator"))?,
            self.settings,
        ))
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

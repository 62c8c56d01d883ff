//! In-memory ports for service tests
//!
//! `MemoryStore` mirrors the guarantees the PostgreSQL adapters give: the
//! active-email guard and token uniqueness on insert, and status-guarded
//! updates for every transition. One mutex stands in for row locks.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;

use recommend_common::InvitationConfig;
use recommend_core::entities::{
    Application, Invitation, InvitationStatus, NewRecommenderProfile, RecommenderProfile,
};
use recommend_core::error::DomainError;
use recommend_core::traits::{
    ApplicationRepository, Clock, InvitationRepository, Notification, NotificationDispatcher,
    NotificationKind, RecommenderRepository, RepoResult,
};
use recommend_core::{InvitationToken, Snowflake, SnowflakeGenerator, MAX_UNIVERSITIES};
use recommend_service::dto::{
    ConfirmInvitationRequest, CreateApplicationRequest, CreateInvitationRequest,
    InvitationResponse,
};
use recommend_service::{
    ApplicationService, InvitationService, ServiceContext, ServiceContextBuilder,
};

pub const STUDENT: Snowflake = Snowflake::new(1001);
pub const OTHER_STUDENT: Snowflake = Snowflake::new(2002);

// ============================================================================
// Clock
// ============================================================================

pub struct PinnedClock {
    now: Mutex<DateTime<Utc>>,
}

impl PinnedClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()),
        }
    }

    pub fn advance(&self, by: chrono::Duration) {
        *self.now.lock() += by;
    }
}

impl Clock for PinnedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

// ============================================================================
// Dispatcher
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
    Record,
    Fail,
    Stall,
}

pub struct RecordingDispatcher {
    mode: Mutex<DispatchMode>,
    sent: Mutex<Vec<Notification>>,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self {
            mode: Mutex::new(DispatchMode::Record),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn set_mode(&self, mode: DispatchMode) {
        *self.mode.lock() = mode;
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().clone()
    }

    pub fn sent_of(&self, kind: NotificationKind) -> Vec<Notification> {
        self.sent().into_iter().filter(|n| n.kind == kind).collect()
    }
}

#[async_trait]
impl NotificationDispatcher for RecordingDispatcher {
    async fn enqueue(&self, notification: &Notification) -> Result<(), DomainError> {
        let mode = *self.mode.lock();
        match mode {
            DispatchMode::Record => {
                self.sent.lock().push(notification.clone());
                Ok(())
            }
            DispatchMode::Fail => Err(DomainError::NotificationError("mailer down".to_string())),
            DispatchMode::Stall => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(())
            }
        }
    }
}

// ============================================================================
// Store
// ============================================================================

#[derive(Default)]
struct State {
    applications: HashMap<Snowflake, Application>,
    invitations: HashMap<Snowflake, Invitation>,
    profiles: HashMap<Snowflake, RecommenderProfile>,
    password_hashes: HashMap<Snowflake, String>,
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
    stall: Mutex<Option<Duration>>,
}

impl MemoryStore {
    /// Delay every write by `by` before it touches state
    pub fn stall_writes(&self, by: Duration) {
        *self.stall.lock() = Some(by);
    }

    async fn maybe_stall(&self) {
        let stall = *self.stall.lock();
        if let Some(by) = stall {
            tokio::time::sleep(by).await;
        }
    }

    pub fn invitation(&self, id: Snowflake) -> Invitation {
        self.state.lock().invitations[&id].clone()
    }

    pub fn invitation_count(&self) -> usize {
        self.state.lock().invitations.len()
    }

    pub fn profile_count(&self) -> usize {
        self.state.lock().profiles.len()
    }

    pub fn profiles_for(&self, invitation_id: Snowflake) -> Vec<RecommenderProfile> {
        self.state
            .lock()
            .profiles
            .values()
            .filter(|p| p.invitation_id == invitation_id)
            .cloned()
            .collect()
    }

    /// Credential stored for the recommender of `invitation_id`
    pub fn stored_password_hash(&self, invitation_id: Snowflake) -> String {
        self.state.lock().password_hashes[&invitation_id].clone()
    }

    /// Write behind the services' back, like another system editing the row
    pub fn overwrite_universities(&self, application_id: Snowflake, ids: Vec<i64>) {
        if let Some(app) = self.state.lock().applications.get_mut(&application_id) {
            app.university_ids = ids;
        }
    }
}

#[async_trait]
impl ApplicationRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Application>> {
        Ok(self.state.lock().applications.get(&id).cloned())
    }

    async fn find_by_student(&self, student_id: Snowflake) -> RepoResult<Vec<Application>> {
        let mut apps: Vec<_> = self
            .state
            .lock()
            .applications
            .values()
            .filter(|a| a.student_id == student_id)
            .cloned()
            .collect();
        apps.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(apps)
    }

    async fn create(&self, application: &Application) -> RepoResult<()> {
        self.maybe_stall().await;
        self.state
            .lock()
            .applications
            .insert(application.id, application.clone());
        Ok(())
    }

    async fn update_universities(
        &self,
        id: Snowflake,
        university_ids: &[i64],
        now: DateTime<Utc>,
    ) -> RepoResult<Application> {
        if university_ids.len() > MAX_UNIVERSITIES {
            return Err(DomainError::TooManyUniversities {
                max: MAX_UNIVERSITIES,
            });
        }
        self.maybe_stall().await;

        let mut state = self.state.lock();
        let locked = state
            .invitations
            .values()
            .any(|i| i.application_id == id && i.status == InvitationStatus::Confirmed);
        let app = state
            .applications
            .get_mut(&id)
            .ok_or(DomainError::ApplicationNotFound(id))?;
        if locked {
            return Err(DomainError::ApplicationLocked);
        }
        app.university_ids = university_ids.to_vec();
        app.updated_at = now;
        Ok(app.clone())
    }
}

#[async_trait]
impl InvitationRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Invitation>> {
        Ok(self.state.lock().invitations.get(&id).cloned())
    }

    async fn find_by_token(&self, token: &InvitationToken) -> RepoResult<Option<Invitation>> {
        Ok(self
            .state
            .lock()
            .invitations
            .values()
            .find(|i| &i.token == token)
            .cloned())
    }

    async fn find_by_application(&self, application_id: Snowflake) -> RepoResult<Vec<Invitation>> {
        let mut rows: Vec<_> = self
            .state
            .lock()
            .invitations
            .values()
            .filter(|i| i.application_id == application_id && i.status != InvitationStatus::Deleted)
            .cloned()
            .collect();
        rows.sort_by(|a, b| (b.invited_at, b.id).cmp(&(a.invited_at, a.id)));
        Ok(rows)
    }

    async fn create(&self, invitation: &Invitation) -> RepoResult<()> {
        self.maybe_stall().await;

        let mut state = self.state.lock();
        if !state.applications.contains_key(&invitation.application_id) {
            return Err(DomainError::ApplicationNotFound(invitation.application_id));
        }
        if state.invitations.values().any(|i| i.token == invitation.token) {
            return Err(DomainError::InvitationTokenExists);
        }
        let duplicate = state.invitations.values().any(|i| {
            i.application_id == invitation.application_id
                && i.recommender_email == invitation.recommender_email
                && i.status.is_active()
        });
        if duplicate {
            return Err(DomainError::AlreadyInvited);
        }
        state.invitations.insert(invitation.id, invitation.clone());
        Ok(())
    }

    async fn extend_expiry(
        &self,
        id: Snowflake,
        expires_at: DateTime<Utc>,
        custom_message: Option<&str>,
        now: DateTime<Utc>,
    ) -> RepoResult<Option<Invitation>> {
        self.maybe_stall().await;

        let mut state = self.state.lock();
        match state.invitations.get_mut(&id) {
            Some(inv) if inv.status == InvitationStatus::Invited && !inv.is_expired_at(now) => {
                inv.invitation_expires_at = expires_at;
                if let Some(message) = custom_message {
                    inv.custom_message = Some(message.to_string());
                }
                inv.last_sent_at = now;
                inv.resend_count += 1;
                inv.updated_at = now;
                Ok(Some(inv.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn mark_deleted(&self, id: Snowflake, now: DateTime<Utc>) -> RepoResult<bool> {
        self.maybe_stall().await;

        let mut state = self.state.lock();
        match state.invitations.get_mut(&id) {
            Some(inv) if inv.status == InvitationStatus::Invited && !inv.is_expired_at(now) => {
                inv.status = InvitationStatus::Deleted;
                inv.updated_at = now;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn mark_expired(&self, id: Snowflake, now: DateTime<Utc>) -> RepoResult<bool> {
        let mut state = self.state.lock();
        Ok(state
            .invitations
            .get_mut(&id)
            .is_some_and(|inv| inv.expire(now)))
    }

    async fn expire_overdue(&self, now: DateTime<Utc>) -> RepoResult<u64> {
        let mut state = self.state.lock();
        let expired = state
            .invitations
            .values_mut()
            .map(|inv| inv.expire(now))
            .filter(|changed| *changed)
            .count();
        Ok(expired as u64)
    }
}

#[async_trait]
impl RecommenderRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<RecommenderProfile>> {
        Ok(self.state.lock().profiles.get(&id).cloned())
    }

    async fn confirm_invitation(
        &self,
        invitation_id: Snowflake,
        profile: &NewRecommenderProfile,
        now: DateTime<Utc>,
    ) -> RepoResult<RecommenderProfile> {
        self.maybe_stall().await;

        let mut state = self.state.lock();
        let invitation = state
            .invitations
            .get(&invitation_id)
            .cloned()
            .ok_or(DomainError::InvitationNotFound)?;
        invitation.ensure_pending(now)?;

        let university_ids = state
            .applications
            .get(&invitation.application_id)
            .map(|a| a.university_ids.clone())
            .ok_or(DomainError::ApplicationNotFound(invitation.application_id))?;

        let created = RecommenderProfile {
            id: profile.id,
            invitation_id,
            application_id: invitation.application_id,
            email: invitation.recommender_email.clone(),
            details: profile.details.clone(),
            university_ids,
            confirmed_at: now,
        };

        if let Some(inv) = state.invitations.get_mut(&invitation_id) {
            inv.confirm(now, profile.id)?;
        }
        state
            .password_hashes
            .insert(invitation_id, profile.password_hash.clone());
        state.profiles.insert(created.id, created.clone());
        Ok(created)
    }
}

// ============================================================================
// Harness
// ============================================================================

pub fn test_settings() -> InvitationConfig {
    InvitationConfig {
        expiry_hours: 336,
        operation_timeout_ms: 1_000,
        notification_timeout_ms: 50,
        sweep_interval_secs: 0,
        portal_base_url: "http://portal.test".to_string(),
    }
}

pub struct Harness {
    pub ctx: ServiceContext,
    pub store: Arc<MemoryStore>,
    pub clock: Arc<PinnedClock>,
    pub dispatcher: Arc<RecordingDispatcher>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_settings(test_settings())
    }

    pub fn with_settings(settings: InvitationConfig) -> Self {
        let store = Arc::new(MemoryStore::default());
        let clock = Arc::new(PinnedClock::new());
        let dispatcher = Arc::new(RecordingDispatcher::new());

        let ctx = ServiceContextBuilder::new()
            .application_repo(store.clone())
            .invitation_repo(store.clone())
            .recommender_repo(store.clone())
            .dispatcher(dispatcher.clone())
            .clock(clock.clone())
            .snowflake_generator(Arc::new(SnowflakeGenerator::new(7).unwrap()))
            .settings(settings)
            .build()
            .unwrap();

        Self {
            ctx,
            store,
            clock,
            dispatcher,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Create an application for [`STUDENT`] targeting `universities`
    pub async fn application(&self, universities: &[i64]) -> Snowflake {
        let created = ApplicationService::new(&self.ctx)
            .create_application(
                STUDENT,
                CreateApplicationRequest {
                    legal_name: "Jordan Rivera".to_string(),
                    program_type: "PhD".to_string(),
                    term: "Fall 2027".to_string(),
                    university_ids: universities.to_vec(),
                },
            )
            .await
            .unwrap();
        created.id.parse().unwrap()
    }

    pub async fn invite(&self, application_id: Snowflake, email: &str) -> InvitationResponse {
        InvitationService::new(&self.ctx)
            .create_invitation(STUDENT, application_id, invite_request(email))
            .await
            .unwrap()
    }
}

pub fn invite_request(email: &str) -> CreateInvitationRequest {
    CreateInvitationRequest {
        recommender_email: email.to_string(),
        custom_message: Some("Thank you for considering this.".to_string()),
    }
}

pub fn confirm_request() -> ConfirmInvitationRequest {
    ConfirmInvitationRequest {
        first_name: "Grace".to_string(),
        last_name: "Hopper".to_string(),
        title: "Professor of Computer Science".to_string(),
        organization: "Yale University".to_string(),
        relationship_duration: "3 years".to_string(),
        relationship_type: "Research advisor".to_string(),
        mobile_phone: Some("+1 203 555 0100".to_string()),
        password: "Correct-Horse-9".to_string(),
    }
}

/// Token carried in an invitation's link
pub fn token_of(invitation: &InvitationResponse) -> String {
    invitation
        .invite_url
        .rsplit('/')
        .next()
        .unwrap()
        .to_string()
}

pub fn id_of(invitation: &InvitationResponse) -> Snowflake {
    invitation.id.parse().unwrap()
}

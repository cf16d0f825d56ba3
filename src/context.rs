//! Console context: owns the credential, API client, persisted state and stores.

use std::sync::{Arc, RwLock};

use crate::api::ApiClient;
use crate::auth::{AuthSession, Credential, SharedCredential};
use crate::config::Config;
use crate::db::{init_database, Scope, StateStore};
use crate::errors::AppError;
use crate::models::User;
use crate::store::{
    ApplicationsStore, CampaignsStore, Clock, PetsStore, SettingsStore, SystemClock,
    VolunteersStore,
};

pub struct ConsoleContext {
    pub config: Config,
    pub api: ApiClient,
    pub auth: AuthSession,
    pub state: StateStore,
    pub applications: ApplicationsStore,
    pub pets: PetsStore,
    pub volunteers: VolunteersStore,
    pub campaigns: CampaignsStore,
    pub settings: SettingsStore,
}

impl ConsoleContext {
    pub async fn init(config: Config) -> Result<Self, AppError> {
        Self::init_with_clock(config, Arc::new(SystemClock)).await
    }

    /// Build every component, wipe the previous session and restore local state.
    pub async fn init_with_clock(config: Config, clock: Arc<dyn Clock>) -> Result<Self, AppError> {
        let credential: SharedCredential = Arc::new(RwLock::new(
            config
                .api_token
                .clone()
                .map(Credential::bearer)
                .unwrap_or_default(),
        ));
        let api = ApiClient::new(&config.api_base_url, config.request_timeout, credential)?;

        let pool = init_database(&config.state_db_path).await?;
        let state = StateStore::new(pool);
        let cleared = state.clear_scope(Scope::Session).await?;
        if cleared > 0 {
            tracing::debug!(cleared, "Cleared previous session state");
        }

        let policy = config.store_policy();
        let context = Self {
            auth: AuthSession::new(api.clone()),
            applications: ApplicationsStore::new(api.clone(), clock.clone(), policy),
            pets: PetsStore::new(api.clone(), clock.clone(), policy, state.clone()),
            volunteers: VolunteersStore::new(api.clone(), clock.clone(), policy),
            campaigns: CampaignsStore::new(api.clone(), clock, policy),
            settings: SettingsStore::new(state.clone()),
            api,
            state,
            config,
        };

        context.settings.load().await;
        context.pets.init_from_storage().await;

        Ok(context)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<User, AppError> {
        self.auth.login(email, password).await
    }

    /// Server logout, then drop everything tied to the session.
    pub async fn logout(&self) {
        self.auth.logout().await;
        self.reset().await;
    }

    /// Clear caches, filters, credential, user and session-scoped state.
    pub async fn reset(&self) {
        self.auth.clear().await;
        self.applications.reset().await;
        self.pets.reset().await;
        self.volunteers.reset().await;
        self.campaigns.reset().await;

        if let Err(e) = self.state.clear_scope(Scope::Session).await {
            tracing::warn!("Failed to clear session state: {}", e);
        }
        tracing::info!("Console context reset");
    }

    /// Refresh every store the kiosk feed reads from.
    pub async fn refresh_all(&self, force_refresh: bool) {
        let (applications, pets, volunteers, campaigns) = tokio::join!(
            self.applications.fetch(force_refresh),
            self.pets.fetch_pets(force_refresh),
            self.volunteers.fetch_volunteers(force_refresh),
            self.campaigns.fetch(force_refresh),
        );
        tracing::debug!(
            ?applications,
            ?pets,
            ?volunteers,
            ?campaigns,
            "Refresh pass complete"
        );
    }
}

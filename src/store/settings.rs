//! Console settings backed by local persisted state.

use tokio::sync::RwLock;

use crate::db::{Scope, StateStore};
use crate::errors::AppError;
use crate::models::AppSettings;

const SETTINGS_KEY: &str = "appSettings";
const SETTINGS_VERSION: i64 = 1;

pub struct SettingsStore {
    persisted: StateStore,
    settings: RwLock<AppSettings>,
}

impl SettingsStore {
    pub fn new(persisted: StateStore) -> Self {
        Self {
            persisted,
            settings: RwLock::new(AppSettings::default()),
        }
    }

    /// Load saved settings over the defaults. Unreadable settings fall back to defaults.
    pub async fn load(&self) -> AppSettings {
        let loaded = match self
            .persisted
            .get::<AppSettings>(Scope::Local, SETTINGS_KEY, SETTINGS_VERSION)
            .await
        {
            Ok(Some(saved)) => saved,
            Ok(None) => AppSettings::default(),
            Err(e) => {
                tracing::warn!("Failed to load settings, using defaults: {}", e);
                AppSettings::default()
            }
        };
        *self.settings.write().await = loaded.clone();
        loaded
    }

    pub async fn get(&self) -> AppSettings {
        self.settings.read().await.clone()
    }

    /// Apply `change` and persist the full merged settings.
    pub async fn update<F: FnOnce(&mut AppSettings)>(&self, change: F) -> Result<AppSettings, AppError> {
        let mut settings = self.settings.write().await;
        let mut next = settings.clone();
        change(&mut next);
        self.persisted
            .put(Scope::Local, SETTINGS_KEY, SETTINGS_VERSION, &next)
            .await?;
        *settings = next.clone();
        Ok(next)
    }
}

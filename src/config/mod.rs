//! Configuration module for the shelter console.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::errors::AppError;
use crate::store::StorePolicy;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the shelter API (no trailing slash)
    pub api_base_url: String,
    /// Pre-issued bearer token, used until a login replaces it
    pub api_token: Option<String>,
    /// Login email for the startup session
    pub login_email: Option<String>,
    /// Login password for the startup session
    pub login_password: Option<String>,
    /// Path to the SQLite file holding persisted client state
    pub state_db_path: PathBuf,
    /// Address the kiosk feed binds to
    pub bind_addr: SocketAddr,
    /// Display key required by kiosk clients (optional)
    pub kiosk_key: Option<String>,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// How long a fetched collection stays fresh
    pub cache_ttl: Duration,
    /// How long the "email resent" flag stays visible
    pub resend_flash: Duration,
    /// Whether the applications view jumps to the first non-empty tab
    pub auto_focus: bool,
    /// Background refresh interval for the kiosk feed
    pub refresh_interval: Duration,
    /// Per-request timeout against the shelter API
    pub request_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let api_base_url = env::var("SHELTER_API_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:4000".to_string())
            .trim_end_matches('/')
            .to_string();

        let state_db_path = env::var("SHELTER_STATE_DB_PATH")
            .unwrap_or_else(|_| "./data/console.sqlite".to_string())
            .into();

        Ok(Self {
            api_base_url,
            api_token: non_empty_var("SHELTER_API_TOKEN"),
            login_email: non_empty_var("SHELTER_LOGIN_EMAIL"),
            login_password: non_empty_var("SHELTER_LOGIN_PASSWORD"),
            state_db_path,
            bind_addr: parse_var("SHELTER_BIND_ADDR", "127.0.0.1:8090")?,
            kiosk_key: non_empty_var("SHELTER_KIOSK_KEY"),
            log_level: env::var("SHELTER_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            cache_ttl: Duration::from_secs(parse_var("SHELTER_CACHE_TTL_SECS", "300")?),
            resend_flash: Duration::from_millis(parse_var("SHELTER_RESEND_FLASH_MS", "2000")?),
            auto_focus: parse_var("SHELTER_AUTO_FOCUS", "true")?,
            refresh_interval: Duration::from_secs(parse_var("SHELTER_REFRESH_SECS", "60")?),
            request_timeout: Duration::from_secs(parse_var("SHELTER_REQUEST_TIMEOUT_SECS", "15")?),
        })
    }

    /// Cache and UI-flag policy shared by every store.
    pub fn store_policy(&self) -> StorePolicy {
        StorePolicy {
            freshness_window: self.cache_ttl,
            resend_flash: self.resend_flash,
            auto_focus: self.auto_focus,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T: FromStr>(name: &str, default: &str) -> Result<T, AppError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    raw.trim()
        .parse()
        .map_err(|_| AppError::Validation(format!("Invalid {} value: {:?}", name, raw)))
}

//! Shelter Admin Console
//!
//! Client-side fetch/cache/derive stores over the shelter REST API, with a
//! read-only kiosk feed for shelter displays.

mod api;
mod auth;
mod config;
mod context;
mod db;
mod errors;
mod kiosk;
mod models;
mod store;

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use context::ConsoleContext;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Shelter Admin Console");
    tracing::info!("API base URL: {}", config.api_base_url);
    tracing::info!("State database: {:?}", config.state_db_path);
    tracing::info!("Kiosk bind address: {}", config.bind_addr);

    if config.kiosk_key.is_none() {
        tracing::warn!("No kiosk key configured (SHELTER_KIOSK_KEY). Kiosk feed is open!");
    }

    let bind_addr = config.bind_addr;
    let refresh_interval = config.refresh_interval;
    let login = config.login_email.clone().zip(config.login_password.clone());

    let context = Arc::new(ConsoleContext::init(config).await?);

    if let Some((email, password)) = login {
        match context.login(&email, &password).await {
            Ok(user) => tracing::info!("Signed in as {}", user.email),
            Err(e) => tracing::error!("Sign-in failed: {}", e),
        }
    } else if context.auth.check_auth().await.is_none() {
        tracing::warn!("No signed-in user; admin endpoints may reject requests");
    }

    // Initial load jumps to the first tab with applications
    let outcome = context.applications.fetch_applications(true, true).await;
    tracing::info!(?outcome, "Initial applications load");
    context.refresh_all(false).await;

    // Background refresh honours the freshness window
    let refresher = context.clone();
    tokio::spawn(async move {
        let mut ticker =
            tokio::time::interval(refresh_interval.max(std::time::Duration::from_secs(1)));
        ticker.tick().await;
        loop {
            ticker.tick().await;
            refresher.refresh_all(false).await;
        }
    });

    let app = kiosk::create_router(context);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!("Kiosk feed listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

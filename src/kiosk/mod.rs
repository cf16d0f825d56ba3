//! Kiosk feed: read-only derived views for shelter displays.

mod handlers;

pub use handlers::*;

use std::sync::Arc;

use axum::{
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth;
use crate::context::ConsoleContext;

/// Success response envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    pub fetched_at: String,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
            fetched_at: Utc::now().to_rfc3339(),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Create the kiosk router.
pub fn create_router(context: Arc<ConsoleContext>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let display_key = context.config.kiosk_key.clone();

    let kiosk_routes = Router::new()
        .route("/spotlight", get(spotlight))
        .route("/applications/summary", get(applications_summary))
        .route("/volunteers/active", get(active_volunteers))
        .layer(middleware::from_fn(move |req, next| {
            auth::display_key_layer(display_key.clone(), req, next)
        }));

    // Health check (no key required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/kiosk", kiosk_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(context)
}

async fn health_check() -> &'static str {
    "OK"
}

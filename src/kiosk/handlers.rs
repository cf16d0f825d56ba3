//! Kiosk endpoints.

use std::sync::Arc;

use axum::extract::State;
use serde::Serialize;

use super::ApiResponse;
use crate::context::ConsoleContext;
use crate::models::{Application, Pet, StatusGroup, Volunteer};
use crate::store::pending_badge_count;

/// Application counts per review group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSummary {
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub deleted: usize,
    pub pending_badge: usize,
}

impl ApplicationSummary {
    pub fn from_applications(apps: &[Application]) -> Self {
        let count = |group: StatusGroup| apps.iter().filter(|a| a.status.group() == Some(group)).count();
        Self {
            total: apps.len(),
            pending: count(StatusGroup::Pending),
            approved: count(StatusGroup::Approved),
            deleted: count(StatusGroup::Deleted),
            pending_badge: pending_badge_count(apps),
        }
    }
}

/// GET /kiosk/spotlight
pub async fn spotlight(State(context): State<Arc<ConsoleContext>>) -> ApiResponse<Vec<Pet>> {
    ApiResponse::new(context.pets.spotlight_pets().await)
}

/// GET /kiosk/applications/summary
pub async fn applications_summary(
    State(context): State<Arc<ConsoleContext>>,
) -> ApiResponse<ApplicationSummary> {
    let apps = context.applications.applications().await;
    ApiResponse::new(ApplicationSummary::from_applications(&apps))
}

/// GET /kiosk/volunteers/active
pub async fn active_volunteers(
    State(context): State<Arc<ConsoleContext>>,
) -> ApiResponse<Vec<Volunteer>> {
    ApiResponse::new(context.volunteers.active_volunteers().await)
}

//! Applications store: cached list, view filters, optimistic status changes
//! and the resend-email flags.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{
    sort_newest_first, CacheEnvelope, Clock, FetchOutcome, Optimistic, RequestSequence,
    StorePolicy,
};
use crate::api::ApiClient;
use crate::errors::AppError;
use crate::models::{
    Application, ApplicationStatus, ApplicationTab, ApplicationType, StatusFilter, StatusGroup,
};

/// Page size requested from the API; one page covers a shelter's year.
pub const APPLICATIONS_PAGE_SIZE: u32 = 100;

/// View filters applied to the cached list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationFilters {
    pub active_tab: ApplicationTab,
    pub status: StatusFilter,
    pub selected_year: i32,
    pub search: String,
}

impl ApplicationFilters {
    fn new(current_year: i32) -> Self {
        Self {
            active_tab: ApplicationTab::Adoption,
            status: StatusFilter::All,
            selected_year: current_year,
            search: String::new(),
        }
    }

    /// Year sent to the API: the picked year on the history tab, otherwise this year.
    pub fn year_param(&self, current_year: i32) -> i32 {
        if self.active_tab == ApplicationTab::History {
            self.selected_year
        } else {
            current_year
        }
    }
}

/// Filter the list through tab, status filter and search text.
pub fn filter_applications(apps: &[Application], filters: &ApplicationFilters) -> Vec<Application> {
    let needle = filters.search.trim().to_lowercase();
    apps.iter()
        .filter(|app| filters.active_tab.matches(app.kind))
        .filter(|app| filters.status.matches(&app.status))
        .filter(|app| app.matches_search(&needle))
        .cloned()
        .collect()
}

/// Number of applications the badge should show.
pub fn pending_badge_count(apps: &[Application]) -> usize {
    apps.iter().filter(|a| a.status.awaits_review()).count()
}

#[derive(Debug)]
struct ApplicationsState {
    cache: CacheEnvelope<Application>,
    filters: ApplicationFilters,
    loading: bool,
    resending: Option<String>,
    resend_success: Option<(String, DateTime<Utc>)>,
}

impl ApplicationsState {
    fn new(current_year: i32) -> Self {
        Self {
            cache: CacheEnvelope::default(),
            filters: ApplicationFilters::new(current_year),
            loading: true,
            resending: None,
            resend_success: None,
        }
    }

    /// Pick the tab after a focused fetch. Returns true when a refetch is needed.
    fn refocus(&mut self, current_year: i32) -> bool {
        if self.filters.active_tab != ApplicationTab::History {
            let first_non_empty = ApplicationType::ALL
                .into_iter()
                .find(|kind| self.cache.data.iter().any(|a| a.kind == *kind));

            match first_non_empty {
                Some(kind) => {
                    self.filters.active_tab = kind.into();
                    false
                }
                None => {
                    tracing::info!("No applications this year; switching to last year's history");
                    self.filters.active_tab = ApplicationTab::History;
                    self.filters.status = StatusFilter::All;
                    self.filters.selected_year = current_year - 1;
                    true
                }
            }
        } else if self.cache.data.is_empty() {
            self.filters.active_tab = ApplicationTab::Adoption;
            self.filters.selected_year = current_year;
            true
        } else {
            false
        }
    }
}

pub struct ApplicationsStore {
    api: ApiClient,
    clock: Arc<dyn Clock>,
    policy: StorePolicy,
    sequence: RequestSequence,
    state: RwLock<ApplicationsState>,
}

impl ApplicationsStore {
    pub fn new(api: ApiClient, clock: Arc<dyn Clock>, policy: StorePolicy) -> Self {
        let current_year = clock.current_year();
        Self {
            api,
            clock,
            policy,
            sequence: RequestSequence::default(),
            state: RwLock::new(ApplicationsState::new(current_year)),
        }
    }

    pub fn current_year(&self) -> i32 {
        self.clock.current_year()
    }

    // ==================== FILTERS ====================

    pub async fn filters(&self) -> ApplicationFilters {
        self.state.read().await.filters.clone()
    }

    pub async fn set_active_tab(&self, tab: ApplicationTab) {
        self.update_filters(|f| f.active_tab = tab).await;
    }

    pub async fn set_status_filter(&self, status: StatusFilter) {
        self.update_filters(|f| f.status = status).await;
    }

    pub async fn set_selected_year(&self, year: i32) {
        self.update_filters(|f| f.selected_year = year).await;
    }

    pub async fn set_search(&self, search: impl Into<String>) {
        let search = search.into();
        self.update_filters(|f| f.search = search).await;
    }

    /// Changing which year is queried makes the cached list stale.
    async fn update_filters<F: FnOnce(&mut ApplicationFilters)>(&self, change: F) {
        let current_year = self.current_year();
        let mut state = self.state.write().await;
        let before = state.filters.year_param(current_year);
        change(&mut state.filters);
        if state.filters.year_param(current_year) != before {
            state.cache.invalidate();
        }
    }

    // ==================== READS ====================

    pub async fn applications(&self) -> Vec<Application> {
        self.state.read().await.cache.data.clone()
    }

    pub async fn get(&self, id: &str) -> Option<Application> {
        self.state
            .read()
            .await
            .cache
            .data
            .iter()
            .find(|a| a.id == id)
            .cloned()
    }

    pub async fn loading(&self) -> bool {
        self.state.read().await.loading
    }

    pub async fn filtered(&self) -> Vec<Application> {
        let state = self.state.read().await;
        filter_applications(&state.cache.data, &state.filters)
    }

    pub async fn group(&self, group: StatusGroup) -> Vec<Application> {
        self.filtered()
            .await
            .into_iter()
            .filter(|a| a.status.group() == Some(group))
            .collect()
    }

    pub async fn pending_group(&self) -> Vec<Application> {
        self.group(StatusGroup::Pending).await
    }

    pub async fn approved_group(&self) -> Vec<Application> {
        self.group(StatusGroup::Approved).await
    }

    pub async fn deleted_group(&self) -> Vec<Application> {
        self.group(StatusGroup::Deleted).await
    }

    pub async fn pending_badge_count(&self) -> usize {
        pending_badge_count(&self.state.read().await.cache.data)
    }

    // ==================== FETCH ====================

    /// Fetch without tab auto-focus.
    pub async fn fetch(&self, force_refresh: bool) -> FetchOutcome {
        self.fetch_applications(false, force_refresh).await
    }

    /// Fetch the list; with `auto_focus`, jump to the first non-empty tab.
    ///
    /// Auto-focus triggers at most one extra forced fetch.
    pub async fn fetch_applications(&self, auto_focus: bool, force_refresh: bool) -> FetchOutcome {
        let outcome = self.fetch_once(force_refresh).await;
        if !(auto_focus && self.policy.auto_focus) || !matches!(outcome, FetchOutcome::Refreshed(_))
        {
            return outcome;
        }

        let refetch = {
            let mut state = self.state.write().await;
            state.refocus(self.current_year())
        };
        if refetch {
            self.fetch_once(true).await
        } else {
            outcome
        }
    }

    async fn fetch_once(&self, force_refresh: bool) -> FetchOutcome {
        let current_year = self.current_year();
        let (year, ticket) = {
            let mut state = self.state.write().await;
            if !force_refresh
                && state
                    .cache
                    .is_fresh(self.clock.now_millis(), self.policy.freshness_window)
            {
                tracing::debug!("Using cached applications");
                state.loading = false;
                return FetchOutcome::Cached;
            }
            state.loading = true;
            // Ticket order must match the order the filters were read in
            (state.filters.year_param(current_year), self.sequence.issue())
        };

        let result = self
            .api
            .list_applications(year, APPLICATIONS_PAGE_SIZE)
            .await;

        let mut state = self.state.write().await;
        if !self.sequence.is_current(ticket) {
            tracing::debug!(year, "Dropping superseded applications response");
            return FetchOutcome::Superseded;
        }
        state.loading = false;

        match result {
            Ok(mut apps) => {
                sort_newest_first(&mut apps, Application::created_at_millis);
                let count = apps.len();
                state.cache.replace(apps, self.clock.now_millis());
                tracing::info!(
                    year,
                    count,
                    pending = pending_badge_count(&state.cache.data),
                    "Applications refreshed"
                );
                FetchOutcome::Refreshed(count)
            }
            Err(e) => {
                tracing::warn!(year, "Failed to fetch applications: {}", e);
                FetchOutcome::Failed
            }
        }
    }

    // ==================== WRITES ====================

    /// Set the status locally, then PUT it. A rejected PUT restores the prior status.
    pub async fn update_status(&self, id: &str, status: ApplicationStatus) -> Result<(), AppError> {
        let txn = {
            let mut state = self.state.write().await;
            Optimistic::apply(&mut state.cache.data, id, |app| app.status = status.clone())
        };

        match self.api.update_application_status(id, &status).await {
            Ok(()) => {
                if let Some(txn) = txn {
                    txn.commit();
                }
                tracing::info!(id, status = %status, "Application status updated");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(id, "Status update rejected, rolling back: {}", e);
                if let Some(txn) = txn {
                    let mut state = self.state.write().await;
                    txn.rollback(&mut state.cache.data);
                }
                Err(e)
            }
        }
    }

    /// The application as originally submitted, rendered as HTML.
    pub async fn view_original(&self, id: &str) -> Result<String, AppError> {
        self.api.application_original(id).await.map_err(|e| {
            tracing::error!(id, "Failed to fetch original application: {}", e);
            e
        })
    }

    /// Resend the confirmation email, tracking in-flight and success flags.
    pub async fn resend_email(&self, id: &str) -> Result<(), AppError> {
        self.state.write().await.resending = Some(id.to_string());

        let result = self.api.resend_application_email(id).await;

        let mut state = self.state.write().await;
        state.resending = None;
        match result {
            Ok(()) => {
                let flash = chrono::Duration::from_std(self.policy.resend_flash)
                    .unwrap_or_else(|_| chrono::Duration::zero());
                state.resend_success = Some((id.to_string(), self.clock.now() + flash));
                Ok(())
            }
            Err(e) => {
                tracing::error!(id, "Failed to resend email: {}", e);
                Err(e)
            }
        }
    }

    /// Id whose email is being resent right now.
    pub async fn resending_id(&self) -> Option<String> {
        self.state.read().await.resending.clone()
    }

    /// Id whose email was just resent, until the flash window passes.
    pub async fn resend_success_id(&self) -> Option<String> {
        let now = self.clock.now();
        self.state
            .read()
            .await
            .resend_success
            .as_ref()
            .filter(|(_, expires_at)| now < *expires_at)
            .map(|(id, _)| id.clone())
    }

    /// Drop all cached data and view state.
    pub async fn reset(&self) {
        let mut state = self.state.write().await;
        *state = ApplicationsState::new(self.current_year());
        // Outstanding requests must not repopulate the cleared store
        self.sequence.issue();
    }
}

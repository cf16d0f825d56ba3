//! Volunteers store: roster, shift windows and per-volunteer reliability.

use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::RwLock;

use super::{CacheEnvelope, Clock, FetchOutcome, RequestSequence, StorePolicy};
use crate::api::ApiClient;
use crate::models::{current_streak, max_streak, reliability_score, total_hours, Shift, Volunteer};

pub const VOLUNTEERS_PAGE_SIZE: u32 = 100;

/// Reliability metrics derived from a volunteer's shifts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reliability {
    pub score: i64,
    pub total_hours: i64,
    pub streak: i64,
    pub max_streak: i64,
}

#[derive(Debug, Default)]
struct VolunteersState {
    volunteers: CacheEnvelope<Volunteer>,
    shifts: CacheEnvelope<Shift>,
    shift_window: Option<(NaiveDate, NaiveDate)>,
}

pub struct VolunteersStore {
    api: ApiClient,
    clock: Arc<dyn Clock>,
    policy: StorePolicy,
    volunteer_sequence: RequestSequence,
    shift_sequence: RequestSequence,
    state: RwLock<VolunteersState>,
}

impl VolunteersStore {
    pub fn new(api: ApiClient, clock: Arc<dyn Clock>, policy: StorePolicy) -> Self {
        Self {
            api,
            clock,
            policy,
            volunteer_sequence: RequestSequence::default(),
            shift_sequence: RequestSequence::default(),
            state: RwLock::new(VolunteersState::default()),
        }
    }

    pub async fn volunteers(&self) -> Vec<Volunteer> {
        self.state.read().await.volunteers.data.clone()
    }

    pub async fn active_volunteers(&self) -> Vec<Volunteer> {
        self.state
            .read()
            .await
            .volunteers
            .data
            .iter()
            .filter(|v| v.is_active())
            .cloned()
            .collect()
    }

    pub async fn shifts(&self) -> Vec<Shift> {
        self.state.read().await.shifts.data.clone()
    }

    pub async fn shifts_for(&self, volunteer_id: &str) -> Vec<Shift> {
        self.state
            .read()
            .await
            .shifts
            .data
            .iter()
            .filter(|s| s.volunteer_id.as_deref() == Some(volunteer_id))
            .cloned()
            .collect()
    }

    /// Score, hours and streaks over the shifts in the loaded window.
    pub async fn reliability(&self, volunteer_id: &str) -> Reliability {
        let shifts = self.shifts_for(volunteer_id).await;
        Reliability {
            score: reliability_score(&shifts),
            total_hours: total_hours(&shifts),
            streak: current_streak(&shifts),
            max_streak: max_streak(&shifts),
        }
    }

    /// Full roster, sorted by last name then first name.
    pub async fn fetch_volunteers(&self, force_refresh: bool) -> FetchOutcome {
        let ticket = {
            let state = self.state.write().await;
            if !force_refresh
                && state
                    .volunteers
                    .is_fresh(self.clock.now_millis(), self.policy.freshness_window)
            {
                tracing::debug!("Using cached volunteers");
                return FetchOutcome::Cached;
            }
            self.volunteer_sequence.issue()
        };

        let result = self
            .api
            .list_volunteers(None, VOLUNTEERS_PAGE_SIZE)
            .await;

        let mut state = self.state.write().await;
        if !self.volunteer_sequence.is_current(ticket) {
            return FetchOutcome::Superseded;
        }

        match result {
            Ok(mut volunteers) => {
                volunteers.sort_by(|a, b| {
                    a.last_name
                        .to_lowercase()
                        .cmp(&b.last_name.to_lowercase())
                        .then_with(|| a.first_name.to_lowercase().cmp(&b.first_name.to_lowercase()))
                });
                let count = volunteers.len();
                state.volunteers.replace(volunteers, self.clock.now_millis());
                tracing::info!(count, "Volunteers refreshed");
                FetchOutcome::Refreshed(count)
            }
            Err(e) => {
                tracing::warn!("Failed to fetch volunteers: {}", e);
                FetchOutcome::Failed
            }
        }
    }

    /// Shifts in `[start, end]`. The cache only serves the same window.
    pub async fn fetch_shifts(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        force_refresh: bool,
    ) -> FetchOutcome {
        let ticket = {
            let state = self.state.write().await;
            if !force_refresh
                && state.shift_window == Some((start, end))
                && state
                    .shifts
                    .is_fresh(self.clock.now_millis(), self.policy.freshness_window)
            {
                tracing::debug!(%start, %end, "Using cached shifts");
                return FetchOutcome::Cached;
            }
            self.shift_sequence.issue()
        };

        let result = self.api.list_shifts(start, end).await;

        let mut state = self.state.write().await;
        if !self.shift_sequence.is_current(ticket) {
            return FetchOutcome::Superseded;
        }

        match result {
            Ok(mut shifts) => {
                shifts.sort_by(|a, b| {
                    a.date
                        .cmp(&b.date)
                        .then_with(|| a.start_time.cmp(&b.start_time))
                });
                let count = shifts.len();
                state.shifts.replace(shifts, self.clock.now_millis());
                state.shift_window = Some((start, end));
                tracing::info!(%start, %end, count, "Shifts refreshed");
                FetchOutcome::Refreshed(count)
            }
            Err(e) => {
                tracing::warn!(%start, %end, "Failed to fetch shifts: {}", e);
                FetchOutcome::Failed
            }
        }
    }

    pub async fn reset(&self) {
        let mut state = self.state.write().await;
        *state = VolunteersState::default();
        self.volunteer_sequence.issue();
        self.shift_sequence.issue();
    }
}

//! Pets store: public listing, admin listing, spotlight and the adoption bookmark.

use std::sync::Arc;

use tokio::sync::RwLock;

use super::{
    sort_newest_first, CacheEnvelope, Clock, FetchOutcome, Optimistic, RequestSequence,
    StorePolicy,
};
use crate::api::ApiClient;
use crate::db::{Scope, StateStore};
use crate::errors::AppError;
use crate::models::{Pet, PetBookmark};

/// Most pets shown in the spotlight strip.
pub const SPOTLIGHT_LIMIT: usize = 4;

const BOOKMARK_KEY: &str = "adoption_pet";
const BOOKMARK_VERSION: i64 = 1;

/// Featured pets, in collection order, capped at [`SPOTLIGHT_LIMIT`].
pub fn spotlight(pets: &[Pet]) -> Vec<Pet> {
    pets.iter()
        .filter(|p| p.is_spotlight_featured())
        .take(SPOTLIGHT_LIMIT)
        .cloned()
        .collect()
}

#[derive(Debug, Default)]
struct PetsState {
    current: CacheEnvelope<Pet>,
    admin: Vec<Pet>,
    fetching: bool,
    selected: Option<PetBookmark>,
    adopted_count: Option<i64>,
}

pub struct PetsStore {
    api: ApiClient,
    clock: Arc<dyn Clock>,
    policy: StorePolicy,
    persisted: StateStore,
    current_sequence: RequestSequence,
    admin_sequence: RequestSequence,
    state: RwLock<PetsState>,
}

impl PetsStore {
    pub fn new(
        api: ApiClient,
        clock: Arc<dyn Clock>,
        policy: StorePolicy,
        persisted: StateStore,
    ) -> Self {
        Self {
            api,
            clock,
            policy,
            persisted,
            current_sequence: RequestSequence::default(),
            admin_sequence: RequestSequence::default(),
            state: RwLock::new(PetsState::default()),
        }
    }

    // ==================== READS ====================

    pub async fn current_pets(&self) -> Vec<Pet> {
        self.state.read().await.current.data.clone()
    }

    pub async fn admin_pets(&self) -> Vec<Pet> {
        self.state.read().await.admin.clone()
    }

    pub async fn spotlight_pets(&self) -> Vec<Pet> {
        spotlight(&self.state.read().await.current.data)
    }

    pub async fn is_fetching(&self) -> bool {
        self.state.read().await.fetching
    }

    // ==================== FETCH ====================

    /// Available pets for the public listing, cached for the freshness window.
    pub async fn fetch_pets(&self, force_refresh: bool) -> FetchOutcome {
        let ticket = {
            let mut state = self.state.write().await;
            if !force_refresh
                && state
                    .current
                    .is_fresh(self.clock.now_millis(), self.policy.freshness_window)
            {
                tracing::debug!("Using cached pets");
                return FetchOutcome::Cached;
            }
            state.fetching = true;
            self.current_sequence.issue()
        };

        let params = [("status", "available".to_string()), ("sort", "age".to_string())];
        let result = self.api.list_pets(&params).await;

        let mut state = self.state.write().await;
        if !self.current_sequence.is_current(ticket) {
            tracing::debug!("Dropping superseded pets response");
            return FetchOutcome::Superseded;
        }
        state.fetching = false;

        match result {
            Ok(mut pets) => {
                sort_newest_first(&mut pets, Pet::created_at_millis);
                let count = pets.len();
                state.current.replace(pets, self.clock.now_millis());
                tracing::info!(count, "Pets refreshed");
                FetchOutcome::Refreshed(count)
            }
            Err(e) => {
                tracing::warn!("Failed to fetch pets: {}", e);
                FetchOutcome::Failed
            }
        }
    }

    /// Admin listing with arbitrary query parameters. Never cached.
    pub async fn fetch_admin_pets(&self, params: &[(&str, String)]) -> FetchOutcome {
        let ticket = self.admin_sequence.issue();
        let result = self.api.list_pets(params).await;

        let mut state = self.state.write().await;
        if !self.admin_sequence.is_current(ticket) {
            tracing::debug!("Dropping superseded admin pets response");
            return FetchOutcome::Superseded;
        }

        match result {
            Ok(mut pets) => {
                sort_newest_first(&mut pets, Pet::created_at_millis);
                let count = pets.len();
                state.admin = pets;
                FetchOutcome::Refreshed(count)
            }
            Err(e) => {
                tracing::warn!("Failed to fetch admin pets: {}", e);
                FetchOutcome::Failed
            }
        }
    }

    /// Lifetime adoption count. Failures read as `None` and keep the last value.
    pub async fn adopted_count(&self) -> Option<i64> {
        match self.api.adopted_count().await {
            Ok(count) => {
                self.state.write().await.adopted_count = Some(count);
                Some(count)
            }
            Err(e) => {
                tracing::warn!("Failed to fetch adopted count: {}", e);
                self.state.read().await.adopted_count
            }
        }
    }

    // ==================== WRITES ====================

    /// Save a pet. Both listings show the new record at once and revert if the PUT fails.
    pub async fn update_pet(&self, pet: Pet) -> Result<(), AppError> {
        let (current_txn, admin_txn) = {
            let mut state = self.state.write().await;
            let current = Optimistic::apply(&mut state.current.data, &pet.id, |p| *p = pet.clone());
            let admin = Optimistic::apply(&mut state.admin, &pet.id, |p| *p = pet.clone());
            (current, admin)
        };

        match self.api.update_pet(&pet).await {
            Ok(()) => {
                current_txn.into_iter().for_each(Optimistic::commit);
                admin_txn.into_iter().for_each(Optimistic::commit);
                tracing::info!(id = %pet.id, "Pet updated");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(id = %pet.id, "Pet update rejected, rolling back: {}", e);
                let mut state = self.state.write().await;
                if let Some(txn) = current_txn {
                    txn.rollback(&mut state.current.data);
                }
                if let Some(txn) = admin_txn {
                    txn.rollback(&mut state.admin);
                }
                Err(e)
            }
        }
    }

    // ==================== BOOKMARK ====================

    pub async fn selected_pet(&self) -> Option<PetBookmark> {
        self.state.read().await.selected.clone()
    }

    /// Remember the pet picked for an adoption form for the rest of the session.
    pub async fn select_pet(&self, bookmark: PetBookmark) -> Result<(), AppError> {
        self.persisted
            .put(Scope::Session, BOOKMARK_KEY, BOOKMARK_VERSION, &bookmark)
            .await?;
        self.state.write().await.selected = Some(bookmark);
        Ok(())
    }

    pub async fn clear_selected_pet(&self) -> Result<(), AppError> {
        self.state.write().await.selected = None;
        self.persisted.remove(Scope::Session, BOOKMARK_KEY).await
    }

    /// Restore the bookmark saved earlier in this session, if any.
    pub async fn init_from_storage(&self) -> Option<PetBookmark> {
        let stored = match self
            .persisted
            .get::<PetBookmark>(Scope::Session, BOOKMARK_KEY, BOOKMARK_VERSION)
            .await
        {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!("Failed to read pet bookmark: {}", e);
                None
            }
        };
        self.state.write().await.selected = stored.clone();
        stored
    }

    pub async fn reset(&self) {
        let mut state = self.state.write().await;
        *state = PetsState::default();
        self.current_sequence.issue();
        self.admin_sequence.issue();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pet(id: &str, featured: bool) -> Pet {
        serde_json::from_value(json!({
            "id": id,
            "name": format!("Pet {}", id),
            "profileSettings": { "isSpotlightFeatured": featured }
        }))
        .unwrap()
    }

    #[test]
    fn test_spotlight_caps_featured_pets() {
        let pets: Vec<Pet> = (1..=6).map(|i| pet(&i.to_string(), i != 2)).collect();
        let ids: Vec<String> = spotlight(&pets).into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["1", "3", "4", "5"]);
    }

    #[test]
    fn test_spotlight_empty_when_none_featured() {
        let pets = vec![pet("1", false), pet("2", false)];
        assert!(spotlight(&pets).is_empty());
    }
}

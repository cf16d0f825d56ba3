//! Marketing campaigns store.

use std::sync::Arc;

use tokio::sync::RwLock;

use super::{
    sort_newest_first, CacheEnvelope, Clock, FetchOutcome, Optimistic, RequestSequence,
    StorePolicy,
};
use crate::api::ApiClient;
use crate::errors::AppError;
use crate::models::Campaign;

pub struct CampaignsStore {
    api: ApiClient,
    clock: Arc<dyn Clock>,
    policy: StorePolicy,
    sequence: RequestSequence,
    cache: RwLock<CacheEnvelope<Campaign>>,
}

impl CampaignsStore {
    pub fn new(api: ApiClient, clock: Arc<dyn Clock>, policy: StorePolicy) -> Self {
        Self {
            api,
            clock,
            policy,
            sequence: RequestSequence::default(),
            cache: RwLock::new(CacheEnvelope::default()),
        }
    }

    pub async fn campaigns(&self) -> Vec<Campaign> {
        self.cache.read().await.data.clone()
    }

    pub async fn active_campaigns(&self) -> Vec<Campaign> {
        self.cache
            .read()
            .await
            .data
            .iter()
            .filter(|c| c.is_active())
            .cloned()
            .collect()
    }

    pub async fn fetch(&self, force_refresh: bool) -> FetchOutcome {
        if !force_refresh
            && self
                .cache
                .read()
                .await
                .is_fresh(self.clock.now_millis(), self.policy.freshness_window)
        {
            tracing::debug!("Using cached campaigns");
            return FetchOutcome::Cached;
        }

        let ticket = self.sequence.issue();
        let result = self.api.list_campaigns().await;

        let mut cache = self.cache.write().await;
        if !self.sequence.is_current(ticket) {
            return FetchOutcome::Superseded;
        }

        match result {
            Ok(mut campaigns) => {
                sort_newest_first(&mut campaigns, Campaign::created_at_millis);
                let count = campaigns.len();
                cache.replace(campaigns, self.clock.now_millis());
                tracing::info!(count, "Campaigns refreshed");
                FetchOutcome::Refreshed(count)
            }
            Err(e) => {
                tracing::warn!("Failed to fetch campaigns: {}", e);
                FetchOutcome::Failed
            }
        }
    }

    /// Save a campaign, reverting the local copy if the PUT fails.
    ///
    /// When the server echoes the saved record, that record replaces the local one.
    pub async fn update_campaign(&self, campaign: Campaign) -> Result<(), AppError> {
        let txn = {
            let mut cache = self.cache.write().await;
            Optimistic::apply(&mut cache.data, &campaign.id, |c| *c = campaign.clone())
        };

        match self.api.update_campaign(&campaign).await {
            Ok(saved) => {
                if let Some(txn) = txn {
                    txn.commit();
                }
                if let Some(saved) = saved {
                    let mut cache = self.cache.write().await;
                    if let Some(slot) = cache.data.iter_mut().find(|c| c.id == saved.id) {
                        *slot = saved;
                    }
                }
                Ok(())
            }
            Err(e) => {
                tracing::warn!(id = %campaign.id, "Campaign update rejected, rolling back: {}", e);
                if let Some(txn) = txn {
                    txn.rollback(&mut self.cache.write().await.data);
                }
                Err(e)
            }
        }
    }

    pub async fn reset(&self) {
        let mut cache = self.cache.write().await;
        cache.clear();
        self.sequence.issue();
    }
}

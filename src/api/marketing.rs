//! Marketing campaign endpoints.

use reqwest::Method;
use serde_json::Value;

use super::{endpoints, ApiClient};
use crate::errors::AppError;
use crate::models::Campaign;

impl ApiClient {
    /// GET /v1/marketing/campaigns
    pub async fn list_campaigns(&self) -> Result<Vec<Campaign>, AppError> {
        self.get_list(endpoints::MARKETING_CAMPAIGNS, &[], "campaigns")
            .await
    }

    /// PUT /v1/marketing/campaigns/{id} - returns the saved record when the server echoes it.
    pub async fn update_campaign(&self, campaign: &Campaign) -> Result<Option<Campaign>, AppError> {
        let response = self
            .send_json(
                Method::PUT,
                &endpoints::item(endpoints::MARKETING_CAMPAIGNS, &campaign.id),
                campaign,
            )
            .await?;

        let body: Value = response.json().await.unwrap_or(Value::Null);
        let Some(saved) = body
            .get("campaign")
            .or_else(|| body.pointer("/data/campaign"))
            .filter(|record| !record.is_null())
            .cloned()
        else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_value(saved)?))
    }
}

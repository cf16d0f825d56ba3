//! Marketing campaign model.

use serde::{Deserialize, Serialize};

use super::timestamp_millis;

/// A fundraising or awareness campaign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub goal: String,
    #[serde(default)]
    pub progress: i64,
    #[serde(default)]
    pub metric: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prize: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_price: Option<f64>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl Campaign {
    pub fn created_at_millis(&self) -> Option<i64> {
        timestamp_millis(&self.created_at)
    }

    pub fn is_active(&self) -> bool {
        self.status == "active"
    }
}

//! Push notification endpoints.

use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::{endpoints, ApiClient};
use crate::errors::AppError;

/// Browser push subscription as registered with the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushSubscription {
    pub endpoint: String,
    pub keys: PushKeys,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushKeys {
    pub p256dh: String,
    pub auth: String,
}

#[derive(Debug, Deserialize)]
struct PublicKeyResponse {
    public_key: String,
}

#[derive(Debug, Serialize)]
struct UnsubscribeRequest<'a> {
    endpoint: &'a str,
}

impl ApiClient {
    /// GET /v1/notifications/public-key - the VAPID application server key.
    pub async fn push_public_key(&self) -> Result<String, AppError> {
        let response: PublicKeyResponse = self
            .get_json(endpoints::NOTIFICATIONS_PUBLIC_KEY, &[])
            .await?;
        if response.public_key.is_empty() {
            return Err(AppError::Decode(
                "Server returned an empty VAPID key".to_string(),
            ));
        }
        Ok(response.public_key)
    }

    /// POST /v1/notifications/subscribe
    pub async fn push_subscribe(&self, subscription: &PushSubscription) -> Result<(), AppError> {
        self.send_json(Method::POST, endpoints::NOTIFICATIONS_SUBSCRIBE, subscription)
            .await?;
        Ok(())
    }

    /// POST /v1/notifications/unsubscribe
    pub async fn push_unsubscribe(&self, endpoint: &str) -> Result<(), AppError> {
        self.send_json(
            Method::POST,
            endpoints::NOTIFICATIONS_UNSUBSCRIBE,
            &UnsubscribeRequest { endpoint },
        )
        .await?;
        Ok(())
    }

    /// POST /v1/notifications/test - send a test push to one subscription.
    pub async fn push_test(&self, subscription: &PushSubscription) -> Result<(), AppError> {
        self.send_json(Method::POST, endpoints::NOTIFICATIONS_TEST, subscription)
            .await?;
        Ok(())
    }
}

//! Shelter API client.
//!
//! Thin typed wrappers over the upstream REST endpoints. Every request carries
//! the shared credential; non-OK responses become [`AppError`]s.

mod applications;
mod marketing;
mod notifications;
mod pets;
mod submissions;
mod users;
mod volunteers;

pub use notifications::*;

use std::sync::Arc;
use std::time::Duration;

use reqwest::{header, Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::auth::{Credential, SharedCredential};
use crate::errors::AppError;

/// Endpoint paths relative to the API base URL.
pub mod endpoints {
    pub const APPLICATIONS: &str = "/v1/applications";
    pub const PETS: &str = "/v1/pets";
    pub const ADOPTED_PETS_COUNT: &str = "/pets/adopted-count";
    pub const VOLUNTEERS: &str = "/v1/volunteers";
    pub const SHIFTS: &str = "/v1/shifts";
    pub const MARKETING_CAMPAIGNS: &str = "/v1/marketing/campaigns";
    pub const NOTIFICATIONS_PUBLIC_KEY: &str = "/v1/notifications/public-key";
    pub const NOTIFICATIONS_SUBSCRIBE: &str = "/v1/notifications/subscribe";
    pub const NOTIFICATIONS_UNSUBSCRIBE: &str = "/v1/notifications/unsubscribe";
    pub const NOTIFICATIONS_TEST: &str = "/v1/notifications/test";
    pub const LOGIN: &str = "/api/login";
    pub const USERS_ME: &str = "/api/users/me";
    pub const USERS_LOGOUT: &str = "/api/users/logout";
    pub const SUBMISSIONS: &str = "/applications";

    /// `{collection}/{id}`
    pub fn item(collection: &str, id: &str) -> String {
        format!("{}/{}", collection, id)
    }
}

/// HTTP client bound to one API base URL and the shared credential.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Arc<str>,
    credential: SharedCredential,
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        timeout: Duration,
        credential: SharedCredential,
    ) -> Result<Self, AppError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: Arc::from(base_url.trim_end_matches('/')),
            credential,
        })
    }

    pub fn credential(&self) -> Credential {
        match self.credential.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn set_credential(&self, credential: Credential) {
        match self.credential.write() {
            Ok(mut guard) => *guard = credential,
            Err(poisoned) => *poisoned.into_inner() = credential,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match self.credential().authorization() {
            Some(value) => builder.header(header::AUTHORIZATION, value),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, AppError> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = upstream_message(&body)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
        Err(AppError::from_status(status.as_u16(), message))
    }

    async fn get_value(&self, path: &str, query: &[(&str, String)]) -> Result<Value, AppError> {
        let response = self
            .send(self.request(Method::GET, path).query(query))
            .await?;
        Ok(response.json().await?)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, AppError> {
        Ok(serde_json::from_value(self.get_value(path, query).await?)?)
    }

    async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        key: &str,
    ) -> Result<Vec<T>, AppError> {
        extract_list(self.get_value(path, query).await?, key)
    }

    async fn get_text(&self, path: &str) -> Result<String, AppError> {
        let response = self.send(self.request(Method::GET, path)).await?;
        Ok(response.text().await?)
    }

    async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<Response, AppError> {
        self.send(self.request(method, path).json(body)).await
    }

    async fn post_empty(&self, path: &str) -> Result<Response, AppError> {
        self.send(self.request(Method::POST, path)).await
    }
}

/// Pull the message out of an upstream error body (`{"error": ...}` or `{"message": ...}`).
fn upstream_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    let Ok(value) = serde_json::from_str::<Value>(trimmed) else {
        return Some(trimmed.to_string());
    };
    let field = value.get("error").or_else(|| value.get("message"))?;
    match field {
        Value::String(s) => Some(s.clone()),
        Value::Object(obj) => obj
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string),
        other => Some(other.to_string()),
    }
}

/// Unwrap a list envelope.
///
/// Accepts `{key: [...]}`, `{data: [...]}` or a bare array. A missing or null
/// list reads as empty. Records that fail to parse are skipped with a warning.
pub fn extract_list<T: DeserializeOwned>(body: Value, key: &str) -> Result<Vec<T>, AppError> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove(key).or_else(|| map.remove("data")) {
            Some(Value::Array(items)) => items,
            Some(Value::Null) | None => Vec::new(),
            Some(_) => {
                return Err(AppError::Decode(format!(
                    "Expected `{}` to be a list",
                    key
                )))
            }
        },
        _ => {
            return Err(AppError::Decode(format!(
                "Expected an object or list for `{}`",
                key
            )))
        }
    };

    let mut parsed = Vec::with_capacity(items.len());
    for item in items {
        match serde_json::from_value(item) {
            Ok(record) => parsed.push(record),
            Err(e) => tracing::warn!("Skipping malformed {} record: {}", key, e),
        }
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: u32,
    }

    #[test]
    fn test_extract_list_envelope_shapes() {
        let keyed: Vec<Item> =
            extract_list(json!({ "applications": [{ "id": 1 }] }), "applications").unwrap();
        assert_eq!(keyed, vec![Item { id: 1 }]);

        let data: Vec<Item> = extract_list(json!({ "data": [{ "id": 2 }] }), "pets").unwrap();
        assert_eq!(data, vec![Item { id: 2 }]);

        let bare: Vec<Item> = extract_list(json!([{ "id": 3 }]), "pets").unwrap();
        assert_eq!(bare, vec![Item { id: 3 }]);

        let missing: Vec<Item> = extract_list(json!({ "metadata": {} }), "shifts").unwrap();
        assert!(missing.is_empty());

        let null: Vec<Item> = extract_list(json!({ "shifts": null }), "shifts").unwrap();
        assert!(null.is_empty());
    }

    #[test]
    fn test_extract_list_skips_malformed_records() {
        let items: Vec<Item> =
            extract_list(json!({ "data": [{ "id": 1 }, { "id": "x" }, { "id": 3 }] }), "data")
                .unwrap();
        assert_eq!(items, vec![Item { id: 1 }, Item { id: 3 }]);
    }

    #[test]
    fn test_extract_list_rejects_wrong_shape() {
        let result: Result<Vec<Item>, _> = extract_list(json!({ "data": 5 }), "data");
        assert!(matches!(result, Err(AppError::Decode(_))));
        let result: Result<Vec<Item>, _> = extract_list(json!("nope"), "data");
        assert!(result.is_err());
    }

    #[test]
    fn test_upstream_message_shapes() {
        assert_eq!(
            upstream_message(r#"{"error":"bad status"}"#).as_deref(),
            Some("bad status")
        );
        assert_eq!(
            upstream_message(r#"{"error":{"message":"nested"}}"#).as_deref(),
            Some("nested")
        );
        assert_eq!(upstream_message("plain text").as_deref(), Some("plain text"));
        assert_eq!(upstream_message("  "), None);
    }
}

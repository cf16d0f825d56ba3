//! Authentication for the console.
//!
//! Upstream requests carry exactly one [`Credential`], shared through the
//! console context. Kiosk clients are checked against an optional display key
//! using constant-time comparison.

mod permissions;

pub use permissions::*;

use std::sync::{Arc, RwLock};

use axum::{
    extract::Request,
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;

use crate::api::ApiClient;
use crate::errors::AppError;
use crate::models::User;

/// Header name for the kiosk display key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// The credential attached to upstream API requests.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum Credential {
    #[default]
    Anonymous,
    Bearer(String),
}

impl Credential {
    pub fn bearer(token: impl Into<String>) -> Self {
        Credential::Bearer(token.into())
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Credential::Bearer(_))
    }

    /// Value for the `Authorization` header, if any.
    pub fn authorization(&self) -> Option<String> {
        match self {
            Credential::Anonymous => None,
            Credential::Bearer(token) => Some(format!("Bearer {}", token)),
        }
    }
}

// Tokens never reach logs.
impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credential::Anonymous => f.write_str("Anonymous"),
            Credential::Bearer(_) => f.write_str("Bearer(***)"),
        }
    }
}

/// Credential slot shared by the API client and the auth session.
pub type SharedCredential = Arc<RwLock<Credential>>;

/// Signed-in user state on top of the shared credential.
pub struct AuthSession {
    api: ApiClient,
    user: tokio::sync::RwLock<Option<User>>,
}

impl AuthSession {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            user: tokio::sync::RwLock::new(None),
        }
    }

    pub async fn user(&self) -> Option<User> {
        self.user.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.user.read().await.is_some()
    }

    /// Permission level of the signed-in user.
    pub async fn permissions(&self) -> Permissions {
        let role = self.user.read().await.as_ref().map(|u| u.role.clone());
        Permissions::for_role(role.as_deref().unwrap_or_default())
    }

    /// Sign in and adopt the returned token as the credential.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AppError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AppError::Validation(
                "Email and password are required".to_string(),
            ));
        }

        let response = self.api.login(email, password).await?;
        if let Some(token) = response.token {
            self.api.set_credential(Credential::bearer(token));
        }

        let user = match response.user {
            Some(user) => user,
            None => self
                .fetch_profile()
                .await?
                .ok_or_else(|| AppError::Unauthorized("Login returned no user".to_string()))?,
        };

        tracing::info!(user_id = user.id, role = %user.role, "Signed in");
        *self.user.write().await = Some(user.clone());
        Ok(user)
    }

    /// Refresh the signed-in user. Any failure signs the user out locally.
    pub async fn check_auth(&self) -> Option<User> {
        let user = match self.fetch_profile().await {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!("Check auth failed: {}", e);
                None
            }
        };
        *self.user.write().await = user.clone();
        user
    }

    async fn fetch_profile(&self) -> Result<Option<User>, AppError> {
        Ok(self.api.profile().await?.data)
    }

    /// Best-effort server logout, then drop the credential and user.
    pub async fn logout(&self) {
        if let Err(e) = self.api.logout().await {
            tracing::warn!("Logout request failed: {}", e);
        }
        self.clear().await;
    }

    pub async fn clear(&self) {
        self.api.set_credential(Credential::Anonymous);
        *self.user.write().await = None;
    }
}

/// Display-key authentication layer for the kiosk feed.
pub async fn display_key_layer(
    expected_key: Option<String>,
    request: Request,
    next: Next,
) -> Response {
    // No key configured: open feed (dev mode)
    let Some(expected) = expected_key else {
        return next.run(request).await;
    };

    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .or_else(|| {
            request
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.strip_prefix("Bearer "))
        })
        .map(|s| s.to_string());

    match provided {
        Some(key) if constant_time_compare(&key, &expected) => next.run(request).await,
        Some(_) => AppError::Unauthorized("Invalid display key".to_string()).into_response(),
        None => AppError::Unauthorized("Missing display key".to_string()).into_response(),
    }
}

/// Perform constant-time string comparison.
fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("kiosk-key", "kiosk-key"));
        assert!(!constant_time_compare("kiosk-key", "kiosk-kez"));
        assert!(!constant_time_compare("short", "much-longer-key"));
        assert!(constant_time_compare("", ""));
    }

    #[test]
    fn test_credential_header_and_redaction() {
        let cred = Credential::bearer("abc-123");
        assert_eq!(cred.authorization().as_deref(), Some("Bearer abc-123"));
        assert_eq!(format!("{:?}", cred), "Bearer(***)");
        assert!(Credential::default().authorization().is_none());
        assert!(!Credential::Anonymous.is_authenticated());
    }
}

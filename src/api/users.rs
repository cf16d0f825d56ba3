//! Session endpoints.

use reqwest::Method;

use super::{endpoints, ApiClient};
use crate::errors::AppError;
use crate::models::{LoginRequest, LoginResponse, ProfileResponse};

impl ApiClient {
    /// POST /api/login
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, AppError> {
        let response = self
            .send_json(Method::POST, endpoints::LOGIN, &LoginRequest { email, password })
            .await
            .map_err(|e| match e {
                AppError::Upstream { status, message } if status < 500 => {
                    AppError::Unauthorized(format!("Login rejected ({}): {}", status, message))
                }
                other => other,
            })?;
        Ok(response.json().await?)
    }

    /// GET /api/users/me
    pub async fn profile(&self) -> Result<ProfileResponse, AppError> {
        self.get_json(endpoints::USERS_ME, &[]).await
    }

    /// POST /api/users/logout
    pub async fn logout(&self) -> Result<(), AppError> {
        self.post_empty(endpoints::USERS_LOGOUT).await?;
        Ok(())
    }
}

//! Public application form submissions.

use reqwest::Method;
use serde_json::Value;

use super::{endpoints, ApiClient};
use crate::errors::AppError;
use crate::models::ApplicationType;

impl ApiClient {
    /// POST /applications/{adoption|volunteer|surrender} - submit a public form.
    ///
    /// Returns the server's confirmation message.
    pub async fn submit_application(
        &self,
        kind: ApplicationType,
        payload: &Value,
    ) -> Result<String, AppError> {
        if !payload.is_object() {
            return Err(AppError::Validation(
                "Application payload must be a JSON object".to_string(),
            ));
        }

        let response = self
            .send_json(
                Method::POST,
                &endpoints::item(endpoints::SUBMISSIONS, kind.as_str()),
                payload,
            )
            .await?;

        let body: Value = response.json().await.unwrap_or(Value::Null);
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("Application received")
            .to_string();
        tracing::info!(kind = kind.as_str(), "Application submitted");
        Ok(message)
    }
}

//! Application endpoints.

use reqwest::Method;

use super::{endpoints, ApiClient};
use crate::errors::AppError;
use crate::models::{Application, ApplicationStatus, RawApplication, UpdateStatusRequest};

impl ApiClient {
    /// GET /v1/applications?page_size=&year= - list one year of applications, mapped for display.
    pub async fn list_applications(
        &self,
        year: i32,
        page_size: u32,
    ) -> Result<Vec<Application>, AppError> {
        let raw: Vec<RawApplication> = self
            .get_list(
                endpoints::APPLICATIONS,
                &[("page_size", page_size.to_string()), ("year", year.to_string())],
                "applications",
            )
            .await?;
        Ok(raw.into_iter().map(Application::from).collect())
    }

    /// PUT /v1/applications/{id} - change an application's status.
    pub async fn update_application_status(
        &self,
        id: &str,
        status: &ApplicationStatus,
    ) -> Result<(), AppError> {
        self.send_json(
            Method::PUT,
            &endpoints::item(endpoints::APPLICATIONS, id),
            &UpdateStatusRequest { status },
        )
        .await?;
        Ok(())
    }

    /// GET /v1/applications/{id}/original - the submitted form as HTML.
    pub async fn application_original(&self, id: &str) -> Result<String, AppError> {
        self.get_text(&format!(
            "{}/original",
            endpoints::item(endpoints::APPLICATIONS, id)
        ))
        .await
    }

    /// POST /v1/applications/{id}/resend-email - resend the confirmation email.
    pub async fn resend_application_email(&self, id: &str) -> Result<(), AppError> {
        self.post_empty(&format!(
            "{}/resend-email",
            endpoints::item(endpoints::APPLICATIONS, id)
        ))
        .await?;
        Ok(())
    }
}

//! Volunteer and shift endpoints.

use chrono::NaiveDate;

use super::{endpoints, ApiClient};
use crate::errors::AppError;
use crate::models::{Shift, Volunteer};

impl ApiClient {
    /// GET /v1/volunteers?status=&page_size=
    pub async fn list_volunteers(
        &self,
        status: Option<&str>,
        page_size: u32,
    ) -> Result<Vec<Volunteer>, AppError> {
        let mut query = vec![("page_size", page_size.to_string())];
        if let Some(status) = status {
            query.push(("status", status.to_string()));
        }
        self.get_list(endpoints::VOLUNTEERS, &query, "volunteers")
            .await
    }

    /// GET /v1/shifts?start=&end= - shifts within an inclusive date window.
    pub async fn list_shifts(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Shift>, AppError> {
        self.get_list(
            endpoints::SHIFTS,
            &[
                ("start", start.format("%Y-%m-%d").to_string()),
                ("end", end.format("%Y-%m-%d").to_string()),
            ],
            "shifts",
        )
        .await
    }
}

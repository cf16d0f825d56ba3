//! Pet endpoints.

use reqwest::Method;

use super::{endpoints, ApiClient};
use crate::errors::AppError;
use crate::models::{AdoptedCount, Pet};

impl ApiClient {
    /// GET /v1/pets?<params> - list pets matching the given query.
    pub async fn list_pets(&self, params: &[(&str, String)]) -> Result<Vec<Pet>, AppError> {
        self.get_list(endpoints::PETS, params, "data").await
    }

    /// PUT /v1/pets/{id} - save a full pet record.
    pub async fn update_pet(&self, pet: &Pet) -> Result<(), AppError> {
        self.send_json(
            Method::PUT,
            &endpoints::item(endpoints::PETS, &pet.id),
            pet,
        )
        .await?;
        Ok(())
    }

    /// GET /pets/adopted-count - lifetime adoptions, shown on the public site.
    pub async fn adopted_count(&self) -> Result<i64, AppError> {
        let count: AdoptedCount = self.get_json(endpoints::ADOPTED_PETS_COUNT, &[]).await?;
        Ok(count.count)
    }
}

//! Application tracker operations against `/applications/`

use std::sync::Arc;

use folio_domain::{Application, ApplicationFilter, ApplicationPatch, NewApplication};

use crate::api::{ApiClient, ApiError};

/// CRUD for tracked applications (admin only)
#[derive(Debug, Clone)]
pub struct ApplicationsApi {
    client: Arc<ApiClient>,
}

impl ApplicationsApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// All applications matching the filter
    pub async fn list(&self, filter: &ApplicationFilter) -> Result<Vec<Application>, ApiError> {
        self.client.get_query("/applications/", filter).await
    }

    /// Single application by id
    pub async fn get(&self, id: i64) -> Result<Application, ApiError> {
        self.client.get(&format!("/applications/{id}/")).await
    }

    /// Create an application
    pub async fn create(&self, application: &NewApplication) -> Result<Application, ApiError> {
        self.client.post("/applications/", application).await
    }

    /// Partial update
    pub async fn update(&self, id: i64, patch: &ApplicationPatch) -> Result<Application, ApiError> {
        self.client.patch(&format!("/applications/{id}/"), patch).await
    }

    /// Delete an application
    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.client.delete(&format!("/applications/{id}/")).await
    }
}

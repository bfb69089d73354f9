//! Achievement collection operations against `/achievements/`

use std::sync::Arc;

use folio_domain::{Achievement, AchievementPatch, NewAchievement};
use serde_json::json;

use crate::api::{ApiClient, ApiError, Upload};

/// CRUD and certificate upload for achievements
#[derive(Debug, Clone)]
pub struct AchievementsApi {
    client: Arc<ApiClient>,
}

impl AchievementsApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// All achievements (public)
    pub async fn list(&self) -> Result<Vec<Achievement>, ApiError> {
        self.client.get("/achievements/").await
    }

    /// Achievements of one kind, e.g. "award" (public)
    pub async fn by_kind(&self, kind: &str) -> Result<Vec<Achievement>, ApiError> {
        self.client.get_query("/achievements/", &json!({ "type": kind })).await
    }

    /// Create an achievement (admin only)
    pub async fn create(&self, achievement: &NewAchievement) -> Result<Achievement, ApiError> {
        self.client.post("/achievements/", achievement).await
    }

    /// Partial update (admin only)
    pub async fn update(&self, id: i64, patch: &AchievementPatch) -> Result<Achievement, ApiError> {
        self.client.patch(&format!("/achievements/{id}/"), patch).await
    }

    /// Delete an achievement (admin only)
    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.client.delete(&format!("/achievements/{id}/")).await
    }

    /// Upload the certificate scan (admin only)
    pub async fn upload_certificate(
        &self,
        id: i64,
        upload: Upload,
    ) -> Result<Achievement, ApiError> {
        self.client
            .post_multipart(&format!("/achievements/{id}/upload-certificate/"), "certificate", upload)
            .await
    }
}

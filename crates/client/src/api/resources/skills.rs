//! Skill collection operations against `/skills/`

use std::sync::Arc;

use folio_domain::{NewSkill, Skill, SkillPatch};
use serde_json::json;

use crate::api::{ApiClient, ApiError};

/// CRUD, category listing and reordering for skills
#[derive(Debug, Clone)]
pub struct SkillsApi {
    client: Arc<ApiClient>,
}

impl SkillsApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// All skills (public)
    pub async fn list(&self) -> Result<Vec<Skill>, ApiError> {
        self.client.get("/skills/").await
    }

    /// Skills in one category (public)
    pub async fn by_category(&self, category: &str) -> Result<Vec<Skill>, ApiError> {
        self.client.get_query("/skills/", &json!({ "category": category })).await
    }

    /// Distinct skill categories (public)
    pub async fn categories(&self) -> Result<Vec<String>, ApiError> {
        self.client.get("/skills/categories/").await
    }

    /// Create a skill (admin only)
    pub async fn create(&self, skill: &NewSkill) -> Result<Skill, ApiError> {
        self.client.post("/skills/", skill).await
    }

    /// Partial update (admin only)
    pub async fn update(&self, id: i64, patch: &SkillPatch) -> Result<Skill, ApiError> {
        self.client.patch(&format!("/skills/{id}/"), patch).await
    }

    /// Delete a skill (admin only)
    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.client.delete(&format!("/skills/{id}/")).await
    }

    /// Persist a new display order for all skills (admin only)
    pub async fn reorder(&self, ordered_ids: &[i64]) -> Result<Vec<Skill>, ApiError> {
        self.client.post("/skills/reorder/", &json!({ "order": ordered_ids })).await
    }
}

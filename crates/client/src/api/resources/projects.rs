//! Project collection operations against `/projects/`

use std::sync::Arc;

use folio_domain::{NewProject, Project, ProjectFilter, ProjectPatch};

use crate::api::{ApiClient, ApiError, Upload};

/// CRUD and image upload for portfolio projects
#[derive(Debug, Clone)]
pub struct ProjectsApi {
    client: Arc<ApiClient>,
}

impl ProjectsApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// All projects, optionally filtered (public)
    pub async fn list(&self, filter: &ProjectFilter) -> Result<Vec<Project>, ApiError> {
        self.client.get_query("/projects/", filter).await
    }

    /// Featured projects only (public)
    pub async fn featured(&self) -> Result<Vec<Project>, ApiError> {
        self.list(&ProjectFilter { featured: Some(true) }).await
    }

    /// Single project by slug (public)
    pub async fn get_by_slug(&self, slug: &str) -> Result<Project, ApiError> {
        self.client.get(&format!("/projects/{slug}/")).await
    }

    /// Create a project (admin only)
    pub async fn create(&self, project: &NewProject) -> Result<Project, ApiError> {
        self.client.post("/projects/", project).await
    }

    /// Partial update (admin only)
    pub async fn update(&self, id: i64, patch: &ProjectPatch) -> Result<Project, ApiError> {
        self.client.patch(&format!("/projects/{id}/"), patch).await
    }

    /// Delete a project (admin only)
    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.client.delete(&format!("/projects/{id}/")).await
    }

    /// Upload the project's cover image (admin only)
    pub async fn upload_image(&self, id: i64, upload: Upload) -> Result<Project, ApiError> {
        self.client.post_multipart(&format!("/projects/{id}/upload-image/"), "image", upload).await
    }
}

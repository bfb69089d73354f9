//! Blog collection operations against `/blogs/`

use std::sync::Arc;

use folio_domain::{Blog, BlogFilter, BlogPatch, BlogStatus, NewBlog};

use crate::api::{ApiClient, ApiError, Upload};

/// CRUD, publication workflow and thumbnail upload for blog posts
#[derive(Debug, Clone)]
pub struct BlogsApi {
    client: Arc<ApiClient>,
}

impl BlogsApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Published posts only (public); the status filter is forced
    pub async fn published(&self, filter: &BlogFilter) -> Result<Vec<Blog>, ApiError> {
        let filter = BlogFilter { status: Some(BlogStatus::Published), ..filter.clone() };
        self.client.get_query("/blogs/", &filter).await
    }

    /// Every post including drafts (admin only)
    pub async fn all(&self, filter: &BlogFilter) -> Result<Vec<Blog>, ApiError> {
        self.client.get_query("/blogs/all/", filter).await
    }

    /// Single post by slug (public)
    pub async fn get_by_slug(&self, slug: &str) -> Result<Blog, ApiError> {
        self.client.get(&format!("/blogs/{slug}/")).await
    }

    /// Distinct post categories (public)
    pub async fn categories(&self) -> Result<Vec<String>, ApiError> {
        self.client.get("/blogs/categories/").await
    }

    /// Create a draft (admin only)
    pub async fn create(&self, blog: &NewBlog) -> Result<Blog, ApiError> {
        self.client.post("/blogs/", blog).await
    }

    /// Partial update (admin only)
    pub async fn update(&self, id: i64, patch: &BlogPatch) -> Result<Blog, ApiError> {
        self.client.patch(&format!("/blogs/{id}/"), patch).await
    }

    /// Delete a post (admin only)
    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.client.delete(&format!("/blogs/{id}/")).await
    }

    /// Publish a draft (admin only)
    pub async fn publish(&self, id: i64) -> Result<Blog, ApiError> {
        self.client.post_empty(&format!("/blogs/{id}/publish/")).await
    }

    /// Take a published post back to draft (admin only)
    pub async fn unpublish(&self, id: i64) -> Result<Blog, ApiError> {
        self.client.post_empty(&format!("/blogs/{id}/unpublish/")).await
    }

    /// Upload the post's thumbnail (admin only)
    pub async fn upload_thumbnail(&self, id: i64, upload: Upload) -> Result<Blog, ApiError> {
        self.client
            .post_multipart(&format!("/blogs/{id}/upload-thumbnail/"), "thumbnail", upload)
            .await
    }
}

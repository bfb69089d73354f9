//! Site profile operations against `/profile/`

use std::sync::Arc;

use folio_domain::{Profile, ProfilePatch};

use crate::api::{ApiClient, ApiError, Upload};

/// Public profile blob: read, update and portrait upload
#[derive(Debug, Clone)]
pub struct ProfileApi {
    client: Arc<ApiClient>,
}

impl ProfileApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// The site owner's profile (public)
    pub async fn get(&self) -> Result<Profile, ApiError> {
        self.client.get("/profile/").await
    }

    /// Partial update (admin only)
    pub async fn update(&self, patch: &ProfilePatch) -> Result<Profile, ApiError> {
        self.client.patch("/profile/", patch).await
    }

    /// Upload the profile image (admin only)
    pub async fn upload_image(&self, upload: Upload) -> Result<Profile, ApiError> {
        self.client.post_multipart("/profile/upload-image/", "image", upload).await
    }
}

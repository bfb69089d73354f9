//! Contact message operations against `/contact/`

use std::sync::Arc;

use folio_domain::{ContactFilter, ContactMessage, NewContactMessage};
use serde_json::json;

use crate::api::{ApiClient, ApiError};

/// Public message submission plus admin-side inbox management
#[derive(Debug, Clone)]
pub struct ContactApi {
    client: Arc<ApiClient>,
}

impl ContactApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Submit a message through the public contact form
    pub async fn send(&self, message: &NewContactMessage) -> Result<ContactMessage, ApiError> {
        self.client.post("/contact/", message).await
    }

    /// All received messages (admin only)
    pub async fn messages(&self, filter: &ContactFilter) -> Result<Vec<ContactMessage>, ApiError> {
        self.client.get_query("/contact/", filter).await
    }

    /// Mark one message as read (admin only)
    pub async fn mark_read(&self, id: i64) -> Result<ContactMessage, ApiError> {
        self.client.patch(&format!("/contact/{id}/"), &json!({ "is_read": true })).await
    }

    /// Delete a message (admin only)
    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.client.delete(&format!("/contact/{id}/")).await
    }
}

//! Contact messages submitted through the public contact form

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored contact message as served by `/contact/` (admin only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactMessage {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Body for `POST /contact/` (public)
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// List filter for `GET /contact/`
#[derive(Debug, Clone, Default, Serialize)]
pub struct ContactFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_read: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

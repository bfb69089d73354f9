//! Application tracker entries (jobs, scholarships, internships, exams)

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// What the application is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationCategory {
    Job,
    Scholarship,
    Internship,
    Exam,
    Others,
}

/// Where the application currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Applied,
    Selected,
    Rejected,
}

/// Tracker entry as served by `/applications/`
///
/// `category_display`, `status_display` and `days_until_deadline` are
/// computed server-side and read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    pub id: i64,
    pub title: String,
    pub organization: String,
    pub category: ApplicationCategory,
    pub category_display: String,
    pub deadline: NaiveDate,
    pub result_date: Option<NaiveDate>,
    pub status: ApplicationStatus,
    pub status_display: String,
    #[serde(default)]
    pub notes: String,
    pub days_until_deadline: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create body for `POST /applications/`
#[derive(Debug, Clone, Serialize)]
pub struct NewApplication {
    pub title: String,
    pub organization: String,
    pub category: ApplicationCategory,
    pub deadline: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_date: Option<NaiveDate>,
    pub status: ApplicationStatus,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub notes: String,
}

/// Partial update body for `PATCH /applications/{id}/`
#[derive(Debug, Clone, Default, Serialize)]
pub struct ApplicationPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<ApplicationCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ApplicationStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// List filter for `GET /applications/`
#[derive(Debug, Clone, Default, Serialize)]
pub struct ApplicationFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<ApplicationCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ApplicationStatus>,
    /// DRF ordering expression, e.g. "deadline" or "-created_at"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ordering: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn application_deserializes_backend_shape() {
        let body = r#"{
            "id": 7,
            "title": "Graduate Scheme",
            "organization": "Initech",
            "category": "job",
            "category_display": "Job",
            "deadline": "2026-09-15",
            "result_date": null,
            "status": "applied",
            "status_display": "Applied",
            "notes": "",
            "days_until_deadline": 40,
            "created_at": "2026-08-01T10:00:00Z",
            "updated_at": "2026-08-02T11:30:00Z"
        }"#;

        let parsed: Application = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.category, ApplicationCategory::Job);
        assert_eq!(parsed.status, ApplicationStatus::Applied);
        assert_eq!(parsed.days_until_deadline, 40);
    }

    #[test]
    fn filter_serializes_only_set_fields() {
        let filter = ApplicationFilter {
            status: Some(ApplicationStatus::Pending),
            ordering: Some("deadline".into()),
            ..Default::default()
        };
        let value = serde_json::to_value(&filter).unwrap();
        let map = value.as_object().unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["status"], "pending");
        assert_eq!(map["ordering"], "deadline");
    }
}

//! Public site content: projects, skills, blog posts, achievements

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Portfolio project as served by `/projects/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: String,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    pub repo_url: Option<String>,
    pub live_url: Option<String>,
    /// CDN URL of the uploaded cover image
    pub image: Option<String>,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create body for `POST /projects/`
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewProject {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tech_stack: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live_url: Option<String>,
    pub featured: bool,
}

/// Partial update body for `PATCH /projects/{id}/`
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tech_stack: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
}

/// List filter for `GET /projects/`
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
}

/// Skill entry as served by `/skills/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    pub id: i64,
    pub name: String,
    pub category: String,
    /// 0-100 proficiency as rendered by the skill bars
    pub proficiency: u8,
    pub icon: Option<String>,
    pub display_order: i64,
}

/// Create body for `POST /skills/`
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewSkill {
    pub name: String,
    pub category: String,
    pub proficiency: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Partial update body for `PATCH /skills/{id}/`
#[derive(Debug, Clone, Default, Serialize)]
pub struct SkillPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proficiency: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Publication state of a blog post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlogStatus {
    Draft,
    Published,
}

impl BlogStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
        }
    }
}

/// Blog post as served by `/blogs/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Blog {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub category: String,
    pub thumbnail: Option<String>,
    pub status: BlogStatus,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create body for `POST /blogs/`
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewBlog {
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub category: String,
}

/// Partial update body for `PATCH /blogs/{id}/`
#[derive(Debug, Clone, Default, Serialize)]
pub struct BlogPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// List filter for `GET /blogs/` and `GET /blogs/all/`
#[derive(Debug, Clone, Default, Serialize)]
pub struct BlogFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<BlogStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

/// Achievement or certification as served by `/achievements/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Achievement {
    pub id: i64,
    pub title: String,
    /// Free-form kind, e.g. "award", "certification"
    #[serde(rename = "type")]
    pub kind: String,
    pub issuer: String,
    pub description: String,
    /// CDN URL of the uploaded certificate scan
    pub certificate: Option<String>,
    pub awarded_on: Option<NaiveDate>,
}

/// Create body for `POST /achievements/`
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewAchievement {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub issuer: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub awarded_on: Option<NaiveDate>,
}

/// Partial update body for `PATCH /achievements/{id}/`
#[derive(Debug, Clone, Default, Serialize)]
pub struct AchievementPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub awarded_on: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_patch_skips_absent_fields() {
        let patch = ProjectPatch { featured: Some(true), ..Default::default() };
        let value = serde_json::to_value(&patch).unwrap();
        let map = value.as_object().unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map["featured"], true);
    }

    #[test]
    fn blog_status_round_trips_lowercase() {
        assert_eq!(serde_json::to_value(BlogStatus::Published).unwrap(), "published");
        let parsed: BlogStatus = serde_json::from_str("\"draft\"").unwrap();
        assert_eq!(parsed, BlogStatus::Draft);
    }

    #[test]
    fn achievement_kind_maps_to_type_field() {
        let body = r#"{
            "id": 3,
            "title": "Best Paper",
            "type": "award",
            "issuer": "ACM",
            "description": "",
            "certificate": null,
            "awarded_on": "2024-05-01"
        }"#;
        let parsed: Achievement = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.kind, "award");
        assert_eq!(parsed.awarded_on, Some(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()));
    }
}

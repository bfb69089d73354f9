//! Typed services over the resource collections of the backend.
//!
//! Each service is a thin wrapper around the shared [`ApiClient`]: it
//! knows its collection's paths, verbs and payloads and nothing else.
//! Authentication, refresh and error normalization happen underneath.

mod achievements;
mod applications;
mod auth;
mod blogs;
mod contact;
mod profile;
mod projects;
mod skills;

pub use achievements::AchievementsApi;
pub use applications::ApplicationsApi;
pub use auth::AuthApi;
pub use blogs::BlogsApi;
pub use contact::ContactApi;
pub use profile::ProfileApi;
pub use projects::ProjectsApi;
pub use skills::SkillsApi;

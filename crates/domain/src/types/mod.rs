//! Domain types and models
//!
//! One module per backend collection, mirroring the REST resources the
//! client talks to. Read models carry server-populated fields; `New*`
//! payloads are create bodies and `*Patch` payloads are partial updates
//! (absent fields are not serialized).

pub mod application;
pub mod auth;
pub mod contact;
pub mod content;
pub mod profile;

pub use application::{
    Application, ApplicationCategory, ApplicationFilter, ApplicationPatch, ApplicationStatus,
    NewApplication,
};
pub use auth::{ChangePasswordRequest, Detail, LoginRequest, LoginResponse, RefreshResponse, User};
pub use contact::{ContactFilter, ContactMessage, NewContactMessage};
pub use content::{
    Achievement, AchievementPatch, Blog, BlogFilter, BlogPatch, BlogStatus, NewAchievement,
    NewBlog, NewProject, NewSkill, Project, ProjectFilter, ProjectPatch, Skill, SkillPatch,
};
pub use profile::{Profile, ProfilePatch};

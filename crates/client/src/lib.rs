//! # Folio Client
//!
//! Authenticated HTTP client for the Folio portfolio backend.
//!
//! This crate contains:
//! - Environment-driven configuration
//! - The HTTP transport wrapper (single shared reqwest client)
//! - The in-memory credential store and session event channel
//! - The API client with bearer attachment, one-shot refresh-and-retry
//!   on 401, and error normalization
//! - One typed service per backend resource collection
//!
//! ## Architecture
//! - All I/O lives here; `folio-domain` stays pure data and
//!   `folio-common` stays backend-agnostic
//! - Resilience against transient failures is opt-in through the
//!   `folio-common` retry executor with [`api::TransientRetry`]

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod api;
pub mod auth;
pub mod config;
mod folio;
pub mod http;

// Re-export commonly used items
pub use api::{ApiClient, ApiError, ApiErrorCategory, TransientRetry, Upload};
pub use auth::{CredentialStore, SessionEvent, SessionEvents, SessionPhase};
pub use config::ClientConfig;
pub use folio::Folio;
pub use http::HttpClient;

//! Modular common utilities shared across Folio crates.
//!
//! Two concerns live here, both free of any backend knowledge:
//! - `forms`: a generic field-state container with composable validation
//!   chains, usable by any front end
//! - `resilience`: a retry executor with pluggable backoff and retry
//!   policies for transient failures

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod forms;
pub mod resilience;

// Re-export commonly used types for convenience
// ------------------------
pub use forms::{
    email, max_length, min_length, pattern, required, url, FieldInput, FieldRule, FieldValue,
    FileHandle, FormState, RuleSet,
};
pub use resilience::{
    retry, retry_with, BackoffStrategy, RetryConfig, RetryConfigBuilder, RetryDecision,
    RetryError, RetryExecutor, RetryPolicy, RetryResult,
};

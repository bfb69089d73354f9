//! API error types and failure-message normalization
//!
//! Every failure that crosses the API boundary carries a single
//! human-readable message, picked from the response body by an ordered
//! sequence of typed matchers. User-facing code displays
//! [`ApiError::message`] without inspecting the body itself.

use folio_domain::FolioError;
use serde_json::Value;
use thiserror::Error;

/// Fixed message for connectivity failures
pub const CONNECT_ERROR_MESSAGE: &str =
    "Unable to connect to server. Please check your internet connection.";

/// Fixed message for transport timeouts
pub const TIMEOUT_ERROR_MESSAGE: &str = "Request timed out. Please try again.";

/// Fallback when nothing better can be extracted
pub const GENERIC_ERROR_MESSAGE: &str = "An unexpected error occurred. Please try again.";

/// Message used when the session cannot be renewed
pub const SESSION_ENDED_MESSAGE: &str = "Your session has expired. Please log in again.";

/// Categories of API errors for retry decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// Authentication errors (401, 403) - resolved via refresh, never by
    /// blind retry
    Authentication,
    /// Server errors (5xx) - retryable
    Server,
    /// Client errors (4xx except auth) - non-retryable
    Client,
    /// Network/connection errors - retryable
    Network,
    /// Timeouts - retryable
    Timeout,
    /// Configuration errors - non-retryable
    Config,
}

/// API operation errors with a normalized display message
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Client error: {0}")]
    Client(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// Classify a non-success HTTP response, normalizing its body into a
    /// display message.
    pub fn from_response(status: reqwest::StatusCode, body: &str) -> Self {
        let message = normalize_error_body(body).unwrap_or_else(|| GENERIC_ERROR_MESSAGE.into());

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            Self::Auth(message)
        } else if status.is_client_error() {
            Self::Client(message)
        } else {
            Self::Server(message)
        }
    }

    /// The normalized human-readable message, what user-facing code
    /// shows.
    pub fn message(&self) -> &str {
        match self {
            Self::Auth(m)
            | Self::Client(m)
            | Self::Server(m)
            | Self::Network(m)
            | Self::Timeout(m)
            | Self::Config(m) => m,
        }
    }

    /// Get the error category for this error
    pub fn category(&self) -> ApiErrorCategory {
        match self {
            Self::Auth(_) => ApiErrorCategory::Authentication,
            Self::Client(_) => ApiErrorCategory::Client,
            Self::Server(_) => ApiErrorCategory::Server,
            Self::Network(_) => ApiErrorCategory::Network,
            Self::Timeout(_) => ApiErrorCategory::Timeout,
            Self::Config(_) => ApiErrorCategory::Config,
        }
    }

    /// Whether a blind retry can help: only server-side and transport
    /// failures are transient. Client-class errors (auth included) are
    /// not.
    pub fn should_retry(&self) -> bool {
        matches!(
            self.category(),
            ApiErrorCategory::Server | ApiErrorCategory::Network | ApiErrorCategory::Timeout
        )
    }
}

impl From<FolioError> for ApiError {
    fn from(err: FolioError) -> Self {
        match err {
            FolioError::Network(_) => Self::Network(CONNECT_ERROR_MESSAGE.into()),
            FolioError::Timeout(_) => Self::Timeout(TIMEOUT_ERROR_MESSAGE.into()),
            FolioError::Auth(message) => Self::Auth(message),
            FolioError::Config(message) => Self::Config(message),
            FolioError::NotFound(message) | FolioError::InvalidInput(message) => {
                Self::Client(message)
            }
            FolioError::Internal(message) => Self::Server(message),
        }
    }
}

/// Retry policy wired to [`ApiError::should_retry`], for use with the
/// `folio-common` retry executor.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransientRetry;

impl folio_common::RetryPolicy<ApiError> for TransientRetry {
    fn should_retry(&self, error: &ApiError, _attempt: u32) -> folio_common::RetryDecision {
        if error.should_retry() {
            folio_common::RetryDecision::Retry
        } else {
            folio_common::RetryDecision::Stop
        }
    }
}

/// One step of the normalization chain: inspect the parsed body, yield a
/// message when this shape matches.
type BodyMatcher = fn(&Value) -> Option<String>;

/// Matchers in precedence order. The first hit wins.
const BODY_MATCHERS: &[BodyMatcher] =
    &[verbatim_string, message_field, detail_field, error_field, first_field_error_list];

/// Extract a display message from a failure body, if any shape matches.
///
/// A body that is not valid JSON is used verbatim (servers and proxies
/// emit plain-text errors); an empty body yields nothing.
pub fn normalize_error_body(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    let parsed: Value = match serde_json::from_str(trimmed) {
        Ok(value) => value,
        Err(_) => return Some(trimmed.to_string()),
    };

    BODY_MATCHERS.iter().find_map(|matcher| matcher(&parsed))
}

fn verbatim_string(body: &Value) -> Option<String> {
    match body {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn string_field(body: &Value, field: &str) -> Option<String> {
    body.as_object()?.get(field)?.as_str().map(str::to_string)
}

fn message_field(body: &Value) -> Option<String> {
    string_field(body, "message")
}

fn detail_field(body: &Value) -> Option<String> {
    string_field(body, "detail")
}

fn error_field(body: &Value) -> Option<String> {
    string_field(body, "error")
}

/// Field-level validation payloads map field names to lists of messages;
/// surface the first message of the first declared field. Key order is
/// the order the backend serialized (`serde_json/preserve_order`).
fn first_field_error_list(body: &Value) -> Option<String> {
    let object = body.as_object()?;
    let (_, value) = object.iter().next()?;
    let list = value.as_array()?;
    list.first()?.as_str().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::*;

    #[test]
    fn string_body_is_used_verbatim() {
        assert_eq!(normalize_error_body("\"quota exceeded\"").as_deref(), Some("quota exceeded"));
    }

    #[test]
    fn plain_text_body_is_used_verbatim() {
        assert_eq!(normalize_error_body("Bad Gateway").as_deref(), Some("Bad Gateway"));
    }

    #[test]
    fn message_field_beats_detail_and_error() {
        let body = r#"{"detail": "d", "error": "e", "message": "m"}"#;
        assert_eq!(normalize_error_body(body).as_deref(), Some("m"));
    }

    #[test]
    fn detail_field_beats_error() {
        let body = r#"{"error": "e", "detail": "d"}"#;
        assert_eq!(normalize_error_body(body).as_deref(), Some("d"));
    }

    #[test]
    fn error_field_is_used_when_present() {
        let body = r#"{"error": "invalid_grant"}"#;
        assert_eq!(normalize_error_body(body).as_deref(), Some("invalid_grant"));
    }

    #[test]
    fn first_declared_validation_error_is_surfaced() {
        let body = r#"{"email": ["Enter a valid email address.", "Too long."], "name": ["Required."]}"#;
        assert_eq!(normalize_error_body(body).as_deref(), Some("Enter a valid email address."));
    }

    #[test]
    fn unknown_shapes_yield_nothing() {
        assert_eq!(normalize_error_body(""), None);
        assert_eq!(normalize_error_body("   "), None);
        assert_eq!(normalize_error_body(r#"{"count": 3}"#), None);
        assert_eq!(normalize_error_body(r#"{"fields": []}"#), None);
    }

    #[test]
    fn from_response_classifies_by_status() {
        let auth = ApiError::from_response(StatusCode::UNAUTHORIZED, r#"{"detail": "nope"}"#);
        assert!(matches!(auth, ApiError::Auth(_)));
        assert_eq!(auth.message(), "nope");

        let client = ApiError::from_response(StatusCode::NOT_FOUND, "");
        assert!(matches!(client, ApiError::Client(_)));
        assert_eq!(client.message(), GENERIC_ERROR_MESSAGE);

        let server = ApiError::from_response(StatusCode::SERVICE_UNAVAILABLE, "overloaded");
        assert!(matches!(server, ApiError::Server(_)));
        assert_eq!(server.message(), "overloaded");
    }

    #[test]
    fn transport_failures_use_fixed_messages() {
        let network: ApiError = FolioError::Network("ECONNREFUSED".into()).into();
        assert_eq!(network.message(), CONNECT_ERROR_MESSAGE);

        let timeout: ApiError = FolioError::Timeout("deadline".into()).into();
        assert_eq!(timeout.message(), TIMEOUT_ERROR_MESSAGE);
    }

    #[test]
    fn retry_classification_follows_error_class() {
        assert!(ApiError::Server("s".into()).should_retry());
        assert!(ApiError::Network("n".into()).should_retry());
        assert!(ApiError::Timeout("t".into()).should_retry());
        assert!(!ApiError::Client("c".into()).should_retry());
        assert!(!ApiError::Auth("a".into()).should_retry());
        assert!(!ApiError::Config("cfg".into()).should_retry());
    }
}

//! Authenticated API client
//!
//! Single point of outbound communication with the backend. Attaches the
//! bearer credential, recovers from an expired access token with exactly
//! one refresh-and-retry cycle, and normalizes every failure into an
//! [`ApiError`] with a displayable message.

use std::sync::Arc;

use folio_domain::RefreshResponse;
use reqwest::header::AUTHORIZATION;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use super::errors::{ApiError, SESSION_ENDED_MESSAGE};
use crate::auth::{CredentialStore, SessionEvent, SessionEvents, SessionPhase};
use crate::config::ClientConfig;
use crate::http::HttpClient;

const REFRESH_PATH: &str = "/auth/refresh/";

/// File content for a multipart upload endpoint
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self { file_name: file_name.into(), mime: mime.into(), bytes }
    }

    /// Read a file from disk into an upload, inferring nothing: the
    /// caller supplies the mime type.
    pub async fn from_path(
        path: impl AsRef<std::path::Path>,
        mime: impl Into<String>,
    ) -> Result<Self, ApiError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ApiError::Config(format!("cannot read upload {}: {e}", path.display())))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self { file_name, mime: mime.into(), bytes })
    }
}

/// Request body variants the client can dispatch
#[derive(Debug, Clone)]
enum Payload {
    Empty,
    Json(Value),
    Multipart { field: String, upload: Upload },
}

/// Outbound request descriptor.
///
/// Immutable once dispatched; the 401 recovery path rebuilds the wire
/// request from this descriptor exactly once, with the refreshed
/// credential.
#[derive(Debug, Clone)]
struct RequestSpec {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    payload: Payload,
    authenticate: bool,
}

impl RequestSpec {
    fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            query: Vec::new(),
            payload: Payload::Empty,
            authenticate: true,
        }
    }
}

/// HTTP API client with bearer authentication and one-shot
/// refresh-and-retry
pub struct ApiClient {
    http: HttpClient,
    config: ClientConfig,
    credentials: Arc<CredentialStore>,
    events: SessionEvents,
    /// Serializes refresh cycles: concurrent 401s queue here instead of
    /// issuing parallel refresh calls
    refresh_gate: Mutex<()>,
}

impl ApiClient {
    /// Create a client with a fresh credential store and event channel.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        Self::with_parts(config, Arc::new(CredentialStore::new()), SessionEvents::new())
    }

    /// Create a client around an externally owned credential store and
    /// event channel (dependency injection for tests and embedders).
    pub fn with_parts(
        config: ClientConfig,
        credentials: Arc<CredentialStore>,
        events: SessionEvents,
    ) -> Result<Self, ApiError> {
        let http = HttpClient::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config, credentials, events, refresh_gate: Mutex::new(()) })
    }

    /// The credential store backing this client
    pub fn credentials(&self) -> &Arc<CredentialStore> {
        &self.credentials
    }

    /// The session event channel this client emits on
    pub fn events(&self) -> &SessionEvents {
        &self.events
    }

    /// Execute a GET request
    #[instrument(skip(self), fields(path = %path))]
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.run(RequestSpec::new(Method::GET, path)).await
    }

    /// Execute a GET request with query parameters
    #[instrument(skip(self, query), fields(path = %path))]
    pub async fn get_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize,
    {
        let mut spec = RequestSpec::new(Method::GET, path);
        spec.query = query_pairs(query)?;
        self.run(spec).await
    }

    /// Execute a POST request with a JSON body
    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let mut spec = RequestSpec::new(Method::POST, path);
        spec.payload = Payload::Json(to_json(body)?);
        self.run(spec).await
    }

    /// Execute a POST request without a body (action sub-paths)
    #[instrument(skip(self), fields(path = %path))]
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.run(RequestSpec::new(Method::POST, path)).await
    }

    /// Execute a PATCH request with a JSON body (partial update)
    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let mut spec = RequestSpec::new(Method::PATCH, path);
        spec.payload = Payload::Json(to_json(body)?);
        self.run(spec).await
    }

    /// Execute a DELETE request
    #[instrument(skip(self), fields(path = %path))]
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.run(RequestSpec::new(Method::DELETE, path)).await
    }

    /// Execute a multipart POST uploading one file under `field`
    #[instrument(skip(self, upload), fields(path = %path, field = %field))]
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        field: &str,
        upload: Upload,
    ) -> Result<T, ApiError> {
        let mut spec = RequestSpec::new(Method::POST, path);
        spec.payload = Payload::Multipart { field: field.to_string(), upload };
        self.run(spec).await
    }

    /// Refresh the session now and install the new credential.
    ///
    /// Used on startup to resume a session from the refresh cookie
    /// before any access token exists.
    pub async fn refresh_session(&self) -> Result<(), ApiError> {
        let stale = self.credentials.get();
        self.refresh_credential(stale.as_deref()).await?;
        Ok(())
    }

    async fn run<T: DeserializeOwned>(&self, spec: RequestSpec) -> Result<T, ApiError> {
        let response = self.execute(&spec).await?;
        Self::parse(response).await
    }

    /// Dispatch a descriptor, recovering from a single 401 with one
    /// refresh and one retry.
    async fn execute(&self, spec: &RequestSpec) -> Result<Response, ApiError> {
        let token = if spec.authenticate { self.credentials.get() } else { None };

        let response = self.dispatch(spec, token.as_deref()).await?;
        if response.status() != StatusCode::UNAUTHORIZED || !spec.authenticate {
            return Ok(response);
        }

        let fresh = self.refresh_credential(token.as_deref()).await?;
        debug!(path = %spec.path, "retrying request with refreshed credential");

        let retried = self.dispatch(spec, Some(&fresh)).await?;
        if retried.status() == StatusCode::UNAUTHORIZED {
            // The retried request was rejected too; do not recurse
            warn!(path = %spec.path, "retried request rejected again");
            self.credentials.clear();
            let body = retried.text().await.unwrap_or_default();
            let message = super::errors::normalize_error_body(&body)
                .unwrap_or_else(|| SESSION_ENDED_MESSAGE.to_string());
            return Err(ApiError::Auth(message));
        }
        Ok(retried)
    }

    /// Run one refresh cycle, coalescing concurrent callers.
    ///
    /// Returns the credential to retry with. State transitions follow
    /// the NORMAL → REFRESHING → NORMAL/FAILED machine: a failure clears
    /// the slot, latches FAILED and emits the session-ended notification
    /// exactly once.
    async fn refresh_credential(&self, stale: Option<&str>) -> Result<String, ApiError> {
        let _guard = self.refresh_gate.lock().await;

        // A concurrent caller may have finished the refresh while we
        // waited on the gate
        if let Some(current) = self.credentials.get() {
            if stale != Some(current.as_str()) {
                debug!("reusing credential refreshed by a concurrent request");
                return Ok(current);
            }
        }
        if self.credentials.phase() == SessionPhase::Failed {
            return Err(ApiError::Auth(SESSION_ENDED_MESSAGE.to_string()));
        }

        self.credentials.set_phase(SessionPhase::Refreshing);
        info!("access credential rejected, refreshing session");

        // No Authorization header: the refresh relies on the httpOnly
        // cookie carried by the transport
        let spec = RequestSpec {
            method: Method::POST,
            path: REFRESH_PATH.to_string(),
            query: Vec::new(),
            payload: Payload::Empty,
            authenticate: false,
        };

        let response = match self.dispatch(&spec, None).await {
            Ok(response) => response,
            Err(err) => {
                self.end_session();
                return Err(err);
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "session refresh rejected");
            self.end_session();
            return Err(ApiError::from_response(status, &body));
        }

        let parsed: RefreshResponse = match response.json().await {
            Ok(parsed) => parsed,
            Err(err) => {
                self.end_session();
                return Err(ApiError::Server(format!("Failed to parse refresh response: {err}")));
            }
        };

        self.credentials.set(&parsed.access);
        self.events.emit(SessionEvent::Refreshed);
        info!("session refreshed");
        Ok(parsed.access)
    }

    fn end_session(&self) {
        self.credentials.invalidate();
        self.events.emit(SessionEvent::Ended);
    }

    async fn dispatch(&self, spec: &RequestSpec, token: Option<&str>) -> Result<Response, ApiError> {
        let request = self.build_request(spec, token)?;
        self.http.send(request).await.map_err(ApiError::from)
    }

    fn build_request(
        &self,
        spec: &RequestSpec,
        token: Option<&str>,
    ) -> Result<RequestBuilder, ApiError> {
        let url = format!("{}{}", self.config.base_url, spec.path);
        let mut builder = self.http.request(spec.method.clone(), &url);

        if !spec.query.is_empty() {
            builder = builder.query(&spec.query);
        }

        builder = match &spec.payload {
            Payload::Empty => builder,
            Payload::Json(value) => builder.json(value),
            Payload::Multipart { field, upload } => {
                let part = reqwest::multipart::Part::bytes(upload.bytes.clone())
                    .file_name(upload.file_name.clone())
                    .mime_str(&upload.mime)
                    .map_err(|e| ApiError::Config(format!("invalid mime type: {e}")))?;
                builder.multipart(reqwest::multipart::Form::new().part(field.clone(), part))
            }
        };

        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        Ok(builder)
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_response(status, &body));
        }

        // 204/205 carry no body by spec
        if status == StatusCode::NO_CONTENT || status == StatusCode::RESET_CONTENT {
            return serde_json::from_value(Value::Null).map_err(|_| {
                ApiError::Client(format!(
                    "No content response ({}), but response type cannot be deserialized from an empty body",
                    status.as_u16()
                ))
            });
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::Client(format!("Failed to parse response: {e}")))
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.config.base_url)
            .field("credentials", &self.credentials)
            .finish()
    }
}

fn to_json<B: Serialize>(body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body)
        .map_err(|e| ApiError::Config(format!("Failed to serialize request body: {e}")))
}

/// Flatten a serializable filter into query pairs, skipping nulls.
fn query_pairs<Q: Serialize>(query: &Q) -> Result<Vec<(String, String)>, ApiError> {
    let value = serde_json::to_value(query)
        .map_err(|e| ApiError::Config(format!("Failed to serialize query parameters: {e}")))?;

    let object = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Object(map) => map,
        _ => {
            return Err(ApiError::Config(
                "query parameters must serialize to an object".to_string(),
            ))
        }
    };

    let mut pairs = Vec::with_capacity(object.len());
    for (key, item) in object {
        let rendered = match item {
            Value::Null => continue,
            Value::String(s) => s,
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            other => other.to_string(),
        };
        pairs.push((key, rendered));
    }
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use serde::Serialize;

    use super::*;

    #[derive(Serialize)]
    struct Filter {
        featured: Option<bool>,
        category: Option<String>,
        page: Option<u32>,
    }

    #[test]
    fn query_pairs_skip_unset_fields() {
        let filter = Filter { featured: Some(true), category: None, page: Some(2) };
        let pairs = query_pairs(&filter).unwrap();

        assert!(pairs.contains(&("featured".to_string(), "true".to_string())));
        assert!(pairs.contains(&("page".to_string(), "2".to_string())));
        assert_eq!(pairs.len(), 2);
    }

    #[test]
    fn query_pairs_reject_non_object_filters() {
        assert!(query_pairs(&"just a string").is_err());
        assert!(query_pairs(&vec![1, 2, 3]).is_err());
    }

    #[test]
    fn upload_keeps_file_metadata() {
        let upload = Upload::new("cover.png", "image/png", vec![1, 2, 3]);
        assert_eq!(upload.file_name, "cover.png");
        assert_eq!(upload.mime, "image/png");
        assert_eq!(upload.bytes.len(), 3);
    }
}

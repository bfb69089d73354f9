use std::time::Duration;

use folio_domain::FolioError;
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use tracing::debug;

/// Thin wrapper around one shared reqwest client.
///
/// The transport applies the configured timeout and carries the cookie
/// store that transports the httpOnly refresh cookie; it executes each
/// request exactly once. Retrying transient failures is an opt-in
/// concern handled above this layer.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self, FolioError> {
        Self::builder().build()
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute the request, mapping transport-level failures.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, FolioError> {
        let request = builder
            .build()
            .map_err(|err| FolioError::Internal(format!("failed to build request: {err}")))?;

        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "sending HTTP request");

        match self.client.execute(request).await {
            Ok(response) => {
                debug!(%method, %url, status = %response.status(), "received HTTP response");
                Ok(response)
            }
            Err(err) => {
                debug!(%method, %url, error = %err, "HTTP request failed");
                Err(map_transport_error(&err))
            }
        }
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    user_agent: Option<String>,
    default_headers: Option<reqwest::header::HeaderMap>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: crate::config::DEFAULT_TIMEOUT,
            user_agent: None,
            default_headers: None,
        }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn default_headers(mut self, headers: reqwest::header::HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    pub fn build(self) -> Result<HttpClient, FolioError> {
        // cookie_store carries the httpOnly refresh cookie across calls
        let mut builder =
            ReqwestClient::builder().timeout(self.timeout).cookie_store(true).no_proxy();

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        if let Some(headers) = self.default_headers {
            builder = builder.default_headers(headers);
        }

        let client = builder
            .build()
            .map_err(|err| FolioError::Internal(format!("failed to build HTTP client: {err}")))?;

        Ok(HttpClient { client })
    }
}

fn map_transport_error(err: &reqwest::Error) -> FolioError {
    if err.is_timeout() {
        FolioError::Timeout(format!("request timed out: {err}"))
    } else {
        FolioError::Network(format!("http transport error: {err}"))
    }
}

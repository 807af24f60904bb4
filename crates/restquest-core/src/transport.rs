//! The network seam between the orchestrator and the companion API.
//!
//! [`Transport`] sends one request and hands back the raw status and body.
//! Interpreting them is the orchestrator's job. [`HttpTransport`] is the
//! `reqwest`-backed implementation; tests plug in their own.

use async_trait::async_trait;
use serde_json::Value;

/// Header the companion server uses to attribute progress to the UI.
pub const PROGRESS_HEADER: (&str, &str) = ("X-Requested-With", "XMLHttpRequest");

/// HTTP verbs the tutorial uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpVerb {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
}

impl HttpVerb {
    fn as_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Patch => reqwest::Method::PATCH,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

impl std::fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        };
        f.write_str(s)
    }
}

/// A request relative to the API base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP verb.
    pub verb: HttpVerb,
    /// Path below the base URL, e.g. `/books/3`.
    pub path: String,
    /// JSON body, if any.
    pub body: Option<Value>,
}

impl ApiRequest {
    /// `GET path`
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            verb: HttpVerb::Get,
            path: path.into(),
            body: None,
        }
    }

    /// `DELETE path`
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            verb: HttpVerb::Delete,
            path: path.into(),
            body: None,
        }
    }

    /// A request with a JSON body.
    #[must_use]
    pub fn with_json(verb: HttpVerb, path: impl Into<String>, body: Value) -> Self {
        Self {
            verb,
            path: path.into(),
            body: Some(body),
        }
    }
}

/// A response as received, before interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// Numeric HTTP status.
    pub status: u16,
    /// Raw body text; may be empty.
    pub body: String,
}

impl ApiResponse {
    /// Creates a response with the given status and body.
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns `true` for 2xx statuses.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}

/// No response was received.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// Building the client failed.
    #[error("failed to build HTTP client: {0}")]
    Client(String),

    /// The request could not be sent or its body could not be read.
    #[error("{verb} {url} failed: {message}")]
    Unreachable {
        /// Verb of the failed request.
        verb: HttpVerb,
        /// Full URL of the failed request.
        url: String,
        /// Underlying error text.
        message: String,
    },
}

/// Sends requests to the companion API.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends `request` and returns whatever the server answered.
    ///
    /// Non-2xx statuses are responses, not errors.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}

/// [`Transport`] over HTTP using `reqwest`.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    base_url: String,
    track_progress: bool,
    client: reqwest::Client,
}

impl HttpTransport {
    /// Creates a transport for the given base URL (e.g. `http://localhost:3000/api`).
    pub fn new(base_url: impl Into<String>) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;
        let base_url: String = base_url.into();
        tracing::debug!(base_url = %base_url, "Creating HTTP transport");
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            track_progress: true,
            client,
        })
    }

    /// Enables or disables the progress attribution header.
    #[must_use]
    pub const fn with_progress_header(mut self, enabled: bool) -> Self {
        self.track_progress = enabled;
        self
    }

    /// Returns the base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[tracing::instrument(level = "debug", skip(self, request), fields(verb = %request.verb, path = %request.path))]
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = self.url(&request.path);
        let unreachable = |e: reqwest::Error| TransportError::Unreachable {
            verb: request.verb,
            url: url.clone(),
            message: e.to_string(),
        };

        let mut req = self.client.request(request.verb.as_reqwest(), &url);
        if self.track_progress {
            req = req.header(PROGRESS_HEADER.0, PROGRESS_HEADER.1);
        }
        if let Some(body) = &request.body {
            req = req.json(body);
        }

        let resp = req.send().await.map_err(unreachable)?;
        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(unreachable)?;
        tracing::debug!(status, bytes = body.len(), "Response received");

        Ok(ApiResponse { status, body })
    }
}

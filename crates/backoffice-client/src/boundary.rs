//! # HTTP Boundary
//!
//! The raw HTTP collaborator underneath the Resource Client Facade.
//!
//! ## Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   get / post / put / delete (path, body?, { params, headers })          │
//! │                          │                                              │
//! │                          ▼                                              │
//! │   Ok(body: JSON)                    Err(BoundaryFailure)                │
//! │   (empty 2xx body = null)           ├── Network: unreachable / timeout │
//! │                                     └── Api: non-2xx, body kept        │
//! │                                                                         │
//! │   No retries and no caching. Timeouts are owned by this layer.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde_json::Value;
use tracing::debug;
use url::Url;
use uuid::Uuid;

use crate::error::{ClientError, ClientResult};

/// Result of a boundary call.
pub type BoundaryResult<T> = Result<T, BoundaryFailure>;

/// Correlation header attached to every outgoing request.
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

// =============================================================================
// Requests
// =============================================================================

/// Query parameters and extra headers of one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub params: Vec<(String, String)>,
    pub headers: BTreeMap<String, String>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Header value by case-insensitive name.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// One call through the boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub options: RequestOptions,
}

// =============================================================================
// Failures
// =============================================================================

/// Which side of the network a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The API was unreachable or the request timed out.
    Network,

    /// The API answered with a non-2xx status (or an unreadable body).
    Api,
}

/// A failed boundary call.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryFailure {
    pub kind: FailureKind,
    pub status: Option<u16>,
    pub body: Option<Value>,
    pub message: Option<String>,
}

impl BoundaryFailure {
    pub fn network(message: impl Into<String>) -> Self {
        BoundaryFailure {
            kind: FailureKind::Network,
            status: None,
            body: None,
            message: Some(message.into()),
        }
    }

    pub fn api(status: u16, body: Option<Value>) -> Self {
        BoundaryFailure {
            kind: FailureKind::Api,
            status: Some(status),
            body,
            message: Some(format!("Request failed with status code {}", status)),
        }
    }

    /// The `error` string of a structured failure body, when present and
    /// not blank.
    pub fn structured_error(&self) -> Option<&str> {
        self.body
            .as_ref()?
            .get("error")?
            .as_str()
            .filter(|message| !message.trim().is_empty())
    }
}

impl fmt::Display for BoundaryFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.message, self.status) {
            (Some(message), _) => f.write_str(message),
            (None, Some(status)) => write!(f, "HTTP {}", status),
            (None, None) => f.write_str("request failed"),
        }
    }
}

impl std::error::Error for BoundaryFailure {}

// =============================================================================
// Boundary Trait
// =============================================================================

/// Anything that can carry a request to the back-office API.
#[async_trait]
pub trait HttpBoundary: Send + Sync {
    async fn send(&self, request: BoundaryRequest) -> BoundaryResult<Value>;

    /// Sets or clears the bearer token. Boundaries without authentication
    /// ignore it.
    fn set_auth_token(&self, _token: Option<String>) {}

    async fn get(&self, path: &str, options: RequestOptions) -> BoundaryResult<Value> {
        self.send(BoundaryRequest {
            method: Method::GET,
            path: path.to_string(),
            body: None,
            options,
        })
        .await
    }

    async fn post(
        &self,
        path: &str,
        body: Option<Value>,
        options: RequestOptions,
    ) -> BoundaryResult<Value> {
        self.send(BoundaryRequest {
            method: Method::POST,
            path: path.to_string(),
            body,
            options,
        })
        .await
    }

    async fn put(
        &self,
        path: &str,
        body: Option<Value>,
        options: RequestOptions,
    ) -> BoundaryResult<Value> {
        self.send(BoundaryRequest {
            method: Method::PUT,
            path: path.to_string(),
            body,
            options,
        })
        .await
    }

    async fn delete(&self, path: &str, options: RequestOptions) -> BoundaryResult<Value> {
        self.send(BoundaryRequest {
            method: Method::DELETE,
            path: path.to_string(),
            body: None,
            options,
        })
        .await
    }
}

// =============================================================================
// Reqwest Boundary
// =============================================================================

/// [`HttpBoundary`] over `reqwest`.
#[derive(Debug)]
pub struct ReqwestBoundary {
    http: Client,
    base_url: Url,
    token: RwLock<Option<String>>,
}

impl ReqwestBoundary {
    /// Creates a boundary rooted at `base_url`. Request paths are resolved
    /// relative to it, so `"products"` under `http://host/api` becomes
    /// `http://host/api/products`.
    pub fn new(base_url: &str, timeout: Duration) -> ClientResult<Self> {
        let mut base_url = Url::parse(base_url.trim())
            .map_err(|e| ClientError::Http(format!("Invalid base URL '{}': {}", base_url, e)))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Http(e.to_string()))?;

        Ok(ReqwestBoundary {
            http,
            base_url,
            token: RwLock::new(None),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> BoundaryResult<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| BoundaryFailure::network(format!("Invalid request path '{}': {}", path, e)))
    }

    fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Converts a transport error into a user-readable network failure.
fn network_failure(url: &Url, err: &reqwest::Error) -> BoundaryFailure {
    let message = if err.is_timeout() {
        format!("Request to {} timed out", url)
    } else if err.is_connect() {
        format!("Cannot reach back office at {}", url)
    } else {
        format!("Network error communicating with {}: {}", url, err)
    };
    BoundaryFailure::network(message)
}

#[async_trait]
impl HttpBoundary for ReqwestBoundary {
    async fn send(&self, request: BoundaryRequest) -> BoundaryResult<Value> {
        let url = self.url_for(&request.path)?;
        let request_id = Uuid::new_v4().to_string();
        debug!(method = %request.method, %url, %request_id, "sending request");

        let mut builder = self
            .http
            .request(request.method.clone(), url.clone())
            .header(REQUEST_ID_HEADER, request_id.as_str());

        if !request.options.params.is_empty() {
            builder = builder.query(&request.options.params);
        }
        for (name, value) in &request.options.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(token) = self.token() {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| network_failure(&url, &e))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| network_failure(&url, &e))?;

        if !status.is_success() {
            let body = if text.trim().is_empty() {
                None
            } else {
                Some(serde_json::from_str(&text).unwrap_or(Value::String(text)))
            };
            debug!(status = status.as_u16(), %request_id, "request rejected by API");
            return Err(BoundaryFailure::api(status.as_u16(), body));
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| BoundaryFailure {
            kind: FailureKind::Api,
            status: Some(status.as_u16()),
            body: None,
            message: Some(format!("Invalid JSON from back office: {}", e)),
        })
    }

    fn set_auth_token(&self, token: Option<String>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = token;
    }
}

use std::time::Duration;

use serde::de::DeserializeOwned;
use url::Url;

use crate::error::AppError;

// ============================================================================
// Failure type
// ============================================================================

/// Raw outcome of a failed API call. Each service normalizes this into its
/// own `AppError` so callers never see transport details leak through.
#[derive(Debug, thiserror::Error)]
pub enum ApiFailure {
    /// The server answered with a non-success status. `body` holds the JSON
    /// payload when the response carried one.
    #[error("HTTP {status}")]
    Status {
        status: reqwest::StatusCode,
        body: Option<serde_json::Value>,
    },

    #[error("network error: {0}")]
    Network(String),

    #[error("malformed response body: {0}")]
    Decode(String),
}

impl ApiFailure {
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            ApiFailure::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// String `code` field of a JSON error body, if present.
    pub fn body_code(&self) -> Option<&str> {
        match self {
            ApiFailure::Status {
                body: Some(body), ..
            } => body.get("code").and_then(|c| c.as_str()),
            _ => None,
        }
    }
}

// ============================================================================
// ApiClient
// ============================================================================

/// Thin JSON-over-HTTP client shared by the remote service backends.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client rooted at `base_url`. A trailing slash is ignored.
    pub fn new(base_url: &Url, timeout: Duration) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a request to `path` (which must start with `/`).
    pub fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, path))
            .header(reqwest::header::ACCEPT, "application/json")
    }

    /// Send a request, check the status code, and deserialize the JSON body.
    /// An empty success body decodes as JSON `null`.
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<T, ApiFailure> {
        let text = self.send_raw(req).await?;
        let text = if text.trim().is_empty() { "null" } else { text.as_str() };
        serde_json::from_str(text).map_err(|e| ApiFailure::Decode(e.to_string()))
    }

    /// Send a request and only check the status code.
    pub async fn send_ok(&self, req: reqwest::RequestBuilder) -> Result<(), ApiFailure> {
        self.send_raw(req).await.map(|_| ())
    }

    async fn send_raw(&self, req: reqwest::RequestBuilder) -> Result<String, ApiFailure> {
        let resp = req
            .send()
            .await
            .map_err(|e| ApiFailure::Network(e.to_string()))?;
        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| ApiFailure::Network(e.to_string()))?;

        if !status.is_success() {
            let body = if text.trim().is_empty() {
                None
            } else {
                serde_json::from_str(&text).ok()
            };
            tracing::debug!(%status, "API request failed");
            return Err(ApiFailure::Status { status, body });
        }
        Ok(text)
    }
}

//! HTTP gateway to the Cinedex service
//!
//! A single configured client used for every authenticated call. Outgoing
//! requests carry the stored access token as a bearer credential; responses
//! with status 401 or 422 (the service's malformed/expired-token signal)
//! clear the session store and notify the host before the error reaches the
//! caller.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::session::SessionStore;

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Maximum length for error response bodies carried in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Gateway error types
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Unauthorized - session has been invalidated")]
    Unauthorized,

    #[error("Token rejected - session has been invalidated")]
    InvalidToken,

    #[error("Request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl GatewayError {
    /// Truncate a response body to avoid carrying excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let head: String = body.chars().take(MAX_ERROR_BODY_LENGTH).collect();
            format!("{}... (truncated, {} total bytes)", head, body.len())
        }
    }

    fn from_status(status: StatusCode, body: &str) -> Self {
        match status.as_u16() {
            401 => GatewayError::Unauthorized,
            422 => GatewayError::InvalidToken,
            _ => GatewayError::Status {
                status: status.as_u16(),
                body: Self::truncate_body(body),
            },
        }
    }
}

/// Callback fired when the gateway detects an invalidated session.
pub type SessionInvalidatedHook = Arc<dyn Fn() + Send + Sync>;

/// Configured HTTP client for the Cinedex service.
///
/// Clone is cheap - reqwest::Client shares its connection pool internally.
#[derive(Clone)]
pub struct Gateway {
    base_url: String,
    client: reqwest::Client,
    store: Arc<dyn SessionStore>,
    on_session_invalidated: Option<SessionInvalidatedHook>,
}

impl Gateway {
    /// Create a gateway for the given base URL and session store.
    pub fn new(base_url: impl Into<String>, store: Arc<dyn SessionStore>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .default_headers(headers)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.into(),
            client,
            store,
            on_session_invalidated: None,
        })
    }

    /// Register a callback fired when a response invalidates the session.
    ///
    /// The hosting application decides what "go back to the root" means for
    /// it; the gateway itself performs no navigation. The callback fires at
    /// most once per stored session even when several in-flight requests
    /// fail together.
    pub fn on_session_invalidated(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_session_invalidated = Some(Arc::new(hook));
        self
    }

    /// The session store this gateway reads tokens from.
    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Send a GET request and parse the JSON response.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.execute(self.client.get(&url)).await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", url))
    }

    /// Send a POST request with a JSON body and parse the JSON response.
    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.execute(self.client.post(&url).json(body)).await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", url))
    }

    /// Attach the bearer token, send, and run the response hook.
    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        // Outgoing hook: attach the stored token if present, never block if absent
        let request = match self.store.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await.map_err(GatewayError::Network)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();

        // Incoming hook: 401/422 means the token is missing, expired, or
        // malformed. Clear the session before the error reaches the caller.
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::UNPROCESSABLE_ENTITY {
            debug!(status = status.as_u16(), "Authorization failure, invalidating session");
            self.invalidate_session();
        }

        Err(GatewayError::from_status(status, &body).into())
    }

    /// Clear the stored session and notify the host, at most once.
    fn invalidate_session(&self) {
        // clear() reports whether a token was present; only the request that
        // actually removed it fires the hook.
        if self.store.clear() {
            if let Some(hook) = &self.on_session_invalidated {
                hook();
            }
        }
    }
}

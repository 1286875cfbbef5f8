//! Authentication client for the Cinedex service
//!
//! Registration and login go through the gateway; a successful login writes
//! the access token and user id to the session store as a pair. Logout only
//! clears local state - the service keeps no server-side session.

use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::api::Gateway;
use crate::session::SessionStore;

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

/// Payload of a successful login.
///
/// `access_token` and `user_id` are what the store receives; everything else
/// the server sent is kept in `extra` so callers still see the full payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub user_id: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Accept a user id sent as either a JSON string or a number.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }))
}

/// Client for the service's auth endpoints.
pub struct AuthClient {
    gateway: Gateway,
    store: Arc<dyn SessionStore>,
}

impl AuthClient {
    /// Create an auth client sharing the gateway's session store.
    pub fn new(gateway: Gateway) -> Self {
        let store = gateway.store().clone();
        Self { gateway, store }
    }

    /// Register a new account.
    ///
    /// The server payload is returned verbatim; validation errors and
    /// duplicate-email conflicts surface exactly as the gateway raised them.
    /// No local credential validation is performed.
    pub async fn register(&self, email: &str, password: &str) -> Result<Value> {
        self.gateway
            .post("/auth/register", &Credentials { email, password })
            .await
    }

    /// Log in and store the returned token and user id.
    ///
    /// The pair is written to the store only when the server sent both
    /// fields; a partial payload is returned to the caller unstored.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        let response: LoginResponse = self
            .gateway
            .post("/auth/login", &Credentials { email, password })
            .await?;

        match (&response.access_token, &response.user_id) {
            (Some(token), Some(user_id)) => {
                self.store.set_token(token);
                self.store.set_user_id(user_id);
            }
            _ => {
                warn!("Login response missing access_token or user_id, session not stored");
            }
        }

        Ok(response)
    }

    /// Clear the local session. No server call is made.
    pub fn logout(&self) {
        self.store.clear();
    }

    /// True iff a non-empty access token is stored.
    pub fn is_authenticated(&self) -> bool {
        self.store.is_authenticated()
    }

    /// The stored user id, if logged in.
    pub fn user_id(&self) -> Option<String> {
        self.store.user_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_response_user_id_as_number() {
        let response: LoginResponse =
            serde_json::from_str(r#"{"access_token": "abc", "user_id": 7}"#).unwrap();
        assert_eq!(response.access_token.as_deref(), Some("abc"));
        assert_eq!(response.user_id.as_deref(), Some("7"));
    }

    #[test]
    fn test_login_response_user_id_as_string() {
        let response: LoginResponse =
            serde_json::from_str(r#"{"access_token": "abc", "user_id": "42"}"#).unwrap();
        assert_eq!(response.user_id.as_deref(), Some("42"));
    }

    #[test]
    fn test_login_response_keeps_extra_fields() {
        let response: LoginResponse = serde_json::from_str(
            r#"{"access_token": "abc", "user_id": 7, "message": "Welcome back"}"#,
        )
        .unwrap();
        assert_eq!(response.extra["message"], "Welcome back");
    }

    #[test]
    fn test_login_response_tolerates_missing_fields() {
        let response: LoginResponse = serde_json::from_str(r#"{"message": "ok"}"#).unwrap();
        assert!(response.access_token.is_none());
        assert!(response.user_id.is_none());
    }
}

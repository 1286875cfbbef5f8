//! Auth client tests
//!
//! Tests registration passthrough, login session storage, and logout.

use std::sync::Arc;

use mockito::{Matcher, Server};

use cinedex::api::{AuthClient, Gateway, GatewayError};
use cinedex::session::{MemorySessionStore, SessionStore};

fn client_over(server: &Server) -> (AuthClient, Arc<MemorySessionStore>) {
    let store = Arc::new(MemorySessionStore::new());
    let gateway = Gateway::new(server.url(), store.clone()).unwrap();
    (AuthClient::new(gateway), store)
}

// =============================================================================
// Login Tests
// =============================================================================

#[tokio::test]
async fn test_login_stores_token_and_user_id() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/auth/login")
        .match_body(Matcher::Json(serde_json::json!({
            "email": "user@example.com",
            "password": "hunter2"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token": "abc", "user_id": "7"}"#)
        .create_async()
        .await;

    let (auth, store) = client_over(&server);
    let response = auth.login("user@example.com", "hunter2").await.unwrap();

    mock.assert_async().await;
    assert_eq!(response.access_token.as_deref(), Some("abc"));
    assert_eq!(store.token(), Some("abc".to_string()));
    assert_eq!(store.user_id(), Some("7".to_string()));
    assert!(auth.is_authenticated());
}

#[tokio::test]
async fn test_login_accepts_numeric_user_id() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("POST", "/auth/login")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token": "abc", "user_id": 7}"#)
        .create_async()
        .await;

    let (auth, store) = client_over(&server);
    auth.login("user@example.com", "hunter2").await.unwrap();

    assert_eq!(store.user_id(), Some("7".to_string()));
}

#[tokio::test]
async fn test_login_with_partial_payload_stores_nothing() {
    let mut server = Server::new_async().await;

    // Server omitted user_id; the pair is only ever written together
    let _mock = server
        .mock("POST", "/auth/login")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token": "abc"}"#)
        .create_async()
        .await;

    let (auth, store) = client_over(&server);
    let response = auth.login("user@example.com", "hunter2").await.unwrap();

    // Caller still sees the payload, but the store is untouched
    assert_eq!(response.access_token.as_deref(), Some("abc"));
    assert_eq!(store.token(), None);
    assert_eq!(store.user_id(), None);
    assert!(!auth.is_authenticated());
}

#[tokio::test]
async fn test_login_failure_propagates_and_stores_nothing() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("POST", "/auth/login")
        .with_status(401)
        .with_body(r#"{"error": "Invalid credentials"}"#)
        .create_async()
        .await;

    let (auth, store) = client_over(&server);
    let result = auth.login("user@example.com", "wrong").await;

    assert!(matches!(
        result.unwrap_err().downcast_ref::<GatewayError>(),
        Some(GatewayError::Unauthorized)
    ));
    assert_eq!(store.token(), None);
}

// =============================================================================
// Registration Tests
// =============================================================================

#[tokio::test]
async fn test_register_returns_payload_verbatim() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/auth/register")
        .match_body(Matcher::Json(serde_json::json!({
            "email": "new@example.com",
            "password": "hunter2"
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message": "User created", "user_id": 12}"#)
        .create_async()
        .await;

    let (auth, store) = client_over(&server);
    let payload = auth.register("new@example.com", "hunter2").await.unwrap();

    mock.assert_async().await;
    assert_eq!(payload["message"], "User created");
    assert_eq!(payload["user_id"], 12);

    // Registration does not log in
    assert_eq!(store.token(), None);
}

#[tokio::test]
async fn test_register_conflict_surfaces_gateway_error() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("POST", "/auth/register")
        .with_status(409)
        .with_body(r#"{"error": "Email already registered"}"#)
        .create_async()
        .await;

    let (auth, _store) = client_over(&server);
    let result = auth.register("dupe@example.com", "hunter2").await;

    match result.unwrap_err().downcast_ref::<GatewayError>() {
        Some(GatewayError::Status { status, body }) => {
            assert_eq!(*status, 409);
            assert!(body.contains("already registered"));
        }
        other => panic!("Unexpected error: {:?}", other),
    }
}

// =============================================================================
// Logout Tests
// =============================================================================

#[tokio::test]
async fn test_logout_clears_both_fields() {
    let server = Server::new_async().await;

    let (auth, store) = client_over(&server);
    store.set_token("abc");
    store.set_user_id("7");
    assert!(auth.is_authenticated());

    // No server call is made; nothing is mocked
    auth.logout();

    assert_eq!(store.token(), None);
    assert_eq!(store.user_id(), None);
    assert!(!auth.is_authenticated());
}

//! HTTP gateway tests
//!
//! Tests bearer-token injection, error propagation, and the 401/422
//! session-invalidation contract.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use mockito::{Matcher, Server};
use serde_json::Value;

use cinedex::api::{Gateway, GatewayError};
use cinedex::session::{MemorySessionStore, SessionStore};

fn store_with_session(token: &str, user_id: &str) -> Arc<MemorySessionStore> {
    let store = Arc::new(MemorySessionStore::new());
    store.set_token(token);
    store.set_user_id(user_id);
    store
}

// =============================================================================
// Token Injection Tests
// =============================================================================

#[tokio::test]
async fn test_sends_bearer_token_when_stored() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/profile")
        .match_header("Authorization", "Bearer abc123")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"email": "user@example.com"}"#)
        .create_async()
        .await;

    let store = store_with_session("abc123", "7");
    let gateway = Gateway::new(server.url(), store).unwrap();
    let payload: Value = gateway.get("/profile").await.unwrap();

    mock.assert_async().await;
    assert_eq!(payload["email"], "user@example.com");
}

#[tokio::test]
async fn test_no_authorization_header_when_anonymous() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/movies")
        .match_header("Authorization", Matcher::Missing)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create_async()
        .await;

    let store = Arc::new(MemorySessionStore::new());
    let gateway = Gateway::new(server.url(), store).unwrap();
    let payload: Value = gateway.get("/movies").await.unwrap();

    mock.assert_async().await;
    assert_eq!(payload, serde_json::json!([]));
}

// =============================================================================
// Session Invalidation Tests
// =============================================================================

#[tokio::test]
async fn test_401_clears_session_and_fires_hook() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/profile")
        .with_status(401)
        .with_body(r#"{"msg": "Token has expired"}"#)
        .create_async()
        .await;

    let store = store_with_session("expired", "7");
    let fired = Arc::new(AtomicUsize::new(0));
    let fired_clone = fired.clone();

    let gateway = Gateway::new(server.url(), store.clone())
        .unwrap()
        .on_session_invalidated(move || {
            fired_clone.fetch_add(1, Ordering::SeqCst);
        });

    let result: anyhow::Result<Value> = gateway.get("/profile").await;

    mock.assert_async().await;
    let err = result.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<GatewayError>(),
        Some(GatewayError::Unauthorized)
    ));

    // Both halves of the pair are gone and the host was told exactly once
    assert_eq!(store.token(), None);
    assert_eq!(store.user_id(), None);
    assert!(!store.is_authenticated());
    assert_eq!(fired.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_422_clears_session_and_fires_hook() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/profile")
        .with_status(422)
        .with_body(r#"{"msg": "Not enough segments"}"#)
        .create_async()
        .await;

    let store = store_with_session("malformed", "7");
    let fired = Arc::new(AtomicUsize::new(0));
    let fired_clone = fired.clone();

    let gateway = Gateway::new(server.url(), store.clone())
        .unwrap()
        .on_session_invalidated(move || {
            fired_clone.fetch_add(1, Ordering::SeqCst);
        });

    let result: anyhow::Result<Value> = gateway.get("/profile").await;

    mock.assert_async().await;
    assert!(matches!(
        result.unwrap_err().downcast_ref::<GatewayError>(),
        Some(GatewayError::InvalidToken)
    ));
    assert_eq!(store.token(), None);
    assert_eq!(fired.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_hook_fires_once_under_concurrent_failures() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/profile")
        .with_status(401)
        .with_body(r#"{"msg": "Token has expired"}"#)
        .expect(3)
        .create_async()
        .await;

    let store = store_with_session("expired", "7");
    let fired = Arc::new(AtomicUsize::new(0));
    let fired_clone = fired.clone();

    let gateway = Gateway::new(server.url(), store.clone())
        .unwrap()
        .on_session_invalidated(move || {
            fired_clone.fetch_add(1, Ordering::SeqCst);
        });

    let (a, b, c) = futures::join!(
        gateway.get::<Value>("/profile"),
        gateway.get::<Value>("/profile"),
        gateway.get::<Value>("/profile"),
    );

    mock.assert_async().await;
    assert!(a.is_err() && b.is_err() && c.is_err());

    // Only the request that actually removed the token notifies the host
    assert_eq!(fired.load(Ordering::SeqCst), 1);
    assert!(!store.is_authenticated());
}

#[tokio::test]
async fn test_hook_does_not_fire_for_anonymous_401() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/profile")
        .with_status(401)
        .with_body(r#"{"msg": "Missing Authorization Header"}"#)
        .create_async()
        .await;

    let store = Arc::new(MemorySessionStore::new());
    let fired = Arc::new(AtomicUsize::new(0));
    let fired_clone = fired.clone();

    let gateway = Gateway::new(server.url(), store)
        .unwrap()
        .on_session_invalidated(move || {
            fired_clone.fetch_add(1, Ordering::SeqCst);
        });

    let result: anyhow::Result<Value> = gateway.get("/profile").await;

    assert!(result.is_err());
    // No session existed, so there was nothing to invalidate
    assert_eq!(fired.load(Ordering::SeqCst), 0);
}

// =============================================================================
// Error Propagation Tests
// =============================================================================

#[tokio::test]
async fn test_other_errors_leave_session_alone() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/movies")
        .with_status(500)
        .with_body("Internal Server Error")
        .create_async()
        .await;

    let store = store_with_session("abc", "7");
    let gateway = Gateway::new(server.url(), store.clone()).unwrap();

    let result: anyhow::Result<Value> = gateway.get("/movies").await;

    mock.assert_async().await;
    match result.unwrap_err().downcast_ref::<GatewayError>() {
        Some(GatewayError::Status { status, body }) => {
            assert_eq!(*status, 500);
            assert_eq!(body, "Internal Server Error");
        }
        other => panic!("Unexpected error: {:?}", other),
    }

    // A server error is not an authorization failure
    assert_eq!(store.token(), Some("abc".to_string()));
    assert!(store.is_authenticated());
}

#[tokio::test]
async fn test_post_sends_json_body() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/auth/login")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(serde_json::json!({
            "email": "user@example.com",
            "password": "hunter2"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token": "abc", "user_id": 7}"#)
        .create_async()
        .await;

    let store = Arc::new(MemorySessionStore::new());
    let gateway = Gateway::new(server.url(), store).unwrap();

    let body = serde_json::json!({
        "email": "user@example.com",
        "password": "hunter2"
    });
    let payload: Value = gateway.post("/auth/login", &body).await.unwrap();

    mock.assert_async().await;
    assert_eq!(payload["access_token"], "abc");
}

//! Integration tests for the session lifecycle

mod common;

use serde_json::json;

use ::common::api::ErrorKind;
use ::common::session::{SessionManager, SessionState};

#[tokio::test]
async fn test_bootstrap_authenticated() {
    let backend = common::MockBackend::start().await;
    backend.respond_json(
        "GET /api/status",
        200,
        json!({
            "online": true,
            "username": "alice",
            "user_id": 12,
            "port": 8001,
            "shared_folder": "/home/alice/shared",
            "local_ip": "192.168.1.20",
        }),
    );

    let mut session = SessionManager::new(backend.client());
    assert_eq!(session.bootstrap().await, SessionState::Authenticated);

    let profile = session.profile().unwrap();
    assert_eq!(profile.username.as_deref(), Some("alice"));
    assert_eq!(profile.user_id, Some(12));
    assert_eq!(profile.peer_port.as_deref(), Some("8001"));
    assert!(session.session().unwrap().authenticated);
}

#[tokio::test]
async fn test_bootstrap_online_but_not_signed_in() {
    let backend = common::MockBackend::start().await;
    backend.respond_json(
        "GET /api/status",
        200,
        json!({ "online": true, "authenticated": false }),
    );

    let mut session = SessionManager::new(backend.client());
    assert_eq!(session.bootstrap().await, SessionState::Unauthenticated);
    assert!(session.profile().is_none());
}

#[tokio::test]
async fn test_bootstrap_offline() {
    let backend = common::MockBackend::start().await;
    backend.respond_json("GET /api/status", 200, json!({ "online": false, "status": "Offline" }));

    let mut session = SessionManager::new(backend.client());
    assert_eq!(session.bootstrap().await, SessionState::Unauthenticated);
}

#[tokio::test]
async fn test_bootstrap_unreachable_requires_login() {
    let mut session = SessionManager::new(common::unreachable_client());

    assert_eq!(session.bootstrap().await, SessionState::Unauthenticated);
    assert_eq!(session.session().map(|s| s.authenticated), Some(false));
}

#[tokio::test]
async fn test_bootstrap_server_error_requires_login() {
    let backend = common::MockBackend::start().await;
    backend.respond("GET /api/status", 500, "Internal Server Error");

    let mut session = SessionManager::new(backend.client());
    assert_eq!(session.bootstrap().await, SessionState::Unauthenticated);
}

#[tokio::test]
async fn test_login_status_success() {
    let backend = common::MockBackend::start().await;
    backend.respond_json(
        "POST /api/auth/login",
        200,
        json!({ "status": "success", "user": { "username": "alice" } }),
    );

    let mut session = SessionManager::new(backend.client());
    session.login("alice", "correct horse").await.unwrap();

    assert_eq!(session.state(), SessionState::Authenticated);
    assert_eq!(
        backend.last_json("POST /api/auth/login"),
        Some(json!({ "username": "alice", "password": "correct horse" }))
    );
}

#[tokio::test]
async fn test_login_ok_flag_success() {
    let backend = common::MockBackend::start().await;
    backend.respond_json("POST /api/auth/login", 200, json!({ "ok": true }));

    let mut session = SessionManager::new(backend.client());
    session.login("alice", "correct horse").await.unwrap();

    assert!(session.is_authenticated());
}

#[tokio::test]
async fn test_login_soft_failure_surfaces_message() {
    let backend = common::MockBackend::start().await;
    backend.respond_json(
        "POST /api/auth/login",
        200,
        json!({ "message": "Already logged in", "user": { "username": "bob" } }),
    );

    let mut session = SessionManager::new(backend.client());
    let err = session.login("alice", "correct horse").await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::Generic);
    assert_eq!(err.message, "Already logged in");
    assert_eq!(session.state(), SessionState::Unauthenticated);
}

#[tokio::test]
async fn test_login_soft_failure_without_message() {
    let backend = common::MockBackend::start().await;
    backend.respond_json("POST /api/auth/login", 200, json!({ "status": "error" }));

    let mut session = SessionManager::new(backend.client());
    let err = session.login("alice", "correct horse").await.unwrap_err();

    assert_eq!(err.message, "Login failed");
}

#[tokio::test]
async fn test_login_rejected_by_backend() {
    let backend = common::MockBackend::start().await;
    backend.respond_json(
        "POST /api/auth/login",
        401,
        json!({ "detail": "Invalid username or password" }),
    );

    let mut session = SessionManager::new(backend.client());
    let err = session.login("alice", "wrong password").await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::Generic);
    assert_eq!(err.message, "Invalid username or password");
    assert_eq!(session.state(), SessionState::Unauthenticated);
}

#[tokio::test]
async fn test_login_unreachable() {
    let mut session = SessionManager::new(common::unreachable_client());

    let err = session.login("alice", "correct horse").await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::Network);
    assert_eq!(session.state(), SessionState::Unauthenticated);
}

#[tokio::test]
async fn test_signup_short_username_never_sent() {
    let backend = common::MockBackend::start().await;

    let mut session = SessionManager::new(backend.client());
    let err = session
        .signup("ab", "longenough1", "a@b.com")
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Validation);
    assert!(err.message.contains("at least 3 characters"));
    assert_eq!(backend.total_hits(), 0);
    assert_eq!(session.state(), SessionState::Unknown);
}

#[tokio::test]
async fn test_signup_short_password_never_sent() {
    let backend = common::MockBackend::start().await;

    let mut session = SessionManager::new(backend.client());
    let err = session.signup("abcd", "short1", "a@b.com").await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::Validation);
    assert!(err.message.contains("at least 8 characters"));
    assert_eq!(backend.total_hits(), 0);
}

#[tokio::test]
async fn test_signup_success() {
    let backend = common::MockBackend::start().await;
    backend.respond_json(
        "POST /api/signup",
        200,
        json!({ "user": { "user_id": 3, "username": "carol" } }),
    );

    let mut session = SessionManager::new(backend.client());
    session
        .signup("carol", "longenough1", "carol@example.com")
        .await
        .unwrap();

    assert!(session.is_authenticated());
    assert_eq!(
        backend.last_json("POST /api/signup"),
        Some(json!({
            "username": "carol",
            "password": "longenough1",
            "email": "carol@example.com",
        }))
    );
}

#[tokio::test]
async fn test_signup_backend_validation() {
    let backend = common::MockBackend::start().await;
    backend.respond_json(
        "POST /api/signup",
        422,
        json!({ "detail": { "detail": [
            { "loc": ["body", "username"], "msg": "Username must be alphanumeric or contain underscores" }
        ] } }),
    );

    let mut session = SessionManager::new(backend.client());
    let err = session
        .signup("c a r o l", "longenough1", "carol@example.com")
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(err.field_errors[0].field, "body.username");
    assert_eq!(session.state(), SessionState::Unauthenticated);
}

#[tokio::test]
async fn test_signup_duplicate_user() {
    let backend = common::MockBackend::start().await;
    backend.respond_json(
        "POST /api/signup",
        400,
        json!({ "detail": "Username or email already exists" }),
    );

    let mut session = SessionManager::new(backend.client());
    let err = session
        .signup("carol", "longenough1", "carol@example.com")
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Generic);
    assert_eq!(err.message, "Username or email already exists");
}

#[tokio::test]
async fn test_logout_ends_session_even_when_backend_fails() {
    let backend = common::MockBackend::start().await;
    backend.respond_json("GET /api/status", 200, json!({ "online": true }));
    backend.respond("POST /api/auth/logout", 500, "");

    let mut session = SessionManager::new(backend.client());
    session.bootstrap().await;
    assert!(session.is_authenticated());

    session.logout().await;

    assert_eq!(session.state(), SessionState::Unauthenticated);
    assert!(session.profile().is_none());
    assert_eq!(backend.hits("POST /api/auth/logout"), 1);
}

#[tokio::test]
async fn test_logout_unreachable_backend() {
    let mut session = SessionManager::new(common::unreachable_client());

    session.logout().await;

    assert_eq!(session.state(), SessionState::Unauthenticated);
}

#[tokio::test]
async fn test_teardown_notifies_backend() {
    let backend = common::MockBackend::start().await;
    backend.respond_json(
        "POST /api/auth/logout",
        200,
        json!({ "status": "success", "message": "Logged out and server stopped" }),
    );

    let session = SessionManager::new(backend.client());
    session.teardown().await;

    assert_eq!(backend.hits("POST /api/auth/logout"), 1);
}

const SESSION_COOKIE: (&str, &str) = ("set-cookie", "session=abc123; Path=/; HttpOnly");

fn login_sets_cookie(backend: &common::MockBackend) {
    backend.respond_with_headers(
        "POST /api/auth/login",
        200,
        &[SESSION_COOKIE],
        json!({ "status": "success" }).to_string(),
    );
    backend.respond_json("GET /api/status", 200, json!({ "online": true }));
}

#[tokio::test]
async fn test_session_cookie_sent_on_later_requests() {
    let backend = common::MockBackend::start().await;
    login_sets_cookie(&backend);

    let mut session = SessionManager::new(backend.client());
    session.login("alice", "hunter22").await.unwrap();
    assert!(backend
        .last_request("POST /api/auth/login")
        .unwrap()
        .headers
        .get("cookie")
        .is_none());

    session.bootstrap().await;

    let recorded = backend.last_request("GET /api/status").unwrap();
    assert_eq!(recorded.headers["cookie"], "session=abc123");
}

#[tokio::test]
async fn test_cloned_client_shares_session_cookie() {
    let backend = common::MockBackend::start().await;
    login_sets_cookie(&backend);

    let client = backend.client();
    let mut session = SessionManager::new(client.clone());
    session.login("alice", "hunter22").await.unwrap();

    let mut other = SessionManager::new(client);
    assert_eq!(other.bootstrap().await, SessionState::Authenticated);

    let recorded = backend.last_request("GET /api/status").unwrap();
    assert_eq!(recorded.headers["cookie"], "session=abc123");
}

use axum::http::{Method, StatusCode};
use eventhub_common::TOKEN_TTL_SECS;
use serde_json::json;

use crate::test_utils::{send, setup_test_app, signup};

#[tokio::test]
async fn test_signup_then_login_issue_distinct_valid_tokens() {
    let (app, state, _dir) = setup_test_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/signup",
        None,
        Some(json!({ "email": "ada@example.com", "password": "hunter22" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User created.");
    assert_eq!(body["user"]["email"], "ada@example.com");
    assert!(body["user"]["id"].as_str().is_some_and(|id| !id.is_empty()));
    assert!(body["user"].get("password").is_none());
    let signup_token = body["token"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::POST,
        "/login",
        None,
        Some(json!({ "email": "ada@example.com", "password": "hunter22" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let login_token = body["token"].as_str().unwrap().to_string();

    assert_ne!(signup_token, login_token);
    for token in [&signup_token, &login_token] {
        let claims = state.tokens.verify(token).unwrap();
        assert_eq!(claims.subject(), "ada@example.com");
        // Lifetime is the constant the client uses for its own expiry
        assert_eq!(
            (claims.expires_at() - claims.issued_at()).num_seconds(),
            TOKEN_TTL_SECS
        );
    }
}

#[tokio::test]
async fn test_signup_duplicate_email_rejected() {
    let (app, _state, _dir) = setup_test_app();
    signup(&app, "dup@example.com", "secret1").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/signup",
        None,
        Some(json!({ "email": "dup@example.com", "password": "another1" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "User signup failed due to validation errors.");
    assert_eq!(body["errors"]["email"], "Email exists already.");
}

#[tokio::test]
async fn test_signup_field_errors_are_collected() {
    let (app, _state, _dir) = setup_test_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/signup",
        None,
        Some(json!({ "email": "no-at-sign", "password": "123" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"]["email"], "Invalid email.");
    assert_eq!(
        body["errors"]["password"],
        "Invalid password. Must be at least 6 characters long."
    );
}

#[tokio::test]
async fn test_login_unknown_email_is_unauthorized() {
    let (app, _state, _dir) = setup_test_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/login",
        None,
        Some(json!({ "email": "ghost@example.com", "password": "whatever" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Authentication failed.");
}

#[tokio::test]
async fn test_login_wrong_password_is_unprocessable() {
    let (app, _state, _dir) = setup_test_app();
    signup(&app, "bob@example.com", "correct-horse").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/login",
        None,
        Some(json!({ "email": "bob@example.com", "password": "wrong-horse" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "Invalid credentials.");
    assert_eq!(
        body["errors"]["credentials"],
        "Invalid email or password entered."
    );
    assert!(body.get("token").is_none());
}

#[tokio::test]
async fn test_stored_password_is_hashed() {
    let (app, state, _dir) = setup_test_app();
    signup(&app, "carol@example.com", "plaintext!").await;

    let raw = std::fs::read_to_string(&state.settings.data_file).unwrap();
    assert!(!raw.contains("plaintext!"));

    let user = state
        .storage
        .find_user_by_email("carol@example.com")
        .await
        .unwrap()
        .unwrap();
    assert!(user.password_hash.starts_with("$scrypt$"));
}

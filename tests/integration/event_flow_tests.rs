use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use backend_lib::auth::TokenService;
use serde_json::json;
use tower::ServiceExt;

use crate::test_utils::{event_body, send, setup_test_app, signup, TEST_SECRET};

/// A correctly signed token whose lifetime ended before it was used
fn expired_token(secret: &str) -> String {
    TokenService::new(secret, -1).issue("late@example.com").unwrap()
}

#[tokio::test]
async fn test_reads_are_public() {
    let (app, _state, _dir) = setup_test_app();

    let (status, body) = send(&app, Method::GET, "/events", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Could not find any events.");

    let token = signup(&app, "reader@example.com", "secret1").await;
    send(&app, Method::POST, "/events", Some(&token), Some(event_body("Picnic"))).await;

    let (status, body) = send(&app, Method::GET, "/events", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["events"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_mutations_require_a_token() {
    let (app, state, _dir) = setup_test_app();

    let (status, body) = send(&app, Method::POST, "/events", None, Some(event_body("Nope"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Not authenticated.");

    let (status, _) = send(&app, Method::PATCH, "/events/x", None, Some(event_body("Nope"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, Method::DELETE, "/events/x", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Rejected requests must not have reached storage
    assert!(!state.settings.data_file.exists());
}

#[tokio::test]
async fn test_bad_tokens_are_rejected() {
    let (app, _state, _dir) = setup_test_app();

    for token in [
        "garbage".to_string(),
        expired_token(TEST_SECRET),
        TokenService::new("some-other-secret", 3600)
            .issue("mallory@example.com")
            .unwrap(),
    ] {
        let (status, _) =
            send(&app, Method::POST, "/events", Some(&token), Some(event_body("X"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "token {token} was admitted");
    }

    // Scheme word and a missing token part
    for header_value in ["Token abc", "Bearer", "Bearer a b"] {
        let request = Request::builder()
            .method(Method::DELETE)
            .uri("/events/x")
            .header(header::AUTHORIZATION, header_value)
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "header {header_value:?} was admitted"
        );
    }
}

#[tokio::test]
async fn test_event_lifecycle() {
    let (app, _state, _dir) = setup_test_app();
    let token = signup(&app, "owner@example.com", "secret1").await;

    let (status, body) =
        send(&app, Method::POST, "/events", Some(&token), Some(event_body("Picnic"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Event saved.");
    let id = body["event"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["event"]["title"], "Picnic");

    let (status, body) = send(&app, Method::GET, &format!("/events/{id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["event"]["id"], id.as_str());

    let update = event_body("Picnic (moved indoors)");
    let (status, first) = send(
        &app,
        Method::PATCH,
        &format!("/events/{id}"),
        Some(&token),
        Some(update.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["message"], "Event updated.");
    assert_eq!(first["event"]["id"], id.as_str());

    let (status, second) =
        send(&app, Method::PATCH, &format!("/events/{id}"), Some(&token), Some(update)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["event"], second["event"]);

    let (status, body) =
        send(&app, Method::DELETE, &format!("/events/{id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Event deleted.");

    let (status, _) =
        send(&app, Method::DELETE, &format!("/events/{id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::GET, &format!("/events/{id}"), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_ids_are_not_found() {
    let (app, _state, _dir) = setup_test_app();
    let token = signup(&app, "owner@example.com", "secret1").await;
    send(&app, Method::POST, "/events", Some(&token), Some(event_body("Real"))).await;

    let (status, body) = send(&app, Method::GET, "/events/bogus", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Could not find event for id bogus");

    let (status, _) = send(
        &app,
        Method::PATCH,
        "/events/bogus",
        Some(&token),
        Some(event_body("Ghost")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, "/events/bogus", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_event_body_reports_every_field() {
    let (app, _state, _dir) = setup_test_app();
    let token = signup(&app, "owner@example.com", "secret1").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/events",
        Some(&token),
        Some(json!({ "title": "  ", "date": "whenever", "image": "not-a-url" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "Adding the event failed due to validation errors.");
    let errors = body["errors"].as_object().unwrap();
    for field in ["title", "description", "date", "image"] {
        assert!(errors.contains_key(field), "missing error for {field}");
    }
}

#[tokio::test]
async fn test_cors_preflight_skips_the_gate() {
    let (app, _state, _dir) = setup_test_app();

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/events")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization,content-type")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
}

#[tokio::test]
async fn test_unsupported_method_on_gated_path() {
    let (app, _state, _dir) = setup_test_app();

    let (status, _) = send(&app, Method::PUT, "/events", None, Some(event_body("X"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = signup(&app, "owner@example.com", "secret1").await;
    let (status, _) =
        send(&app, Method::PUT, "/events", Some(&token), Some(event_body("X"))).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

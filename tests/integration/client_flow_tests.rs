use std::sync::Arc;

use eventhub_client::{
    ApiClient, AuthMode, AuthOutcome, AutoLogout, ClientError, FileStore, MemoryStore,
    SessionTracker, TokenState,
};
use eventhub_common::{Credentials, EventInput};

use crate::test_utils::spawn_server;

fn credentials(email: &str, password: &str) -> Credentials {
    Credentials {
        email: email.to_string(),
        password: password.to_string(),
    }
}

fn picnic() -> EventInput {
    EventInput {
        title: "Picnic".to_string(),
        description: "Bring a blanket".to_string(),
        date: "2025-08-02".to_string(),
        image: "https://example.com/pictures/picnic.png".to_string(),
    }
}

#[tokio::test]
async fn test_client_session_lifecycle_against_live_server() {
    let (base_url, _server_dir) = spawn_server().await;
    let client = ApiClient::new(base_url).unwrap();
    let tracker = Arc::new(SessionTracker::new(Arc::new(MemoryStore::new())));

    // Logged out: mutation fails locally
    let err = client.create_event(&tracker.context(), &picnic()).await.unwrap_err();
    assert!(matches!(err, ClientError::NotLoggedIn));

    // Mode as it arrives from an `?mode=signup` form link
    let mode = AuthMode::from_query(Some("signup")).unwrap();
    let outcome = client
        .authenticate(mode, &credentials("dana@example.com", "secret1"), &tracker)
        .await
        .unwrap();
    let (token, expires_at) = match outcome {
        AuthOutcome::Authenticated { token, expires_at } => (token, expires_at),
        other => panic!("signup rejected: {other:?}"),
    };
    assert_eq!(tracker.get_token(), TokenState::Valid(token));
    assert_eq!(tracker.expiration(), Some(expires_at));
    assert!(tracker.get_duration() > 0);

    let mut timer = AutoLogout::new();
    assert!(timer.arm(tracker.clone(), || {}));

    let session = tracker.context();
    let created = client.create_event(&session, &picnic()).await.unwrap();
    assert_eq!(created.title, "Picnic");

    let listed = client.list_events().await.unwrap();
    assert_eq!(listed, vec![created.clone()]);
    assert_eq!(client.get_event(&created.id).await.unwrap(), created);

    let mut changed = picnic();
    changed.title = "Indoor picnic".to_string();
    let updated = client.update_event(&session, &created.id, &changed).await.unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.title, "Indoor picnic");

    let message = client.delete_event(&session, &created.id).await.unwrap();
    assert_eq!(message, "Event deleted.");
    let err = client.get_event(&created.id).await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound(_)));

    timer.logout(&tracker).unwrap();
    assert_eq!(tracker.get_token(), TokenState::Absent);
    assert!(!timer.is_armed());
}

#[tokio::test]
async fn test_rejected_login_keeps_existing_session() {
    let (base_url, _server_dir) = spawn_server().await;
    let client = ApiClient::new(base_url).unwrap();
    let tracker = SessionTracker::new(Arc::new(MemoryStore::new()));

    client
        .authenticate(AuthMode::Signup, &credentials("erin@example.com", "secret1"), &tracker)
        .await
        .unwrap();
    let before = tracker.get_token();

    let outcome = client
        .authenticate(AuthMode::Login, &credentials("erin@example.com", "wrong-one"), &tracker)
        .await
        .unwrap();
    match outcome {
        AuthOutcome::Rejected { status, body } => {
            assert_eq!(status, 422);
            assert_eq!(body.message, "Invalid credentials.");
        },
        other => panic!("expected rejection, got {other:?}"),
    }

    let outcome = client
        .authenticate(AuthMode::Login, &credentials("nobody@example.com", "secret1"), &tracker)
        .await
        .unwrap();
    assert!(matches!(outcome, AuthOutcome::Rejected { status: 401, .. }));

    assert_eq!(tracker.get_token(), before);
}

#[tokio::test]
async fn test_validation_errors_surface_field_messages() {
    let (base_url, _server_dir) = spawn_server().await;
    let client = ApiClient::new(base_url).unwrap();
    let tracker = SessionTracker::new(Arc::new(MemoryStore::new()));
    client
        .authenticate(AuthMode::Signup, &credentials("fay@example.com", "secret1"), &tracker)
        .await
        .unwrap();

    let mut bad = picnic();
    bad.image = "ftp://example.com/x.png".to_string();
    let err = client.create_event(&tracker.context(), &bad).await.unwrap_err();
    match err {
        ClientError::Validation { errors, .. } => {
            assert_eq!(errors.keys().collect::<Vec<_>>(), vec!["image"]);
        },
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_session_survives_client_restart() {
    let (base_url, _server_dir) = spawn_server().await;
    let client = ApiClient::new(base_url).unwrap();
    let session_dir = tempfile::TempDir::new().unwrap();
    let path = session_dir.path().join("session.json");

    {
        let tracker = SessionTracker::new(Arc::new(FileStore::open(&path).unwrap()));
        client
            .authenticate(AuthMode::Signup, &credentials("gus@example.com", "secret1"), &tracker)
            .await
            .unwrap();
    }

    let tracker = SessionTracker::new(Arc::new(FileStore::open(&path).unwrap()));
    assert!(tracker.get_token().is_valid());
    client.create_event(&tracker.context(), &picnic()).await.unwrap();
}

//! Integration tests for HTTP notification delivery.
//!
//! These tests verify the notifier's request shape and its handling of
//! endpoint failures against a mock HTTP server.

use turnchime::notifier::{HttpNotifier, NotificationSink, NotifierError};
use turnchime::settings::Settings;
use turnchime::types::Outcome;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Notifier pointed at the mock server's /notify endpoint.
fn notifier_for(server: &MockServer) -> HttpNotifier {
    HttpNotifier::new(Some(format!("{}/notify", server.uri())))
}

#[tokio::test]
async fn delivers_outcome_and_settings_as_json() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/notify"))
        .and(body_partial_json(serde_json::json!({
            "outcome": "success",
            "settings": {
                "audioEnabled": true,
                "successSound": "sounds/success1.mp3",
            },
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let result = notifier_for(&server)
        .notify(Outcome::Success, &Settings::default())
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn error_outcome_serializes_as_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/notify"))
        .and(body_partial_json(serde_json::json!({ "outcome": "error" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let result = notifier_for(&server)
        .notify(Outcome::Error, &Settings::default())
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn server_failure_is_reported_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/notify"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let result = notifier_for(&server)
        .notify(Outcome::Success, &Settings::default())
        .await;

    match result {
        Err(NotifierError::Server { status }) => assert_eq!(status, 500),
        other => panic!("expected server error, got {other:?}"),
    }

    // The .expect(1) on the mock asserts exactly one request was made when
    // the server verifies on drop.
}

#[tokio::test]
async fn unreachable_endpoint_is_an_http_error() {
    // Port 9 (discard) is not listening.
    let notifier = HttpNotifier::new(Some("http://127.0.0.1:9/notify".to_string()));

    let result = notifier.notify(Outcome::Error, &Settings::default()).await;
    assert!(matches!(result, Err(NotifierError::Http(_))));
}

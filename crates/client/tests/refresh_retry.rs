//! Authentication behavior of the API client: bearer attachment and the
//! one-shot refresh-and-retry cycle on 401.

use std::sync::Arc;
use std::time::Duration;

use folio_client::{ApiClient, ApiError, ClientConfig, SessionEvent, SessionPhase};
use serde_json::{json, Value};
use tokio::sync::broadcast::error::TryRecvError;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ApiClient {
    let config = ClientConfig::new(server.uri()).with_timeout(Duration::from_secs(5));
    ApiClient::new(config).expect("api client")
}

#[tokio::test]
async fn authenticated_requests_carry_the_bearer_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/projects/"))
        .and(header("Authorization", "Bearer live-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.credentials().set("live-token");

    let result: Result<Value, ApiError> = client.get("/projects/").await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn requests_without_credential_omit_the_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/profile/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let _: Value = client.get("/profile/").await.expect("response");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("Authorization"));
}

#[tokio::test]
async fn single_401_refreshes_once_and_retries_transparently() {
    let server = MockServer::start().await;

    // First call with the stale token is rejected
    Mock::given(method("GET"))
        .and(path("/data/"))
        .and(header("Authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    // Exactly one refresh call, no Authorization header on it
    Mock::given(method("POST"))
        .and(path("/auth/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "fresh"})))
        .expect(1)
        .mount(&server)
        .await;

    // Retried call with the fresh token succeeds
    Mock::given(method("GET"))
        .and(path("/data/"))
        .and(header("Authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": 42})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.credentials().set("stale");
    let mut events = client.events().subscribe();

    let result: Value = client.get("/data/").await.expect("transparent success");
    assert_eq!(result["value"], 42);

    // The caller sees success; the credential was silently replaced
    assert_eq!(client.credentials().get(), Some("fresh".to_string()));
    assert_eq!(events.try_recv().unwrap(), SessionEvent::Refreshed);
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));

    // The refresh call itself must not carry a bearer header
    let requests = server.received_requests().await.unwrap();
    let refresh = requests.iter().find(|r| r.url.path() == "/auth/refresh/").unwrap();
    assert!(!refresh.headers.contains_key("Authorization"));
}

#[tokio::test]
async fn second_401_on_the_retried_call_is_terminal() {
    let server = MockServer::start().await;

    // Both the original and the retried call are rejected
    Mock::given(method("GET"))
        .and(path("/data/"))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&server)
        .await;

    // Only one refresh is ever attempted
    Mock::given(method("POST"))
        .and(path("/auth/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "fresh"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.credentials().set("stale");

    let result: Result<Value, ApiError> = client.get("/data/").await;
    assert!(matches!(result, Err(ApiError::Auth(_))));
    assert_eq!(client.credentials().get(), None);
}

#[tokio::test]
async fn failed_refresh_clears_credential_and_ends_session_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh/"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "Token is blacklisted"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.credentials().set("stale");
    let mut events = client.events().subscribe();

    let result: Result<Value, ApiError> = client.get("/data/").await;
    match result {
        Err(ApiError::Auth(message)) => assert_eq!(message, "Token is blacklisted"),
        other => panic!("expected auth error, got {other:?}"),
    }

    // Slot emptied, failed phase latched, exactly one Ended notification
    assert_eq!(client.credentials().get(), None);
    assert_eq!(client.credentials().phase(), SessionPhase::Failed);
    assert_eq!(events.try_recv().unwrap(), SessionEvent::Ended);
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));

    // Further authenticated calls fail fast without another refresh
    let again: Result<Value, ApiError> = client.get("/data/").await;
    assert!(matches!(again, Err(ApiError::Auth(_))));

    // Installing a fresh credential (new login) returns to normal
    client.credentials().set("fresh");
    assert_eq!(client.credentials().phase(), SessionPhase::Normal);
}

#[tokio::test]
async fn concurrent_401s_share_a_single_refresh() {
    let server = MockServer::start().await;

    for route in ["/a/", "/b/"] {
        Mock::given(method("GET"))
            .and(path(route))
            .and(header("Authorization", "Bearer stale"))
            .respond_with(ResponseTemplate::new(401))
            .up_to_n_times(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path(route))
            .and(header("Authorization", "Bearer fresh"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"route": route})))
            .expect(1)
            .mount(&server)
            .await;
    }

    // The delayed response keeps the refresh in flight while the second
    // 401 arrives, so the second caller must queue, not re-refresh
    Mock::given(method("POST"))
        .and(path("/auth/refresh/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access": "fresh"}))
                .set_delay(Duration::from_millis(150)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = Arc::new(client_for(&server));
    client.credentials().set("stale");

    let first = {
        let client = Arc::clone(&client);
        tokio::spawn(async move { client.get::<Value>("/a/").await })
    };
    let second = {
        let client = Arc::clone(&client);
        tokio::spawn(async move { client.get::<Value>("/b/").await })
    };

    let (first, second) = (first.await.unwrap(), second.await.unwrap());
    assert!(first.is_ok(), "first caller failed: {first:?}");
    assert!(second.is_ok(), "second caller failed: {second:?}");
    assert_eq!(client.credentials().get(), Some("fresh".to_string()));
}

#[tokio::test]
async fn unauthenticated_401_does_not_trigger_refresh() {
    let server = MockServer::start().await;

    // A 401 on the refresh endpoint itself must never recurse; here the
    // session has no credential and the refresh cookie is invalid
    Mock::given(method("POST"))
        .and(path("/auth/refresh/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "No cookie"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = client.refresh_session().await;

    assert!(matches!(result, Err(ApiError::Auth(_))));
    assert_eq!(client.credentials().get(), None);
}

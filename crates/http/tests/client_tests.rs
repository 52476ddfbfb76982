//! Integration tests for the console client pipeline

use async_trait::async_trait;
use portico_core::routes;
use portico_core::{Navigator, Notifier, SessionSink, TokenSource};
use portico_http::{ClientError, ConsoleClient, FailureKind};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct StaticTokens(Option<String>);

impl TokenSource for StaticTokens {
    fn token(&self) -> Option<String> {
        self.0.clone()
    }
}

#[derive(Default)]
struct RecordingNotifier(Mutex<Vec<String>>);

impl RecordingNotifier {
    fn messages(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str) {
        self.0.lock().unwrap().push(message.to_string());
    }
}

#[derive(Default)]
struct RecordingNavigator(Mutex<Vec<String>>);

impl RecordingNavigator {
    fn pushes(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn push(&self, path: &str) {
        self.0.lock().unwrap().push(path.to_string());
    }
}

#[derive(Default)]
struct RecordingSink(AtomicUsize);

impl RecordingSink {
    fn clears(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionSink for RecordingSink {
    async fn clear_session(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

struct Harness {
    client: ConsoleClient,
    notifier: Arc<RecordingNotifier>,
    navigator: Arc<RecordingNavigator>,
    sink: Arc<RecordingSink>,
}

fn harness(base_url: &str, token: Option<&str>) -> Harness {
    let notifier = Arc::new(RecordingNotifier::default());
    let navigator = Arc::new(RecordingNavigator::default());
    let sink = Arc::new(RecordingSink::default());
    let client = ConsoleClient::builder()
        .base_url(base_url)
        .token_source(Arc::new(StaticTokens(token.map(String::from))))
        .notifier(notifier.clone())
        .navigator(navigator.clone())
        .session_sink(sink.clone())
        .build()
        .unwrap();
    Harness {
        client,
        notifier,
        navigator,
        sink,
    }
}

#[tokio::test]
async fn builder_requires_base_url() {
    let result = ConsoleClient::builder()
        .token_source(Arc::new(StaticTokens(None)))
        .notifier(Arc::new(RecordingNotifier::default()))
        .navigator(Arc::new(RecordingNavigator::default()))
        .session_sink(Arc::new(RecordingSink::default()))
        .build();
    assert!(matches!(result, Err(ClientError::Configuration(_))));
}

#[tokio::test]
async fn builder_requires_every_port() {
    let result = ConsoleClient::builder().base_url("http://localhost").build();
    assert!(matches!(result, Err(ClientError::Configuration(_))));
}

#[tokio::test]
async fn builder_trims_trailing_slash() {
    let h = harness("http://localhost:8080/", None);
    assert_eq!(h.client.base_url(), "http://localhost:8080");
}

#[tokio::test]
async fn success_envelope_yields_payload() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/employee/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "msg": "success",
            "data": {"id": 1, "name": "alice"}
        })))
        .mount(&mock_server)
        .await;

    let h = harness(&mock_server.uri(), Some("tok-123"));
    let payload: serde_json::Value = h.client.get("/employee/1").await.unwrap();
    assert_eq!(payload["name"], "alice");
    assert!(h.notifier.messages().is_empty());
    assert_eq!(h.sink.clears(), 0);
}

#[tokio::test]
async fn token_is_sent_verbatim_without_scheme_prefix() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/whoami"))
        .and(header("authorization", "tok-123"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"code": 200, "data": null})),
        )
        .mount(&mock_server)
        .await;

    let h = harness(&mock_server.uri(), Some("tok-123"));
    let result: serde_json::Value = h.client.get("/whoami").await.unwrap();
    assert!(result.is_null());
}

#[tokio::test]
async fn no_token_means_no_credential_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/public"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"code": 200, "data": null})),
        )
        .mount(&mock_server)
        .await;

    let h = harness(&mock_server.uri(), None);
    let _: serde_json::Value = h.client.get("/public").await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn raw_body_defaults_to_json_content_type() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/employee"))
        .and(header("content-type", "application/json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"code": 200, "data": null})),
        )
        .mount(&mock_server)
        .await;

    let h = harness(&mock_server.uri(), None);
    let request = h
        .client
        .request(reqwest::Method::POST, "/employee")
        .body(r#"{"name":"alice"}"#);
    let result: serde_json::Value = h.client.execute(request).await.unwrap();
    assert!(result.is_null());
}

#[tokio::test]
async fn explicit_content_type_is_left_untouched() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/upload"))
        .and(header("content-type", "application/octet-stream"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"code": 200, "data": null})),
        )
        .mount(&mock_server)
        .await;

    let h = harness(&mock_server.uri(), None);
    let request = h
        .client
        .request(reqwest::Method::POST, "/upload")
        .header("content-type", "application/octet-stream")
        .body(vec![0u8, 1, 2]);
    let result: serde_json::Value = h.client.execute(request).await.unwrap();
    assert!(result.is_null());
}

#[tokio::test]
async fn business_failure_notifies_and_keeps_session() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/employee/9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 500,
            "msg": "oops"
        })))
        .mount(&mock_server)
        .await;

    let h = harness(&mock_server.uri(), Some("tok-123"));
    let result: Result<serde_json::Value, _> = h.client.get("/employee/9").await;

    match result {
        Err(ClientError::Business { message }) => assert_eq!(message, "oops"),
        other => panic!("expected business failure, got {other:?}"),
    }
    assert_eq!(h.notifier.messages(), vec!["oops"]);
    assert_eq!(h.sink.clears(), 0);
    assert!(h.navigator.pushes().is_empty());
}

#[tokio::test]
async fn embedded_auth_code_tears_down_session() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/employee"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 401,
            "msg": "expired"
        })))
        .mount(&mock_server)
        .await;

    let h = harness(&mock_server.uri(), Some("tok-123"));
    let result: Result<serde_json::Value, _> = h.client.get("/employee").await;

    match result {
        Err(ClientError::Business { message }) => assert_eq!(message, "expired"),
        other => panic!("expected business failure, got {other:?}"),
    }
    assert_eq!(h.notifier.messages(), vec!["expired"]);
    assert_eq!(h.sink.clears(), 1);
    assert_eq!(h.navigator.pushes(), vec![routes::LOGIN_PATH.to_string()]);
}

#[tokio::test]
async fn http_401_tears_down_session() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/employee"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&mock_server)
        .await;

    let h = harness(&mock_server.uri(), Some("tok-123"));
    let result: Result<serde_json::Value, _> = h.client.get("/employee").await;

    let err = result.unwrap_err();
    assert!(err.is_auth_failure());
    match err {
        ClientError::Transport { kind, message } => {
            assert_eq!(kind, FailureKind::Unauthenticated);
            assert_eq!(message, "not logged in or token expired");
        }
        other => panic!("expected transport failure, got {other:?}"),
    }
    assert_eq!(h.sink.clears(), 1);
    assert_eq!(h.navigator.pushes(), vec![routes::LOGIN_PATH.to_string()]);
    assert_eq!(
        h.notifier.messages(),
        vec!["not logged in or token expired"]
    );
}

#[tokio::test]
async fn http_403_uses_backend_message_when_present() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/admin-only"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({"message": "not for you"})),
        )
        .mount(&mock_server)
        .await;

    let h = harness(&mock_server.uri(), Some("tok-123"));
    let result: Result<serde_json::Value, _> = h.client.get("/admin-only").await;

    match result {
        Err(ClientError::Transport { kind, message }) => {
            assert_eq!(kind, FailureKind::Forbidden);
            assert_eq!(message, "not for you");
        }
        other => panic!("expected transport failure, got {other:?}"),
    }
    assert_eq!(h.sink.clears(), 0);
    assert!(h.navigator.pushes().is_empty());
}

#[tokio::test]
async fn http_403_without_body_uses_default_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/admin-only"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;

    let h = harness(&mock_server.uri(), None);
    let result: Result<serde_json::Value, _> = h.client.get("/admin-only").await;

    match result {
        Err(ClientError::Transport { kind, message }) => {
            assert_eq!(kind, FailureKind::Forbidden);
            assert_eq!(message, "access denied");
        }
        other => panic!("expected transport failure, got {other:?}"),
    }
}

#[tokio::test]
async fn http_404_and_500_classify_with_defaults() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let h = harness(&mock_server.uri(), None);

    let missing: Result<serde_json::Value, _> = h.client.get("/missing").await;
    match missing {
        Err(ClientError::Transport { kind, message }) => {
            assert_eq!(kind, FailureKind::NotFound);
            assert_eq!(message, "resource not found");
        }
        other => panic!("expected transport failure, got {other:?}"),
    }

    let broken: Result<serde_json::Value, _> = h.client.get("/broken").await;
    match broken {
        Err(ClientError::Transport { kind, message }) => {
            assert_eq!(kind, FailureKind::ServerError);
            assert_eq!(message, "internal server error");
        }
        other => panic!("expected transport failure, got {other:?}"),
    }
}

#[tokio::test]
async fn unlisted_status_classifies_as_unknown() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&mock_server)
        .await;

    let h = harness(&mock_server.uri(), None);
    let result: Result<serde_json::Value, _> = h.client.get("/flaky").await;

    match result {
        Err(ClientError::Transport { kind, message }) => {
            assert_eq!(kind, FailureKind::Unknown);
            assert_eq!(message, "network error");
        }
        other => panic!("expected transport failure, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_backend_classifies_as_unknown() {
    // Nothing listens here.
    let h = harness("http://127.0.0.1:9", None);
    let result: Result<serde_json::Value, _> = h.client.get("/anything").await;

    match result {
        Err(ClientError::Transport { kind, message }) => {
            assert_eq!(kind, FailureKind::Unknown);
            assert_eq!(message, "system error");
        }
        other => panic!("expected transport failure, got {other:?}"),
    }
    assert_eq!(h.notifier.messages(), vec!["system error"]);
    assert_eq!(h.sink.clears(), 0);
}

#[tokio::test]
async fn non_envelope_success_body_is_a_generic_business_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/odd"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>hello</html>"))
        .mount(&mock_server)
        .await;

    let h = harness(&mock_server.uri(), None);
    let result: Result<serde_json::Value, _> = h.client.get("/odd").await;

    match result {
        Err(ClientError::Business { message }) => assert_eq!(message, "system error"),
        other => panic!("expected business failure, got {other:?}"),
    }
    assert_eq!(h.notifier.messages(), vec!["system error"]);
}

#[tokio::test]
async fn download_bypasses_envelope_inspection() {
    let mock_server = MockServer::start().await;

    // An envelope-shaped body on the binary path must come back verbatim,
    // with no classification side effects.
    let body = br#"{"code": 500, "msg": "oops"}"#.to_vec();
    Mock::given(method("GET"))
        .and(path("/employee/export"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(body.clone(), "application/octet-stream"),
        )
        .mount(&mock_server)
        .await;

    let h = harness(&mock_server.uri(), Some("tok-123"));
    let bytes = h.client.download("/employee/export").await.unwrap();
    assert_eq!(bytes.as_ref(), body.as_slice());
    assert!(h.notifier.messages().is_empty());
    assert_eq!(h.sink.clears(), 0);
}

#[tokio::test]
async fn post_unit_ignores_payload_but_still_classifies() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/user/logout"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"code": 200, "data": null})),
        )
        .mount(&mock_server)
        .await;

    let h = harness(&mock_server.uri(), Some("tok-123"));
    h.client.post_unit("/user/logout").await.unwrap();
    assert!(h.notifier.messages().is_empty());
}

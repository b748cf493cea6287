//! End-to-end tests of the interceptor chain against a mock HTTP server.

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{json, Value};
use wiremock::matchers::{header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use domain::{AccessToken, ApiError, CredentialStore, ErrorClass, LoginRedirect, RequestId, Timestamp};
use middleware::{
    ClientInfo, HttpMiddleware, MemoryCredentialStore, RequestConfig, ResponseBody,
    CLIENT_VERSION_HEADER, REQUEST_ID_HEADER, REQUEST_TIMEOUT, TIMESTAMP_HEADER,
};

/// Credential store that counts `clear` calls.
#[derive(Default)]
struct CountingStore {
    token: Mutex<Option<AccessToken>>,
    clears: AtomicUsize,
}

impl CountingStore {
    fn holding(token: &str) -> Self {
        Self {
            token: Mutex::new(AccessToken::new(token)),
            clears: AtomicUsize::new(0),
        }
    }
}

impl CredentialStore for CountingStore {
    fn get(&self) -> Option<AccessToken> {
        self.token.lock().unwrap().clone()
    }

    fn set(&self, token: AccessToken) {
        *self.token.lock().unwrap() = Some(token);
    }

    fn clear(&self) {
        self.clears.fetch_add(1, Ordering::SeqCst);
        self.token.lock().unwrap().take();
    }
}

#[derive(Default)]
struct CountingRedirect(AtomicUsize);

impl LoginRedirect for CountingRedirect {
    fn redirect_to_login(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

fn middleware_for(
    server: &MockServer,
    store: Arc<dyn CredentialStore>,
    redirect: Arc<dyn LoginRedirect>,
) -> HttpMiddleware {
    HttpMiddleware::builder(server.uri())
        .credential_store(store)
        .login_redirect(redirect)
        .client_info(ClientInfo {
            user_agent: "querydesk-test".into(),
            url: "http://localhost:3000/query".into(),
            platform: "test".into(),
            language: "zh-CN".into(),
        })
        .build()
        .expect("middleware builds")
}

fn default_middleware(server: &MockServer, store: Arc<dyn CredentialStore>) -> HttpMiddleware {
    middleware_for(server, store, Arc::new(CountingRedirect::default()))
}

#[tokio::test]
async fn test_stored_credential_is_sent_as_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/profile"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let http = default_middleware(&server, Arc::new(CountingStore::holding("tok-123")));
    let body = http.get("/auth/profile", RequestConfig::new()).await.unwrap();

    assert!(body.is_enveloped());
}

#[tokio::test]
async fn test_skip_auth_sends_no_authorization_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;

    let http = default_middleware(&server, Arc::new(CountingStore::holding("tok-123")));
    http.post(
        "/auth/login",
        Some(json!({"username": "admin", "password": "admin123"})),
        RequestConfig::new().skip_auth(),
    )
    .await
    .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_missing_credential_still_dispatches() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/query/types"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["内部", "外部"])))
        .expect(1)
        .mount(&server)
        .await;

    let http = default_middleware(&server, Arc::new(MemoryCredentialStore::new()));
    let body = http.get("/query/types", RequestConfig::new()).await.unwrap();

    assert_eq!(body, ResponseBody::Bare(json!(["内部", "外部"])));
    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_context_headers_are_attached_and_echoed_in_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/profile"))
        .and(header_exists(REQUEST_ID_HEADER))
        .and(header_exists(TIMESTAMP_HEADER))
        .and(header(CLIENT_VERSION_HEADER, "1.0.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1, "username": "admin"})))
        .expect(1)
        .mount(&server)
        .await;

    let http = default_middleware(&server, Arc::new(MemoryCredentialStore::new()));
    let body = http.get("/auth/profile", RequestConfig::new()).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let sent_id = requests[0]
        .headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(RequestId::parse)
        .expect("request id header is a uuid");
    let sent_at = requests[0]
        .headers
        .get(TIMESTAMP_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(Timestamp::parse_rfc3339);
    assert!(sent_at.is_some());
    assert_eq!(body.request_id(), Some(sent_id));
}

#[tokio::test]
async fn test_every_request_gets_its_own_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let http = default_middleware(&server, Arc::new(MemoryCredentialStore::new()));
    http.get("/a", RequestConfig::new()).await.unwrap();
    http.get("/b", RequestConfig::new().skip_logging()).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let ids: Vec<_> = requests
        .iter()
        .map(|r| r.headers.get(REQUEST_ID_HEADER).unwrap().to_str().unwrap().to_string())
        .collect();
    assert_eq!(ids.len(), 2);
    assert_ne!(ids[0], ids[1]);
}

#[tokio::test]
async fn test_object_body_is_enveloped_with_raw_data() {
    let server = MockServer::start().await;
    let raw = json!({"access_token": "abc", "user": {"id": 1, "username": "admin", "email": "a@b.c"}});
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(201).set_body_json(raw.clone()))
        .mount(&server)
        .await;

    let http = default_middleware(&server, Arc::new(MemoryCredentialStore::new()));
    let body = http
        .post("/auth/login", Some(json!({"username": "admin"})), RequestConfig::new().skip_auth())
        .await
        .unwrap();

    match body {
        ResponseBody::Enveloped(envelope) => {
            assert!(envelope.success);
            assert_eq!(envelope.data, Some(raw));
            assert!(!envelope.request_id.is_empty());
        }
        ResponseBody::Bare(other) => panic!("expected envelope, got {other}"),
    }
}

#[tokio::test]
async fn test_array_body_is_not_enveloped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/query/categories"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!(["开发", "测试", "维护", "设计"])),
        )
        .mount(&server)
        .await;

    let http = default_middleware(&server, Arc::new(MemoryCredentialStore::new()));
    let body = http.get("/query/categories", RequestConfig::new()).await.unwrap();

    assert!(!body.is_enveloped());
    assert!(body.request_id().is_none());
    assert_eq!(body.into_payload(), json!(["开发", "测试", "维护", "设计"]));
}

#[tokio::test]
async fn test_object_request_body_gains_client_info() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query/test-data"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
        .mount(&server)
        .await;

    let http = default_middleware(&server, Arc::new(MemoryCredentialStore::new()));
    http.post("/query/test-data", Some(json!({"num": 100})), RequestConfig::new())
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let sent: Value = requests[0].body_json().unwrap();
    assert_eq!(sent["num"], 100);
    assert_eq!(sent["clientInfo"]["userAgent"], "querydesk-test");
    assert_eq!(sent["clientInfo"]["url"], "http://localhost:3000/query");
    assert_eq!(sent["clientInfo"]["platform"], "test");
    assert_eq!(sent["clientInfo"]["language"], "zh-CN");
    assert!(sent["clientInfo"]["timestamp"].is_string());
}

#[tokio::test]
async fn test_query_params_are_forwarded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/query/search"))
        .and(query_param("category", "开发"))
        .and(query_param("type", "外部"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let http = default_middleware(&server, Arc::new(MemoryCredentialStore::new()));
    http.get(
        "/query/search",
        RequestConfig::new().param("category", "开发").param("type", "外部"),
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn test_unauthorized_clears_credential_once_and_reraises() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/query/categories"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"statusCode": 401, "message": "Unauthorized"})),
        )
        .mount(&server)
        .await;

    let store = Arc::new(CountingStore::holding("expired"));
    let redirect = Arc::new(CountingRedirect::default());
    let http = middleware_for(&server, store.clone(), redirect.clone());

    let err = http.get("/query/categories", RequestConfig::new()).await.unwrap_err();

    assert_eq!(err.class(), ErrorClass::Unauthorized);
    assert_eq!(store.clears.load(Ordering::SeqCst), 1);
    assert!(store.get().is_none());
    assert_eq!(redirect.0.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_server_fault_is_reraised_without_eviction() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "boom"})))
        .mount(&server)
        .await;

    let store = Arc::new(CountingStore::holding("tok"));
    let http = default_middleware(&server, store.clone());

    let err = http.get("/query/statuses", RequestConfig::new()).await.unwrap_err();

    assert_eq!(
        err,
        ApiError::ServerFault {
            status: 500,
            message: "boom".into()
        }
    );
    assert_eq!(store.clears.load(Ordering::SeqCst), 0);
    assert!(store.get().is_some());
}

#[tokio::test]
async fn test_client_fault_carries_backend_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query/test-data"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"statusCode": 400, "message": "num must be 100"})),
        )
        .mount(&server)
        .await;

    let http = default_middleware(&server, Arc::new(MemoryCredentialStore::new()));
    let err = http
        .post("/query/test-data", Some(json!({"num": 5})), RequestConfig::new())
        .await
        .unwrap_err();

    assert_eq!(err.class(), ErrorClass::ClientFault);
    assert_eq!(err.status(), Some(400));
    assert!(err.to_string().contains("num must be 100"));
}

#[tokio::test]
async fn test_retry_count_does_not_trigger_retries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/query/types"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let http = default_middleware(&server, Arc::new(MemoryCredentialStore::new()));
    let err = http
        .get("/query/types", RequestConfig::new().retry_count(3))
        .await
        .unwrap_err();

    assert_eq!(err.class(), ErrorClass::ServerFault);
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_unreachable_host_is_a_network_fault() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let store = Arc::new(CountingStore::holding("tok"));
    let http = HttpMiddleware::builder(format!("http://{addr}"))
        .credential_store(store.clone())
        .build()
        .unwrap();

    let err = http.get("/query/types", RequestConfig::new()).await.unwrap_err();

    match err {
        ApiError::Network { timed_out, .. } => assert!(!timed_out),
        other => panic!("expected network fault, got {other:?}"),
    }
    assert_eq!(store.clears.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_put_and_delete_use_their_methods() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/items/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"updated": true})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/items/1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let http = default_middleware(&server, Arc::new(MemoryCredentialStore::new()));
    let updated = http
        .put("/items/1", Some(json!({"name": "x"})), RequestConfig::new())
        .await
        .unwrap();
    let deleted = http.delete("/items/1", RequestConfig::new()).await.unwrap();

    assert!(updated.is_enveloped());
    assert_eq!(deleted, ResponseBody::Bare(Value::Null));
}

#[tokio::test]
async fn test_slow_response_times_out_as_network_fault() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/query/categories"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(REQUEST_TIMEOUT + Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let store = Arc::new(CountingStore::holding("tok"));
    let redirect = Arc::new(CountingRedirect::default());
    let http = middleware_for(&server, store.clone(), redirect.clone());

    let err = http.get("/query/categories", RequestConfig::new()).await.unwrap_err();

    match err {
        ApiError::Network { timed_out, .. } => assert!(timed_out),
        other => panic!("expected network fault, got {other:?}"),
    }
    assert_eq!(store.clears.load(Ordering::SeqCst), 0);
    assert_eq!(store.get().unwrap().expose(), "tok");
    assert_eq!(redirect.0.load(Ordering::SeqCst), 0);
}

/// Collects formatted log output in memory.
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl LogBuffer {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }

    /// The `fields` object of every JSON line whose message is `message`.
    fn events(&self, message: &str) -> Vec<Value> {
        self.text()
            .lines()
            .filter_map(|line| serde_json::from_str::<Value>(line).ok())
            .map(|line| line["fields"].clone())
            .filter(|fields| fields["message"] == message)
            .collect()
    }
}

#[tokio::test]
async fn test_log_lines_are_redacted_correlated_and_skippable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;

    let logs = LogBuffer::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .json()
        .with_writer(move || writer.clone())
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);

    let http = default_middleware(&server, Arc::new(CountingStore::holding("SECRET-TOKEN-42")));
    http.get("/logged", RequestConfig::new()).await.unwrap();
    http.get("/quiet", RequestConfig::new().skip_logging()).await.unwrap();
    drop(guard);

    assert!(!logs.text().contains("SECRET-TOKEN-42"));

    let sent = logs.events("Sending request");
    assert_eq!(sent.len(), 1);
    assert!(sent[0]["url"].as_str().unwrap().ends_with("/logged"));
    assert_eq!(sent[0]["authorization"], "Bearer ***");

    let requests = server.received_requests().await.unwrap();
    let succeeded = logs.events("Request succeeded");
    assert_eq!(succeeded.len(), 2);
    for event in &succeeded {
        let url = event["url"].as_str().unwrap();
        let request = requests
            .iter()
            .find(|r| url.ends_with(r.url.path()))
            .unwrap();
        let header_id = request.headers.get(REQUEST_ID_HEADER).unwrap().to_str().unwrap();
        assert_eq!(event["request_id"], header_id);
    }
}

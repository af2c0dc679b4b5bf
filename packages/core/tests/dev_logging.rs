//! Dev-mode diagnostics: the pipeline writes its `[API ...]` lines only when
//! `dev_mode` is on. Output is captured with a thread-local subscriber, so
//! each test runs on the default current-thread runtime.

use std::io;
use std::sync::{Arc, Mutex};

use reqwest::header::{HeaderName, HeaderValue};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::subscriber::DefaultGuard;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

use request_kit::client::TRACE_ID_HEADER;
use request_kit::{ApiClient, ClientConfig, RequestOptions};

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn capture_logs() -> (LogBuffer, DefaultGuard) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (buffer, guard)
}

async fn backend() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "status": "ok", "data": 1 })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;
    server
}

async fn exercise(client: &ApiClient) {
    let _ = client.get::<Value>("/ok").await.unwrap();
    let _ = client.get::<Value>("/broken").await.unwrap_err();
}

#[tokio::test]
async fn dev_mode_logs_request_response_and_error() {
    let server = backend().await;
    let (logs, _guard) = capture_logs();

    let client = ApiClient::new(ClientConfig::new(server.uri()).with_dev_mode(true));
    exercise(&client).await;

    let output = logs.contents();
    assert!(output.contains("[API Request]"), "{}", output);
    assert!(output.contains("GET /ok"), "{}", output);
    assert!(output.contains("[API Response]"), "{}", output);
    assert!(output.contains("[API Error]"), "{}", output);
    assert!(output.contains("type=business"), "{}", output);
    assert!(
        output.contains("unreadable error body for HTTP 500"),
        "{}",
        output
    );
}

#[tokio::test]
async fn logs_reuse_the_caller_trace_id() {
    let server = backend().await;
    let (logs, _guard) = capture_logs();

    let client = ApiClient::new(ClientConfig::new(server.uri()).with_dev_mode(true));
    let trace_id = "feedc0de";
    let options = RequestOptions::new(Method::GET).with_header(
        HeaderName::from_static(TRACE_ID_HEADER),
        HeaderValue::from_static("feedc0de"),
    );
    let _ = client
        .fetch_api::<Value>("/broken", options)
        .await
        .unwrap_err();

    let output = logs.contents();
    assert!(
        output.contains(&format!("[API Request] [{}]", trace_id)),
        "{}",
        output
    );
    assert!(
        output.contains(&format!("[API Error] [{}]", trace_id)),
        "{}",
        output
    );
}

#[tokio::test]
async fn production_mode_stays_quiet() {
    let server = backend().await;
    let (logs, _guard) = capture_logs();

    let client = ApiClient::new(ClientConfig::new(server.uri()).with_dev_mode(false));
    exercise(&client).await;

    let output = logs.contents();
    assert!(!output.contains("[API"), "{}", output);
}

//! The request pipeline.
//!
//! `ApiClient::fetch_api` issues one HTTP call, unwraps the response
//! envelope, and maps every failure into exactly one [`ApiError`]. Failures
//! are carried internally as [`Failure`], which separates errors that are
//! already classified from raw ones still waiting for a category.

use std::time::Duration;

use hyper::ext::ReasonPhrase;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

use crate::client::error::{ApiError, REQUEST_FAILED_MESSAGE};
use crate::config::ClientConfig;
use crate::types::{Envelope, EnvelopeStatus};

/// Header carrying the per-request trace id.
pub const TRACE_ID_HEADER: &str = "x-trace-id";

/// Per-call options: verb, header overrides, serialized body and deadline.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<String>,
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn with_body(mut self, body: Option<String>) -> Self {
        self.body = body;
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// HTTP client bound to one [`ClientConfig`].
///
/// Cheap to clone; clones share the underlying connection handling.
#[derive(Debug, Clone)]
pub struct ApiClient {
    config: ClientConfig,
    http: Client,
}

/// A failure on its way out of the pipeline.
#[derive(Debug)]
enum Failure {
    /// Already categorized; returned to the caller unchanged.
    Classified(ApiError),
    /// Anything else. Becomes an `unknown` error with this message.
    Unclassified(String),
}

impl Failure {
    fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Failure::Classified(ApiError::timeout())
        } else if err.is_connect() || err.is_request() {
            Failure::Classified(ApiError::network())
        } else {
            Failure::Unclassified(err.to_string())
        }
    }

    fn unclassified(err: impl std::fmt::Display) -> Self {
        Failure::Unclassified(err.to_string())
    }

    fn into_api_error(self) -> ApiError {
        match self {
            Failure::Classified(err) => err,
            Failure::Unclassified(message) => ApiError::unknown(message),
        }
    }
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    /// Use a preconfigured `reqwest::Client`, e.g. one with a proxy.
    pub fn with_http_client(config: ClientConfig, http: Client) -> Self {
        Self { config, http }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Issue one call to `endpoint` and resolve with the envelope's `data`
    /// decoded as `T`.
    pub async fn fetch_api<T>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let RequestOptions {
            method,
            headers,
            body,
            timeout,
        } = options;

        let mut headers = merge_headers(headers);
        let trace_id = ensure_trace_id(&mut headers);

        if self.config.dev_mode {
            tracing::info!("[API Request] [{}] {} {}", trace_id, method, endpoint);
        }

        let result = self
            .execute(endpoint, method, headers, body, timeout, &trace_id)
            .await
            .map_err(Failure::into_api_error);

        if let Err(err) = &result {
            self.log_error(&trace_id, err);
        }

        result
    }

    async fn execute<T>(
        &self,
        endpoint: &str,
        method: Method,
        headers: HeaderMap,
        body: Option<String>,
        timeout: Option<Duration>,
        trace_id: &str,
    ) -> Result<T, Failure>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.config.base_url, endpoint);

        let mut request = self.http.request(method, url.as_str()).headers(headers);
        if let Some(body) = body {
            request = request.body(body);
        }
        if let Some(deadline) = timeout.or(self.config.timeout) {
            request = request.timeout(deadline);
        }

        let response = request.send().await.map_err(Failure::from_transport)?;

        if !response.status().is_success() {
            return Err(self.http_failure(response, trace_id).await);
        }

        let bytes = response.bytes().await.map_err(Failure::from_transport)?;
        let envelope: Envelope<Value> =
            serde_json::from_slice(&bytes).map_err(Failure::unclassified)?;

        if self.config.dev_mode {
            tracing::info!(
                "[API Response] [{}] {} {}",
                trace_id,
                endpoint,
                serde_json::to_string(&envelope).unwrap_or_default()
            );
        }

        match envelope.status {
            EnvelopeStatus::Error => {
                let message = envelope
                    .message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| REQUEST_FAILED_MESSAGE.to_string());
                Err(Failure::Classified(ApiError::business(message, None, None)))
            }
            EnvelopeStatus::Ok => serde_json::from_value(envelope.data.unwrap_or(Value::Null))
                .map_err(Failure::unclassified),
        }
    }

    /// Classify a non-2xx response as a business error. A deadline that
    /// elapses while the body is read is still a timeout.
    async fn http_failure(&self, response: Response, trace_id: &str) -> Failure {
        let status = response.status();
        let fallback = status_fallback_message(&response);

        let parsed = match response.bytes().await {
            Ok(bytes) => serde_json::from_slice::<Value>(&bytes).map_err(|e| e.to_string()),
            Err(err) if err.is_timeout() => return Failure::Classified(ApiError::timeout()),
            Err(err) => Err(err.to_string()),
        };

        let detail = match parsed {
            Ok(body) => Some(body),
            Err(reason) => {
                if self.config.dev_mode {
                    tracing::debug!(
                        "[API Error] [{}] unreadable error body for HTTP {}: {}",
                        trace_id,
                        status.as_u16(),
                        reason
                    );
                }
                None
            }
        };

        let message = detail
            .as_ref()
            .and_then(error_body_message)
            .unwrap_or(fallback);

        Failure::Classified(ApiError::business(message, Some(status.as_u16()), detail))
    }

    pub(crate) fn log_error(&self, trace_id: &str, err: &ApiError) {
        if self.config.dev_mode {
            tracing::error!(
                "[API Error] [{}] type={} message={} status_code={:?} detail={:?}",
                trace_id,
                err.kind(),
                err.message(),
                err.status_code(),
                err.detail()
            );
        }
    }
}

/// `Content-Type: application/json` unless the caller overrides it. Every
/// override replaces all defaults of the same name.
fn merge_headers(overrides: HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    for name in overrides.keys() {
        headers.remove(name);
    }
    for (name, value) in overrides.iter() {
        headers.append(name.clone(), value.clone());
    }
    headers
}

/// Return the caller's trace id, or attach a fresh one.
fn ensure_trace_id(headers: &mut HeaderMap) -> String {
    if let Some(existing) = headers
        .get(TRACE_ID_HEADER)
        .and_then(|v| v.to_str().ok())
    {
        return existing.to_string();
    }

    let trace_id = new_trace_id();
    if let Ok(value) = HeaderValue::from_str(&trace_id) {
        headers.insert(TRACE_ID_HEADER, value);
    }
    trace_id
}

/// `HTTP <status>: <reason>` using the phrase the server sent, else the
/// standard one. Without either the message is just `HTTP <status>`.
fn status_fallback_message(response: &Response) -> String {
    let status = response.status().as_u16();
    let reason = response
        .extensions()
        .get::<ReasonPhrase>()
        .and_then(|phrase| std::str::from_utf8(phrase.as_bytes()).ok())
        .or_else(|| response.status().canonical_reason())
        .filter(|reason| !reason.is_empty());

    match reason {
        Some(reason) => format!("HTTP {}: {}", status, reason),
        None => format!("HTTP {}", status),
    }
}

pub(crate) fn new_trace_id() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

/// First non-empty string among the body's `message` and `detail` fields.
fn error_body_message(body: &Value) -> Option<String> {
    ["message", "detail"].iter().find_map(|key| {
        body.get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

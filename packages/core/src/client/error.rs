//! Error taxonomy for API calls.
//!
//! Every failed call produces exactly one [`ApiError`], tagged with an
//! [`ApiErrorKind`]. The standalone [`NetworkError`], [`TimeoutError`] and
//! [`BusinessError`] types exist for code that raises one of these failures
//! itself; each converts into an `ApiError` with `From`.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

/// User-facing message for transport failures.
pub const NETWORK_FAILURE_MESSAGE: &str = "网络连接失败，请检查网络";
/// User-facing message for exceeded deadlines.
pub const TIMEOUT_MESSAGE: &str = "请求超时，请稍后重试";
/// Fallback for an envelope with `status: "error"` and no message.
pub const REQUEST_FAILED_MESSAGE: &str = "请求失败";
/// Fallback for failures that fit no other category.
pub const OPERATION_FAILED_MESSAGE: &str = "操作失败，请稍后重试";

/// Category of a failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiErrorKind {
    /// The transport failed before any response arrived.
    Network,
    /// The deadline elapsed.
    Timeout,
    /// The server answered with a structured error.
    Business,
    Unknown,
}

impl ApiErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Timeout => "timeout",
            Self::Business => "business",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified API failure.
///
/// Fields are private so the value cannot change after construction.
/// Serializes as `{ "type", "message", "statusCode"?, "detail"? }`.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[error("{message}")]
pub struct ApiError {
    #[serde(rename = "type")]
    kind: ApiErrorKind,
    message: String,
    #[serde(rename = "statusCode", skip_serializing_if = "Option::is_none")]
    status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<Value>,
}

impl ApiError {
    pub fn new(
        kind: ApiErrorKind,
        message: impl Into<String>,
        status_code: Option<u16>,
        detail: Option<Value>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            status_code,
            detail,
        }
    }

    pub fn network() -> Self {
        Self::new(ApiErrorKind::Network, NETWORK_FAILURE_MESSAGE, None, None)
    }

    pub fn timeout() -> Self {
        Self::new(ApiErrorKind::Timeout, TIMEOUT_MESSAGE, None, None)
    }

    pub fn business(
        message: impl Into<String>,
        status_code: Option<u16>,
        detail: Option<Value>,
    ) -> Self {
        Self::new(ApiErrorKind::Business, message, status_code, detail)
    }

    /// An uncategorized failure. An empty message is replaced by the generic
    /// retry prompt.
    pub fn unknown(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.is_empty() {
            OPERATION_FAILED_MESSAGE.to_string()
        } else {
            message
        };
        Self::new(ApiErrorKind::Unknown, message, None, None)
    }

    pub fn kind(&self) -> ApiErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// HTTP status, present only for business errors raised from a non-2xx
    /// response.
    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    /// Parsed error body, if the server sent one.
    pub fn detail(&self) -> Option<&Value> {
        self.detail.as_ref()
    }
}

/// Transport-level failure raised outside the request pipeline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct NetworkError {
    pub message: String,
}

impl Default for NetworkError {
    fn default() -> Self {
        Self {
            message: "网络连接失败".to_string(),
        }
    }
}

/// Deadline failure raised outside the request pipeline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct TimeoutError {
    pub message: String,
}

impl Default for TimeoutError {
    fn default() -> Self {
        Self {
            message: "请求超时".to_string(),
        }
    }
}

/// A business rule violation, optionally carrying the backend's numeric
/// business code (e.g. `40004` for a missing resource).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct BusinessError {
    pub message: String,
    pub code: Option<i64>,
}

impl BusinessError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }

    pub fn with_code(message: impl Into<String>, code: i64) -> Self {
        Self {
            message: message.into(),
            code: Some(code),
        }
    }
}

impl From<NetworkError> for ApiError {
    fn from(err: NetworkError) -> Self {
        Self::new(ApiErrorKind::Network, err.message, None, None)
    }
}

impl From<TimeoutError> for ApiError {
    fn from(err: TimeoutError) -> Self {
        Self::new(ApiErrorKind::Timeout, err.message, None, None)
    }
}

// The business code is not an HTTP status, so it travels in `detail`.
impl From<BusinessError> for ApiError {
    fn from(err: BusinessError) -> Self {
        let detail = err.code.map(|code| json!({ "code": code }));
        Self::business(err.message, None, detail)
    }
}

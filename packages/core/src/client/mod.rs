//! HTTP client for envelope-wrapped JSON APIs.
//!
//! [`ApiClient`] owns its configuration, so there is no process-wide base
//! URL. Calls are independent futures and may run concurrently; nothing is
//! retried or cached.

pub mod error;
pub mod methods;
pub mod pipeline;

pub use error::{ApiError, ApiErrorKind, BusinessError, NetworkError, TimeoutError};
pub use pipeline::{ApiClient, RequestOptions, TRACE_ID_HEADER};

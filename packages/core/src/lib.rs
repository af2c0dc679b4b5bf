// Library root. The `request-kit` binary in `src/main.rs` is a thin CLI over
// `client::ApiClient`.

pub mod boundary;
pub mod client;
pub mod enums;
pub mod format;
pub mod types;

// Only needed by the binary, but public so tests can reach them.
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;

pub use boundary::{ErrorBoundary, Rendered, View};
pub use client::{ApiClient, ApiError, ApiErrorKind, RequestOptions};
pub use config::ClientConfig;
pub use types::{Envelope, EnvelopeStatus, Id, PaginatedData, PaginationParams};

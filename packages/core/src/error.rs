use std::fmt;
use std::error::Error;

use crate::client::ApiError;

/// Top-level error for the `request-kit` binary.
#[derive(Debug)]
pub enum AppError {
    Config(String),
    Request(ApiError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(msg) => write!(f, "Config error: {}", msg),
            AppError::Request(err) => write!(f, "Request failed ({}): {}", err.kind(), err),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AppError::Config(_) => None,
            AppError::Request(err) => Some(err),
        }
    }
}

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        AppError::Request(err)
    }
}

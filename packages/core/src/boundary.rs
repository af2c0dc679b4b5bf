//! Render-failure boundary.
//!
//! An [`ErrorBoundary`] supervises render attempts. The first attempt that
//! returns `Err` or panics moves it from `Normal` to `Errored`, and from then
//! on it only yields the fallback. Getting back to `Normal` means building a
//! new boundary. The boundary knows nothing about [`crate::client::ApiError`];
//! it only reacts to failures.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use chrono::{DateTime, Utc};

/// A render failure recorded by the boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaughtError {
    pub message: String,
    /// `true` when the failure was a panic rather than an `Err`.
    pub panicked: bool,
    pub caught_at: DateTime<Utc>,
}

impl fmt::Display for CaughtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundaryState {
    Normal,
    Errored(CaughtError),
}

/// Result of one supervised render attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered<V> {
    Ok(V),
    Failed(CaughtError),
}

/// Built-in notice shown when no fallback view was supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackNotice {
    pub title: String,
    pub message: String,
    /// Label of the manual reload action.
    pub reload_label: String,
}

impl Default for FallbackNotice {
    fn default() -> Self {
        Self {
            title: "出错了".to_string(),
            message: "页面发生错误，请刷新重试".to_string(),
            reload_label: "刷新页面".to_string(),
        }
    }
}

impl fmt::Display for FallbackNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", self.message)?;
        write!(f, "[{}]", self.reload_label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fallback<V> {
    /// The fallback view supplied by the caller.
    Custom(V),
    Notice(FallbackNotice),
}

/// What the boundary shows after a render call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View<V> {
    Content(V),
    Fallback(Fallback<V>),
}

impl<V> View<V> {
    pub fn is_fallback(&self) -> bool {
        matches!(self, View::Fallback(_))
    }
}

#[derive(Debug)]
pub struct ErrorBoundary<V> {
    fallback: Option<V>,
    state: BoundaryState,
}

impl<V> Default for ErrorBoundary<V> {
    fn default() -> Self {
        Self {
            fallback: None,
            state: BoundaryState::Normal,
        }
    }
}

impl<V: Clone> ErrorBoundary<V> {
    /// Boundary that falls back to the built-in [`FallbackNotice`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Boundary that falls back to `fallback`.
    pub fn with_fallback(fallback: V) -> Self {
        Self {
            fallback: Some(fallback),
            state: BoundaryState::Normal,
        }
    }

    pub fn state(&self) -> &BoundaryState {
        &self.state
    }

    pub fn is_errored(&self) -> bool {
        matches!(self.state, BoundaryState::Errored(_))
    }

    pub fn error(&self) -> Option<&CaughtError> {
        match &self.state {
            BoundaryState::Errored(err) => Some(err),
            BoundaryState::Normal => None,
        }
    }

    /// Run `render` unless the boundary has already failed.
    ///
    /// Once errored, `render` is not called and the recorded error is
    /// returned again.
    pub fn attempt<F, E>(&mut self, render: F) -> Rendered<V>
    where
        F: FnOnce() -> Result<V, E>,
        E: fmt::Display,
    {
        if let BoundaryState::Errored(err) = &self.state {
            return Rendered::Failed(err.clone());
        }

        let caught = match panic::catch_unwind(AssertUnwindSafe(render)) {
            Ok(Ok(view)) => return Rendered::Ok(view),
            Ok(Err(err)) => CaughtError {
                message: err.to_string(),
                panicked: false,
                caught_at: Utc::now(),
            },
            Err(payload) => CaughtError {
                message: panic_message(payload.as_ref()),
                panicked: true,
                caught_at: Utc::now(),
            },
        };

        tracing::error!("ErrorBoundary caught an error: {}", caught);
        self.state = BoundaryState::Errored(caught.clone());
        Rendered::Failed(caught)
    }

    /// Like [`attempt`](Self::attempt), but resolves failures to the fallback.
    pub fn render<F, E>(&mut self, render: F) -> View<V>
    where
        F: FnOnce() -> Result<V, E>,
        E: fmt::Display,
    {
        match self.attempt(render) {
            Rendered::Ok(view) => View::Content(view),
            Rendered::Failed(_) => View::Fallback(self.fallback()),
        }
    }

    fn fallback(&self) -> Fallback<V> {
        match &self.fallback {
            Some(view) => Fallback::Custom(view.clone()),
            None => Fallback::Notice(FallbackNotice::default()),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown render failure".to_string()
    }
}

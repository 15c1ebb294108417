use std::{result::Result as StdResult, sync::mpsc};

use thiserror::Error;

/// Result type for pergola operations.
pub type Result<T> = StdResult<T, Error>;

/// Core error type.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid style configuration.
    #[error("style: {0}")]
    Style(String),

    /// Layout failure.
    #[error("layout: {0}")]
    Layout(String),

    /// Run loop failure.
    #[error("runloop: {0}")]
    RunLoop(String),

    /// Command registry or dispatch failure.
    #[error("command: {0}")]
    Command(String),

    /// Native backend failure.
    #[error("backend: {0}")]
    Backend(String),

    /// Content could not be loaded or decoded.
    #[error("content: {0}")]
    Content(String),

    /// Malformed keyboard shortcut.
    #[error("shortcut: {0}")]
    Shortcut(String),

    /// Internal error.
    #[error("internal: {0}")]
    Internal(String),

    /// A command action failed.
    #[error("action failed: {0}")]
    Action(#[from] anyhow::Error),
}

impl From<mpsc::RecvError> for Error {
    fn from(e: mpsc::RecvError) -> Self {
        Self::RunLoop(e.to_string())
    }
}

impl<T> From<mpsc::SendError<T>> for Error {
    fn from(_: mpsc::SendError<T>) -> Self {
        Self::RunLoop("event loop channel closed".into())
    }
}

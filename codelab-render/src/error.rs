use std::io;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Errors that can occur while rendering.
///
/// The only failure mode is the output sink refusing a write. The error is
/// kept by the writer and handed back on every later write, so it is cheap to
/// clone.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RenderError {
    #[error("Failed to write rendered output: {0}")]
    Write(#[source] Arc<io::Error>),
}

impl From<io::Error> for RenderError {
    fn from(err: io::Error) -> Self {
        RenderError::Write(Arc::new(err))
    }
}

impl RenderError {
    /// Kind of the underlying I/O error.
    pub fn io_kind(&self) -> io::ErrorKind {
        match self {
            RenderError::Write(err) => err.kind(),
        }
    }
}

/// Errors that can occur while loading a node tree.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Invalid node tree JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A diagnostic message produced by [`validate`](crate::validate::validate).
///
/// Diagnostics never stop rendering; they describe input that breaks the
/// producer contract or renders to nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    /// Location in the tree, e.g. `[2].content[0]`.
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

//! Error types for fetching and store lifecycle

use thiserror::Error;

/// Errors from one refresh attempt against the catalog source
///
/// These are logged by the refresh loop and never reach readers.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("HTTP {status}, body:\n---\n{excerpt}\n---")]
    Status { status: u16, excerpt: String },

    #[error("Could not read body: {0}")]
    Body(#[source] reqwest::Error),

    #[error("Could not decode cards: {source}, body:\n---\n{excerpt}\n---")]
    Decode {
        #[source]
        source: serde_json::Error,
        excerpt: String,
    },
}

impl FetchError {
    /// HTTP status code, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors surfaced by `Store` operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("already closed")]
    AlreadyClosed,
}

/// Leading `limit` bytes of a body as lossy UTF-8, for log excerpts
pub fn excerpt(body: &[u8], limit: usize) -> String {
    let end = body.len().min(limit);
    String::from_utf8_lossy(&body[..end]).into_owned()
}

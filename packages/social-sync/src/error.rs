//! Typed errors for the sync routine.
//!
//! These never cross the orchestrator boundary: `SyncOrchestrator::sync`
//! converts every error into a [`SyncOutcome`](crate::SyncOutcome).

use std::time::Duration;

use thiserror::Error;

use crate::types::PostId;

/// Errors raised inside the sync pipeline.
#[derive(Debug, Error)]
pub enum SyncError {
    /// No published post matches the event title
    #[error("no published post titled {title:?}")]
    PostNotFound { title: String },

    /// Every permalink strategy produced an empty string
    #[error("permalink for post {post_id} resolved to an empty string")]
    EmptyPermalink { post_id: PostId },

    /// Post store read failed
    #[error("post store error: {0}")]
    Store(#[from] StoreError),

    /// HTTP transport could not be built or used
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Configuration could not be loaded
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors loading a [`SyncConfig`](crate::SyncConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required variable or setting absent
    #[error("missing setting: {0}")]
    Missing(&'static str),

    /// Setting present but unparseable
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Errors from a [`PostStore`](crate::PostStore) backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend query failed
    #[error("query failed: {0}")]
    Query(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Row could not be mapped to a post record
    #[error("corrupt row for post {cid}: {reason}")]
    CorruptRow { cid: i64, reason: String },

    /// Backend is unavailable
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Transport-level failures: the HTTP exchange never completed.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Endpoint URL could not be built from the instance URL
    #[error("invalid instance URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// HTTP client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    Build(String),

    /// Request exceeded the configured timeout
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// DNS, TCP or TLS connection failure
    #[error("connection failed: {0}")]
    Connect(String),

    /// Redirect limit exceeded or redirect loop
    #[error("redirect failed: {0}")]
    Redirect(String),

    /// Any other request or body-read failure
    #[error("request failed: {0}")]
    Request(String),
}

impl TransportError {
    /// Short machine-friendly label, used in logs and outcomes.
    pub fn kind(&self) -> &'static str {
        match self {
            TransportError::InvalidUrl { .. } => "invalid_url",
            TransportError::Build(_) => "build",
            TransportError::Timeout(_) => "timeout",
            TransportError::Connect(_) => "connect",
            TransportError::Redirect(_) => "redirect",
            TransportError::Request(_) => "request",
        }
    }
}

/// Error message including its sources, e.g. "error sending request: connection refused".
pub(crate) fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Result type alias for sync pipeline operations.
pub type Result<T> = std::result::Result<T, SyncError>;

/// Result type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Result type alias for transport operations.
pub type TransportResult<T> = std::result::Result<T, TransportError>;

/// Result type alias for configuration loading.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

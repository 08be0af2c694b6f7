//! HTTP transport seam for the status API.

use async_trait::async_trait;
use url::Url;

use crate::error::TransportResult;
use crate::security::AccessToken;
use crate::types::StatusPayload;

/// A fully prepared status-creation request.
///
/// The bearer token is kept apart from the plain headers so the request
/// can be logged or recorded without leaking it.
#[derive(Debug, Clone)]
pub struct StatusRequest {
    pub endpoint: Url,
    /// Authority of `endpoint`, for logs. Transports derive the `Host`
    /// header from the URL of each hop instead.
    pub host: String,
    pub bearer: AccessToken,
    /// Non-secret headers, in send order
    pub headers: Vec<(&'static str, String)>,
    pub payload: StatusPayload,
}

impl StatusRequest {
    /// Value of a plain header, case-insensitive.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A completed HTTP exchange, whatever its status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one status request. Implementations must not retry.
#[async_trait]
pub trait StatusTransport: Send + Sync {
    /// `Ok` for any completed exchange (2xx or not), `Err` only when the
    /// exchange itself failed.
    async fn post_status(&self, request: &StatusRequest) -> TransportResult<TransportResponse>;
}

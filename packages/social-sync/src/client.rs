//! Client for the Mastodon-compatible status API.
//!
//! Sends exactly one `POST /api/v1/statuses` per call and reports what
//! happened as a [`SyncOutcome`]. There are no retries.
//!
//! # Example
//!
//! ```rust,ignore
//! use social_sync::{AccessToken, SocialApiClient, SyncConfig};
//!
//! let config = SyncConfig::new("https://social.example.org", "token");
//! let client = SocialApiClient::from_config(&config)?;
//!
//! let outcome = client
//!     .send(&config.instance_url, &config.access_token, "## Hello\n\nWorld")
//!     .await;
//! ```

use std::sync::Arc;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::config::{statuses_endpoint, SyncConfig};
use crate::error::{TransportError, TransportResult};
use crate::outcome::SyncOutcome;
use crate::security::AccessToken;
use crate::traits::{StatusRequest, StatusTransport};
use crate::transport::ReqwestTransport;
use crate::types::StatusPayload;

/// `User-Agent` sent with every request.
pub const USER_AGENT: &str = concat!("social-sync/", env!("CARGO_PKG_VERSION"));

/// Status API client.
#[derive(Clone)]
pub struct SocialApiClient {
    transport: Arc<dyn StatusTransport>,
    user_agent: String,
}

impl SocialApiClient {
    /// Create a client over any transport.
    pub fn new(transport: Arc<dyn StatusTransport>) -> Self {
        Self {
            transport,
            user_agent: USER_AGENT.to_string(),
        }
    }

    /// Create a client with a `reqwest` transport configured from `config`.
    pub fn from_config(config: &SyncConfig) -> TransportResult<Self> {
        Ok(Self::new(Arc::new(ReqwestTransport::from_config(config)?)))
    }

    /// Set a custom user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Build the request for `message` without sending it.
    pub fn build_request(
        &self,
        base_url: &str,
        access_token: &AccessToken,
        message: &str,
    ) -> TransportResult<StatusRequest> {
        let raw = statuses_endpoint(base_url);
        let endpoint = Url::parse(&raw).map_err(|e| TransportError::InvalidUrl {
            url: raw.clone(),
            reason: e.to_string(),
        })?;

        let host = authority(&endpoint).ok_or_else(|| TransportError::InvalidUrl {
            url: raw.clone(),
            reason: "URL has no host".to_string(),
        })?;

        Ok(StatusRequest {
            headers: vec![
                ("Content-Type", "application/json".to_string()),
                ("Accept", "*/*".to_string()),
                ("User-Agent", self.user_agent.clone()),
                ("Connection", "keep-alive".to_string()),
            ],
            endpoint,
            host,
            bearer: access_token.clone(),
            payload: StatusPayload::public_markdown(message),
        })
    }

    /// Post `message` as a public markdown status.
    ///
    /// Any completed exchange is `Delivered` (2xx) or `Rejected` (other
    /// codes); everything else is `TransportFailed`.
    pub async fn send(
        &self,
        base_url: &str,
        access_token: &AccessToken,
        message: &str,
    ) -> SyncOutcome {
        let request = match self.build_request(base_url, access_token, message) {
            Ok(request) => request,
            Err(e) => {
                error!(base_url = %base_url, error = %e, "Cannot build status request");
                return SyncOutcome::transport_failed(&e);
            }
        };

        debug!(
            endpoint = %request.endpoint,
            host = %request.host,
            payload = ?request.payload,
            "Sending status to instance"
        );

        match self.transport.post_status(&request).await {
            Ok(response) if response.is_success() => {
                info!(
                    endpoint = %request.endpoint,
                    status = response.status,
                    body = %response.body,
                    "Status published"
                );
                SyncOutcome::Delivered {
                    status: response.status,
                    body: response.body,
                }
            }
            Ok(response) => {
                warn!(
                    endpoint = %request.endpoint,
                    status = response.status,
                    body = %response.body,
                    "Instance rejected status"
                );
                SyncOutcome::Rejected {
                    status: response.status,
                    body: response.body,
                }
            }
            Err(e) => {
                error!(
                    endpoint = %request.endpoint,
                    kind = e.kind(),
                    error = %e,
                    "Status request failed"
                );
                SyncOutcome::transport_failed(&e)
            }
        }
    }
}

/// `host[:port]`, port omitted when it is the scheme default.
fn authority(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

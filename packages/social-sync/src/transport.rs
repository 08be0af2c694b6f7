//! `reqwest`-backed [`StatusTransport`].

use async_trait::async_trait;
use reqwest::redirect::Policy;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::{SyncConfig, DEFAULT_REQUEST_TIMEOUT, MAX_REDIRECTS};
use crate::error::{error_chain, TransportError, TransportResult};
use crate::traits::{StatusRequest, StatusTransport, TransportResponse};

/// Options for the HTTP client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportOptions {
    pub timeout: Duration,
    pub max_redirects: usize,
    /// Disable certificate and hostname checks. Insecure.
    pub accept_invalid_certs: bool,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_REQUEST_TIMEOUT,
            max_redirects: MAX_REDIRECTS,
            accept_invalid_certs: false,
        }
    }
}

impl TransportOptions {
    pub fn from_config(config: &SyncConfig) -> Self {
        Self {
            timeout: config.request_timeout,
            max_redirects: MAX_REDIRECTS,
            accept_invalid_certs: config.accept_invalid_certs,
        }
    }
}

/// HTTP/1.1 transport with a total timeout and a bounded redirect chain.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    options: TransportOptions,
}

impl ReqwestTransport {
    pub fn new(options: TransportOptions) -> TransportResult<Self> {
        if options.accept_invalid_certs {
            warn!("TLS certificate verification is disabled for the status API");
        }

        let client = reqwest::Client::builder()
            .timeout(options.timeout)
            .redirect(Policy::limited(options.max_redirects))
            .http1_only()
            .danger_accept_invalid_certs(options.accept_invalid_certs)
            .build()
            .map_err(|e| TransportError::Build(e.to_string()))?;

        Ok(Self { client, options })
    }

    pub fn from_config(config: &SyncConfig) -> TransportResult<Self> {
        Self::new(TransportOptions::from_config(config))
    }

    pub fn options(&self) -> &TransportOptions {
        &self.options
    }

    fn classify(&self, error: reqwest::Error) -> TransportError {
        if error.is_timeout() {
            TransportError::Timeout(self.options.timeout)
        } else if error.is_connect() {
            TransportError::Connect(error_chain(&error))
        } else if error.is_redirect() {
            TransportError::Redirect(error_chain(&error))
        } else {
            TransportError::Request(error_chain(&error))
        }
    }
}

#[async_trait]
impl StatusTransport for ReqwestTransport {
    async fn post_status(&self, request: &StatusRequest) -> TransportResult<TransportResponse> {
        let mut builder = self
            .client
            .post(request.endpoint.clone())
            .bearer_auth(request.bearer.expose());

        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }

        debug!(endpoint = %request.endpoint, "POST status");
        let response = builder
            .json(&request.payload)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| self.classify(e))?;

        Ok(TransportResponse { status, body })
    }
}

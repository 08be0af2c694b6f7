//! Sync configuration.
//!
//! A [`SyncConfig`] is loaded once per sync attempt and passed into the
//! orchestrator explicitly. It can come from the host's persisted plugin
//! settings ([`SyncConfig::from_settings`]) or from `SOCIAL_SYNC_*`
//! environment variables ([`SyncConfig::from_env`]).

use dotenvy::dotenv;
use std::collections::HashMap;
use std::env;
use std::time::Duration;
use tracing::warn;

use crate::error::{ConfigError, ConfigResult};
use crate::security::AccessToken;

/// Instance URL offered by the settings form before the user changes it.
pub const DEFAULT_INSTANCE_URL: &str = "https://social.sgcd.net";

/// Characters of body text used when a post has no precomputed summary.
pub const DEFAULT_SUMMARY_LENGTH: usize = 100;

/// Total time allowed for the status request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Redirect hops followed before giving up.
pub const MAX_REDIRECTS: usize = 10;

/// Settings keys as persisted by the host.
pub mod keys {
    pub const INSTANCE_URL: &str = "instance_url";
    pub const ACCESS_TOKEN: &str = "access_token";
    pub const SUMMARY_LENGTH: &str = "summary_length";
    pub const SITE_URL: &str = "site_url";
    pub const ACCEPT_INVALID_CERTS: &str = "accept_invalid_certs";
    pub const STRICT_STATUS: &str = "strict_status";
    pub const REQUEST_TIMEOUT_SECS: &str = "request_timeout_secs";
}

/// Configuration for one sync attempt.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Instance base URL, without trailing slash
    pub instance_url: String,

    /// Bearer token for the status API
    pub access_token: AccessToken,

    /// Upper bound, in characters, for summaries cut from the body
    pub summary_length: usize,

    /// Public base URL of the site, used for fallback permalinks
    pub site_url: String,

    /// Skip TLS certificate and hostname verification.
    ///
    /// Insecure. Only for instances with self-signed certificates.
    /// Default: false.
    pub accept_invalid_certs: bool,

    /// Report non-2xx responses as failures.
    ///
    /// When false, any completed HTTP exchange counts as a successful sync
    /// and only transport errors fail. Default: false.
    pub strict_status: bool,

    /// Total request timeout. Default: 30s.
    pub request_timeout: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            instance_url: DEFAULT_INSTANCE_URL.to_string(),
            access_token: AccessToken::empty(),
            summary_length: DEFAULT_SUMMARY_LENGTH,
            site_url: String::new(),
            accept_invalid_certs: false,
            strict_status: false,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl SyncConfig {
    pub fn new(instance_url: impl Into<String>, access_token: impl Into<AccessToken>) -> Self {
        Self {
            instance_url: normalize_base_url(&instance_url.into()),
            access_token: access_token.into(),
            ..Default::default()
        }
    }

    /// Set the summary length. Zero falls back to the default.
    pub fn with_summary_length(mut self, length: usize) -> Self {
        self.summary_length = if length == 0 {
            DEFAULT_SUMMARY_LENGTH
        } else {
            length
        };
        self
    }

    pub fn with_site_url(mut self, url: impl Into<String>) -> Self {
        self.site_url = normalize_base_url(&url.into());
        self
    }

    pub fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    pub fn with_strict_status(mut self, strict: bool) -> Self {
        self.strict_status = strict;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Build from the host's persisted key/value settings.
    ///
    /// Values are loose strings. Missing keys take their defaults; a
    /// non-numeric or zero `summary_length` falls back to 100.
    pub fn from_settings(settings: &HashMap<String, String>) -> Self {
        let get = |key: &str| settings.get(key).map(|v| v.trim());

        let summary_length = match get(keys::SUMMARY_LENGTH) {
            None | Some("") => DEFAULT_SUMMARY_LENGTH,
            Some(raw) => parse_summary_length(raw).unwrap_or_else(|_| {
                warn!(value = %raw, "Invalid summary_length setting, using default");
                DEFAULT_SUMMARY_LENGTH
            }),
        };

        let request_timeout = get(keys::REQUEST_TIMEOUT_SECS)
            .and_then(|raw| raw.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT);

        Self {
            instance_url: normalize_base_url(
                get(keys::INSTANCE_URL).unwrap_or(DEFAULT_INSTANCE_URL),
            ),
            access_token: AccessToken::new(get(keys::ACCESS_TOKEN).unwrap_or_default()),
            summary_length,
            site_url: normalize_base_url(get(keys::SITE_URL).unwrap_or_default()),
            accept_invalid_certs: get(keys::ACCEPT_INVALID_CERTS).is_some_and(parse_flag),
            strict_status: get(keys::STRICT_STATUS).is_some_and(parse_flag),
            request_timeout,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// `SOCIAL_SYNC_INSTANCE_URL` and `SOCIAL_SYNC_ACCESS_TOKEN` are
    /// required; the rest are optional.
    pub fn from_env() -> ConfigResult<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let instance_url = env::var("SOCIAL_SYNC_INSTANCE_URL")
            .map_err(|_| ConfigError::Missing("SOCIAL_SYNC_INSTANCE_URL"))?;
        let access_token = env::var("SOCIAL_SYNC_ACCESS_TOKEN")
            .map_err(|_| ConfigError::Missing("SOCIAL_SYNC_ACCESS_TOKEN"))?;

        let summary_length = match env::var("SOCIAL_SYNC_SUMMARY_LENGTH") {
            Ok(raw) => parse_summary_length(&raw)?,
            Err(_) => DEFAULT_SUMMARY_LENGTH,
        };

        let request_timeout = match env::var("SOCIAL_SYNC_REQUEST_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or(ConfigError::Invalid {
                    key: "SOCIAL_SYNC_REQUEST_TIMEOUT_SECS",
                    value: raw,
                })?,
            Err(_) => DEFAULT_REQUEST_TIMEOUT,
        };

        Ok(Self::new(instance_url, access_token)
            .with_summary_length(summary_length)
            .with_site_url(env::var("SOCIAL_SYNC_SITE_URL").unwrap_or_default())
            .with_accept_invalid_certs(
                env::var("SOCIAL_SYNC_ACCEPT_INVALID_CERTS").is_ok_and(|v| parse_flag(&v)),
            )
            .with_strict_status(env::var("SOCIAL_SYNC_STRICT_STATUS").is_ok_and(|v| parse_flag(&v)))
            .with_request_timeout(request_timeout))
    }

    /// Name of the first required setting that is empty, if any.
    pub fn missing_setting(&self) -> Option<&'static str> {
        if self.instance_url.is_empty() {
            Some(keys::INSTANCE_URL)
        } else if self.access_token.is_empty() {
            Some(keys::ACCESS_TOKEN)
        } else {
            None
        }
    }

    /// Both the instance URL and the access token are set.
    pub fn is_complete(&self) -> bool {
        self.missing_setting().is_none()
    }

    /// Full URL of the status-creation endpoint.
    pub fn statuses_endpoint(&self) -> String {
        statuses_endpoint(&self.instance_url)
    }
}

/// `<base>/api/v1/statuses`
pub fn statuses_endpoint(base_url: &str) -> String {
    format!("{}/api/v1/statuses", normalize_base_url(base_url))
}

/// Trim whitespace and trailing slashes.
pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn parse_summary_length(raw: &str) -> ConfigResult<usize> {
    raw.trim()
        .parse::<usize>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| ConfigError::Invalid {
            key: keys::SUMMARY_LENGTH,
            value: raw.to_string(),
        })
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

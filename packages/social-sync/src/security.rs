//! Access token handling.
//!
//! The instance token is wrapped in `secrecy::SecretBox` so that it never
//! shows up in `Debug` output, `Display` output or log fields.

use secrecy::{ExposeSecret, SecretBox};
use std::fmt;

/// Bearer token for the instance's status API.
pub struct AccessToken(SecretBox<str>);

impl AccessToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretBox::new(Box::from(value.into().trim())))
    }

    /// An empty token, which disables syncing.
    pub fn empty() -> Self {
        Self::new(String::new())
    }

    /// Expose the raw token. Only the transport should call this.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    pub fn is_empty(&self) -> bool {
        self.expose().is_empty()
    }
}

impl Default for AccessToken {
    fn default() -> Self {
        Self::empty()
    }
}

impl Clone for AccessToken {
    fn clone(&self) -> Self {
        Self::new(self.expose())
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_str("AccessToken(<empty>)")
        } else {
            f.write_str("AccessToken([REDACTED])")
        }
    }
}

impl fmt::Display for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl From<String> for AccessToken {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for AccessToken {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

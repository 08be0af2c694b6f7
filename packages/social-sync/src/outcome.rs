//! Outcome of a sync attempt.

use serde::Serialize;
use std::fmt;

use crate::error::{SyncError, TransportError};
use crate::types::{ContentType, PostId, Visibility};

/// Why a sync was skipped before any lookup or request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    NotAPost { content_type: ContentType },
    NotPublished { visibility: Visibility },
    IncompleteConfig { missing: &'static str },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotAPost { content_type } => {
                write!(f, "content type '{content_type}' is not a post")
            }
            SkipReason::NotPublished { visibility } => {
                write!(f, "visibility '{visibility}' is not publish")
            }
            SkipReason::IncompleteConfig { missing } => {
                write!(f, "configuration incomplete: {missing} is empty")
            }
        }
    }
}

/// Why the post or its permalink could not be found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum LookupFailure {
    PostNotFound { title: String },
    EmptyPermalink { post_id: PostId },
}

impl fmt::Display for LookupFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupFailure::PostNotFound { title } => {
                write!(f, "no published post titled {title:?}")
            }
            LookupFailure::EmptyPermalink { post_id } => {
                write!(f, "permalink for post {post_id} is empty")
            }
        }
    }
}

/// What happened on a sync attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// Instance accepted the status (2xx)
    Delivered { status: u16, body: String },

    /// Preconditions not met; no request was made
    Skipped(SkipReason),

    /// Post or permalink missing; no request was made
    LookupFailed(LookupFailure),

    /// The HTTP exchange did not complete
    TransportFailed { kind: &'static str, error: String },

    /// Instance answered with a non-2xx status
    Rejected { status: u16, body: String },

    /// Any other fault inside the pipeline
    Failed { error: String },
}

impl SyncOutcome {
    pub fn transport_failed(error: &TransportError) -> Self {
        SyncOutcome::TransportFailed {
            kind: error.kind(),
            error: error.to_string(),
        }
    }

    /// HTTP status of a completed exchange.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            SyncOutcome::Delivered { status, .. } | SyncOutcome::Rejected { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// Whether a request reached the instance and came back.
    pub fn exchange_completed(&self) -> bool {
        self.http_status().is_some()
    }

    /// Human-readable failure description, `None` for deliveries.
    pub fn error_message(&self) -> Option<String> {
        match self {
            SyncOutcome::Delivered { .. } => None,
            SyncOutcome::Skipped(reason) => Some(format!("skipped: {reason}")),
            SyncOutcome::LookupFailed(failure) => Some(format!("lookup failed: {failure}")),
            SyncOutcome::TransportFailed { error, .. } => Some(error.clone()),
            SyncOutcome::Rejected { status, body } => {
                Some(format!("instance rejected status (HTTP {status}): {body}"))
            }
            SyncOutcome::Failed { error } => Some(error.clone()),
        }
    }
}

impl From<SyncError> for SyncOutcome {
    fn from(error: SyncError) -> Self {
        match error {
            SyncError::PostNotFound { title } => {
                SyncOutcome::LookupFailed(LookupFailure::PostNotFound { title })
            }
            SyncError::EmptyPermalink { post_id } => {
                SyncOutcome::LookupFailed(LookupFailure::EmptyPermalink { post_id })
            }
            SyncError::Transport(e) => SyncOutcome::transport_failed(&e),
            other => SyncOutcome::Failed {
                error: other.to_string(),
            },
        }
    }
}

/// Flat result of one sync invocation, as reported to the host's log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncResult {
    pub succeeded: bool,
    pub http_status_code: Option<u16>,
    /// Present exactly when `succeeded` is false
    pub error_message: Option<String>,
    pub outcome: SyncOutcome,
}

impl SyncResult {
    /// Flatten an outcome.
    ///
    /// With `strict_status` off, a completed exchange counts as success
    /// even when the instance rejected the status; only transport-level
    /// failures fail.
    pub fn from_outcome(outcome: SyncOutcome, strict_status: bool) -> Self {
        let succeeded = match &outcome {
            SyncOutcome::Delivered { .. } => true,
            SyncOutcome::Rejected { .. } => !strict_status,
            _ => false,
        };

        Self {
            succeeded,
            http_status_code: outcome.http_status(),
            error_message: if succeeded {
                None
            } else {
                outcome.error_message()
            },
            outcome,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self.outcome, SyncOutcome::Skipped(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejected() -> SyncOutcome {
        SyncOutcome::Rejected {
            status: 422,
            body: r#"{"error":"Validation failed"}"#.into(),
        }
    }

    #[test]
    fn test_rejection_is_lenient_by_default() {
        let result = SyncResult::from_outcome(rejected(), false);

        assert!(result.succeeded);
        assert_eq!(result.http_status_code, Some(422));
        assert!(result.error_message.is_none());
    }

    #[test]
    fn test_rejection_fails_when_strict() {
        let result = SyncResult::from_outcome(rejected(), true);

        assert!(!result.succeeded);
        assert_eq!(result.http_status_code, Some(422));
        assert!(result.error_message.unwrap().contains("HTTP 422"));
    }

    #[test]
    fn test_transport_failure_has_no_status() {
        let outcome = SyncOutcome::transport_failed(&TransportError::Timeout(
            std::time::Duration::from_secs(30),
        ));
        let result = SyncResult::from_outcome(outcome, false);

        assert!(!result.succeeded);
        assert_eq!(result.http_status_code, None);
        assert!(result.error_message.unwrap().contains("timed out"));
    }

    #[test]
    fn test_skip_is_not_success() {
        let outcome = SyncOutcome::Skipped(SkipReason::IncompleteConfig {
            missing: "access_token",
        });
        let result = SyncResult::from_outcome(outcome, false);

        assert!(!result.succeeded);
        assert!(result.is_skipped());
        assert!(result.error_message.unwrap().contains("access_token"));
    }

    #[test]
    fn test_errors_map_to_outcomes() {
        let outcome: SyncOutcome = SyncError::PostNotFound {
            title: "Hello".into(),
        }
        .into();
        assert_eq!(
            outcome,
            SyncOutcome::LookupFailed(LookupFailure::PostNotFound {
                title: "Hello".into()
            })
        );

        let outcome: SyncOutcome =
            SyncError::Store(crate::error::StoreError::Unavailable("db down".into())).into();
        assert!(matches!(outcome, SyncOutcome::Failed { ref error } if error.contains("db down")));
    }

    #[test]
    fn test_outcome_serializes_tagged() {
        let value = serde_json::to_value(rejected()).unwrap();
        assert_eq!(value["outcome"], "rejected");
        assert_eq!(value["status"], 422);
    }
}

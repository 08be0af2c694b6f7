//! The publish-to-social sync routine.
//!
//! ```text
//! PublishEvent -> preconditions -> post lookup -> permalink + summary
//!              -> status text -> POST /api/v1/statuses -> SyncResult
//! ```
//!
//! `sync` never fails and never panics: every problem, including a panic
//! inside a host capability, ends in a log line and a [`SyncResult`]. A
//! failed sync must not affect the publish that triggered it.

use async_trait::async_trait;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use tracing::{error, info, warn};

use crate::client::SocialApiClient;
use crate::config::SyncConfig;
use crate::error::Result;
use crate::error::SyncError;
use crate::format::format_status;
use crate::outcome::{SkipReason, SyncOutcome, SyncResult};
use crate::permalink::PermalinkResolver;
use crate::summary::SummaryResolver;
use crate::traits::{PermalinkHost, PostStore, PublishHook};
use crate::types::{ContentType, PostQuery, PublishEvent, Visibility, SUMMARY_FIELD};

/// Runs the sync routine against a host's store and router.
///
/// # Example
///
/// ```rust,ignore
/// use social_sync::{MemoryPostStore, NoRouting, PublishEvent, SyncConfig, SyncOrchestrator};
///
/// let sync = SyncOrchestrator::new(store, NoRouting);
/// let config = SyncConfig::from_settings(&settings);
///
/// let result = sync.sync(&PublishEvent::published_post("Hello"), &config).await;
/// ```
pub struct SyncOrchestrator<S, H> {
    store: S,
    host: H,
    client: Option<SocialApiClient>,
    summaries: SummaryResolver,
}

impl<S: PostStore, H: PermalinkHost> SyncOrchestrator<S, H> {
    pub fn new(store: S, host: H) -> Self {
        Self {
            store,
            host,
            client: None,
            summaries: SummaryResolver::new(),
        }
    }

    /// Use this client instead of building one from the config per call.
    pub fn with_client(mut self, client: SocialApiClient) -> Self {
        self.client = Some(client);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Sync one publish event. Never returns an error.
    pub async fn sync(&self, event: &PublishEvent, config: &SyncConfig) -> SyncResult {
        info!(
            content_type = %event.content_type,
            visibility = %event.visibility,
            title = %event.title,
            "Social sync triggered"
        );

        let outcome = match check_preconditions(event, config) {
            Some(reason) => {
                info!(reason = %reason, "Social sync skipped");
                SyncOutcome::Skipped(reason)
            }
            None => match AssertUnwindSafe(self.run(event, config)).catch_unwind().await {
                Ok(Ok(outcome)) => outcome,
                Ok(Err(e)) => {
                    let outcome = SyncOutcome::from(e);
                    if let SyncOutcome::LookupFailed(failure) = &outcome {
                        warn!(title = %event.title, reason = %failure, "Social sync aborted");
                    } else {
                        error!(title = %event.title, error = ?outcome, "Social sync failed");
                    }
                    outcome
                }
                Err(panic_info) => {
                    let panic_msg = extract_panic_message(&panic_info);
                    error!(title = %event.title, panic = %panic_msg, "Social sync panicked");
                    SyncOutcome::Failed {
                        error: format!("sync panicked: {panic_msg}"),
                    }
                }
            },
        };

        let result = SyncResult::from_outcome(outcome, config.strict_status);
        info!(
            succeeded = result.succeeded,
            http_status = ?result.http_status_code,
            error = ?result.error_message,
            "Social sync finished"
        );
        result
    }

    async fn run(&self, event: &PublishEvent, config: &SyncConfig) -> Result<SyncOutcome> {
        let mut query = PostQuery::published_post(&event.title);
        if let Some(id) = event.post_id {
            query = query.with_id(id);
        }
        let mut record = self
            .store
            .find_latest(&query)
            .await?
            .ok_or_else(|| SyncError::PostNotFound {
                title: event.title.clone(),
            })?;

        if let Some(summary) = self.store.custom_field(record.id, SUMMARY_FIELD).await? {
            record.custom_fields.insert(SUMMARY_FIELD.to_string(), summary);
        }

        let permalink = PermalinkResolver::new(&self.host, &config.site_url).resolve(&record)?;
        let summary = self.summaries.resolve(&record, config.summary_length);
        let message = format_status(&event.title, &summary, &permalink);

        let built;
        let client = match &self.client {
            Some(client) => client,
            None => {
                built = SocialApiClient::from_config(config)?;
                &built
            }
        };

        Ok(client
            .send(&config.instance_url, &config.access_token, &message)
            .await)
    }
}

#[async_trait]
impl<S: PostStore, H: PermalinkHost> PublishHook for SyncOrchestrator<S, H> {
    async fn on_publish_finished(&self, event: &PublishEvent, config: &SyncConfig) {
        let _ = self.sync(event, config).await;
    }
}

/// Why `event` should not be synced under `config`, if anything.
pub fn check_preconditions(event: &PublishEvent, config: &SyncConfig) -> Option<SkipReason> {
    if event.content_type != ContentType::Post {
        return Some(SkipReason::NotAPost {
            content_type: event.content_type.clone(),
        });
    }
    if event.visibility != Visibility::Publish {
        return Some(SkipReason::NotPublished {
            visibility: event.visibility.clone(),
        });
    }
    config
        .missing_setting()
        .map(|missing| SkipReason::IncompleteConfig { missing })
}

fn extract_panic_message(panic_info: &Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockPermalinkHost, MockPostStore, MockStoreCall, MockTransport};
    use crate::types::{PostId, PostRecord};
    use std::sync::Arc;

    fn config() -> SyncConfig {
        SyncConfig::new("https://social.example.org", "tok").with_site_url("https://blog.example")
    }

    fn orchestrator(
        store: MockPostStore,
    ) -> (
        SyncOrchestrator<Arc<MockPostStore>, MockPermalinkHost>,
        Arc<MockPostStore>,
        Arc<MockTransport>,
    ) {
        let store = Arc::new(store);
        let transport = Arc::new(MockTransport::new());
        let sync = SyncOrchestrator::new(store.clone(), MockPermalinkHost::new())
            .with_client(SocialApiClient::new(transport.clone()));
        (sync, store, transport)
    }

    #[test]
    fn test_preconditions() {
        let config = config();
        let post = PublishEvent::published_post("Hello");

        assert_eq!(check_preconditions(&post, &config), None);
        assert!(matches!(
            check_preconditions(&post.clone().with_content_type("page"), &config),
            Some(SkipReason::NotAPost { .. })
        ));
        assert!(matches!(
            check_preconditions(&post.clone().with_visibility("draft"), &config),
            Some(SkipReason::NotPublished { .. })
        ));

        let mut no_url = config.clone();
        no_url.instance_url.clear();
        assert_eq!(
            check_preconditions(&post, &no_url),
            Some(SkipReason::IncompleteConfig {
                missing: "instance_url"
            })
        );
    }

    #[tokio::test]
    async fn test_skip_touches_nothing() {
        let (sync, store, transport) =
            orchestrator(MockPostStore::new().with_post(PostRecord::new(1, "Hello", "x")));

        let event = PublishEvent::published_post("Hello").with_visibility("private");
        let result = sync.sync(&event, &config()).await;

        assert!(result.is_skipped());
        assert!(!result.succeeded);
        assert!(store.calls().is_empty());
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_lookup_uses_title_and_summary_field() {
        let (sync, store, transport) = orchestrator(
            MockPostStore::new().with_post(PostRecord::new(3, "Hello", "<p>World</p>")),
        );

        let result = sync.sync(&PublishEvent::published_post("Hello"), &config()).await;

        assert!(result.succeeded);
        assert_eq!(
            store.calls(),
            vec![
                MockStoreCall::FindLatest {
                    title: "Hello".into()
                },
                MockStoreCall::CustomField {
                    id: PostId(3),
                    name: "summary".into()
                },
            ]
        );
        let request = transport.last_request().unwrap();
        assert!(request
            .payload
            .status
            .ends_with("https://blog.example/index.php/archives/3"));
    }

    #[tokio::test]
    async fn test_missing_post_is_lookup_failure() {
        let (sync, _store, transport) = orchestrator(MockPostStore::new());

        let result = sync.sync(&PublishEvent::published_post("Ghost"), &config()).await;

        assert!(!result.succeeded);
        assert!(matches!(result.outcome, SyncOutcome::LookupFailed(_)));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_store_failure_is_contained() {
        let (sync, _store, transport) = orchestrator(MockPostStore::new().failing("db down"));

        let result = sync.sync(&PublishEvent::published_post("Hello"), &config()).await;

        assert!(!result.succeeded);
        assert!(matches!(result.outcome, SyncOutcome::Failed { .. }));
        assert!(result.error_message.unwrap().contains("db down"));
        assert_eq!(transport.call_count(), 0);
    }

    struct PanickingHost;

    impl PermalinkHost for PanickingHost {
        fn primary_permalink(&self, _record: &PostRecord) -> Option<String> {
            panic!("widget exploded");
        }

        fn route_permalink(&self, _route: &str, _record: &PostRecord) -> Option<String> {
            None
        }
    }

    #[tokio::test]
    async fn test_host_panic_becomes_failed_result() {
        let transport = Arc::new(MockTransport::new());
        let sync = SyncOrchestrator::new(
            MockPostStore::new().with_post(PostRecord::new(1, "Hello", "<p>World</p>")),
            PanickingHost,
        )
        .with_client(SocialApiClient::new(transport.clone()));

        let result = sync.sync(&PublishEvent::published_post("Hello"), &config()).await;

        assert!(!result.succeeded);
        assert!(matches!(result.outcome, SyncOutcome::Failed { .. }));
        assert!(result.error_message.unwrap().contains("widget exploded"));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_hook_survives_host_panic() {
        let sync = SyncOrchestrator::new(
            MockPostStore::new().with_post(PostRecord::new(1, "Hello", "<p>World</p>")),
            PanickingHost,
        )
        .with_client(SocialApiClient::new(Arc::new(MockTransport::new())));

        let handle = tokio::spawn(async move {
            sync.on_publish_finished(&PublishEvent::published_post("Hello"), &config())
                .await;
        });

        assert!(handle.await.is_ok());
    }

    #[tokio::test]
    async fn test_post_id_narrows_lookup() {
        let (sync, _store, transport) = orchestrator(
            MockPostStore::new()
                .with_post(PostRecord::new(1, "Hello", "<p>first</p>"))
                .with_post(PostRecord::new(2, "Hello", "<p>second</p>")),
        );

        let event = PublishEvent::published_post("Hello").with_post_id(1);
        let result = sync.sync(&event, &config()).await;

        assert!(result.succeeded);
        assert!(transport
            .last_request()
            .unwrap()
            .payload
            .status
            .ends_with("https://blog.example/index.php/archives/1"));
    }

    #[tokio::test]
    async fn test_hook_swallows_result() {
        let (sync, _store, transport) = orchestrator(
            MockPostStore::new().with_post(PostRecord::new(1, "Hello", "<p>World</p>")),
        );

        sync.on_publish_finished(&PublishEvent::published_post("Hello"), &config())
            .await;

        assert_eq!(transport.call_count(), 1);
    }
}

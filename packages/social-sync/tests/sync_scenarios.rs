//! End-to-end sync scenarios against mock host capabilities.
//!
//! Each test wires a `SyncOrchestrator` to an in-memory store, a mock
//! permalink host and a recording transport, then checks both the
//! returned `SyncResult` and what (if anything) went over the wire.

use std::sync::Arc;
use std::time::Duration;

use social_sync::testing::{MockPermalinkHost, MockPostStore, MockTransport};
use social_sync::{
    PostRecord, PublishEvent, SocialApiClient, SyncConfig, SyncOrchestrator, SyncOutcome,
    TransportError, TransportResponse,
};

/// Helper to build an orchestrator around a recording transport.
fn setup(
    posts: Vec<PostRecord>,
    transport: MockTransport,
) -> (
    SyncOrchestrator<MockPostStore, MockPermalinkHost>,
    Arc<MockTransport>,
) {
    let store = posts
        .into_iter()
        .fold(MockPostStore::new(), |store, post| store.with_post(post));
    let transport = Arc::new(transport);
    let host = MockPermalinkHost::new().with_primary("https://blog.example/archives/1/");

    let sync = SyncOrchestrator::new(store, host)
        .with_client(SocialApiClient::new(transport.clone()));
    (sync, transport)
}

fn config() -> SyncConfig {
    SyncConfig::new("https://social.example.org", "tok-abc")
        .with_site_url("https://blog.example")
        .with_summary_length(5)
}

#[tokio::test]
async fn test_body_excerpt_is_posted() {
    let (sync, transport) = setup(
        vec![PostRecord::new(1, "Hello", "<p>World</p>")],
        MockTransport::new(),
    );

    let result = sync.sync(&PublishEvent::published_post("Hello"), &config()).await;

    assert!(result.succeeded);
    assert_eq!(result.http_status_code, Some(200));

    let request = transport.last_request().unwrap();
    let text = &request.payload.status;
    assert!(text.contains("## Hello"));
    assert!(text.contains("\n\nWorld\n\n"));
    assert!(text.ends_with("🔗 阅读全文: https://blog.example/archives/1/"));
    assert_eq!(request.payload.visibility, "public");
    assert_eq!(request.payload.content_type, "text/markdown");
    assert_eq!(
        request.endpoint.as_str(),
        "https://social.example.org/api/v1/statuses"
    );
    assert_eq!(request.bearer.expose(), "tok-abc");
}

#[tokio::test]
async fn test_precomputed_summary_is_not_truncated() {
    let (sync, transport) = setup(
        vec![PostRecord::new(1, "Hello", "<p>World and more</p>")
            .with_field("summary", "Precomputed text")],
        MockTransport::new(),
    );

    let result = sync.sync(&PublishEvent::published_post("Hello"), &config()).await;

    assert!(result.succeeded);
    let text = transport.last_request().unwrap().payload.status;
    assert!(text.contains("\n\nPrecomputed text\n\n"));
    assert!(!text.contains("World"));
}

#[tokio::test]
async fn test_empty_token_sends_nothing() {
    let (sync, transport) = setup(
        vec![PostRecord::new(1, "Hello", "<p>World</p>")],
        MockTransport::new(),
    );
    let mut config = config();
    config.access_token = "".into();

    let result = sync.sync(&PublishEvent::published_post("Hello"), &config).await;

    assert!(!result.succeeded);
    assert!(result.is_skipped());
    assert_eq!(result.http_status_code, None);
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn test_empty_instance_url_sends_nothing() {
    let (sync, transport) = setup(
        vec![PostRecord::new(1, "Hello", "<p>World</p>")],
        MockTransport::new(),
    );
    let mut config = config();
    config.instance_url.clear();

    let result = sync.sync(&PublishEvent::published_post("Hello"), &config).await;

    assert!(!result.succeeded);
    assert!(result.is_skipped());
    assert_eq!(result.http_status_code, None);
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn test_wrong_type_or_visibility_sends_nothing() {
    let (sync, transport) = setup(
        vec![PostRecord::new(1, "Hello", "<p>World</p>")],
        MockTransport::new(),
    );

    for event in [
        PublishEvent::published_post("Hello").with_content_type("page"),
        PublishEvent::published_post("Hello").with_visibility("draft"),
        PublishEvent::published_post("Hello").with_visibility("password"),
    ] {
        let result = sync.sync(&event, &config()).await;
        assert!(result.is_skipped(), "event = {event:?}");
    }

    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn test_timeout_fails_without_status_code() {
    let (sync, transport) = setup(
        vec![PostRecord::new(1, "Hello", "<p>World</p>")],
        MockTransport::new().with_error(TransportError::Timeout(Duration::from_secs(30))),
    );

    let result = sync.sync(&PublishEvent::published_post("Hello"), &config()).await;

    assert!(!result.succeeded);
    assert_eq!(result.http_status_code, None);
    assert!(result.error_message.unwrap().contains("timed out"));
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test]
async fn test_rejection_is_lenient_by_default() {
    let (sync, transport) = setup(
        vec![PostRecord::new(1, "Hello", "<p>World</p>")],
        MockTransport::new().with_response(TransportResponse::new(
            422,
            r#"{"error":"Validation failed: Text can't be blank"}"#,
        )),
    );

    let result = sync.sync(&PublishEvent::published_post("Hello"), &config()).await;

    assert!(result.succeeded);
    assert_eq!(result.http_status_code, Some(422));
    assert!(matches!(result.outcome, SyncOutcome::Rejected { status: 422, .. }));
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test]
async fn test_rejection_fails_in_strict_mode() {
    let (sync, _transport) = setup(
        vec![PostRecord::new(1, "Hello", "<p>World</p>")],
        MockTransport::new().with_response(TransportResponse::new(422, "nope")),
    );
    let config = config().with_strict_status(true);

    let result = sync.sync(&PublishEvent::published_post("Hello"), &config).await;

    assert!(!result.succeeded);
    assert_eq!(result.http_status_code, Some(422));
    assert!(result.error_message.unwrap().contains("HTTP 422"));
}

#[tokio::test]
async fn test_one_request_per_sync() {
    let (sync, transport) = setup(
        vec![PostRecord::new(1, "Hello", "<p>World</p>")],
        MockTransport::new().with_response(TransportResponse::new(503, "busy")),
    );

    let result = sync.sync(&PublishEvent::published_post("Hello"), &config()).await;

    assert_eq!(result.http_status_code, Some(503));
    assert_eq!(transport.call_count(), 1);
}

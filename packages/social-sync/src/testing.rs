//! Testing utilities including mock implementations.
//!
//! Useful for exercising the sync routine without a CMS, a database or
//! a live instance.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::error::{StoreError, StoreResult, TransportError, TransportResult};
use crate::stores::MemoryPostStore;
use crate::traits::{
    PermalinkHost, PostStore, StatusRequest, StatusTransport, TransportResponse,
};
use crate::types::{PostId, PostQuery, PostRecord};

// =============================================================================
// Mock Transport
// =============================================================================

/// A transport that records requests and replays queued replies.
///
/// With nothing queued it answers `200 {}`.
#[derive(Default)]
pub struct MockTransport {
    replies: Mutex<Vec<TransportResult<TransportResponse>>>,
    requests: Mutex<Vec<StatusRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a completed exchange.
    pub fn with_response(self, response: TransportResponse) -> Self {
        self.replies.lock().unwrap().push(Ok(response));
        self
    }

    /// Queue a transport failure.
    pub fn with_error(self, error: TransportError) -> Self {
        self.replies.lock().unwrap().push(Err(error));
        self
    }

    /// Number of requests sent.
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// All requests sent, in order.
    pub fn requests(&self) -> Vec<StatusRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// The most recent request, if any.
    pub fn last_request(&self) -> Option<StatusRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl StatusTransport for MockTransport {
    async fn post_status(&self, request: &StatusRequest) -> TransportResult<TransportResponse> {
        self.requests.lock().unwrap().push(request.clone());

        let mut replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            Ok(TransportResponse::new(200, "{}"))
        } else {
            replies.remove(0)
        }
    }
}

// =============================================================================
// Mock Permalink Host
// =============================================================================

/// A permalink host with fixed answers.
#[derive(Default)]
pub struct MockPermalinkHost {
    primary: Option<String>,
    route: Option<String>,
    route_calls: Mutex<Vec<String>>,
}

impl MockPermalinkHost {
    /// A host that knows no permalinks and no routes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every primary permalink request with `url`.
    pub fn with_primary(mut self, url: impl Into<String>) -> Self {
        self.primary = Some(url.into());
        self
    }

    /// Register the `post` route, answering with `url`.
    pub fn with_route(mut self, url: impl Into<String>) -> Self {
        self.route = Some(url.into());
        self
    }

    /// Route names asked for, in order.
    pub fn route_calls(&self) -> Vec<String> {
        self.route_calls.lock().unwrap().clone()
    }
}

impl PermalinkHost for MockPermalinkHost {
    fn primary_permalink(&self, _record: &PostRecord) -> Option<String> {
        self.primary.clone()
    }

    fn route_permalink(&self, route: &str, _record: &PostRecord) -> Option<String> {
        self.route_calls.lock().unwrap().push(route.to_string());
        if route == crate::permalink::POST_ROUTE {
            self.route.clone()
        } else {
            None
        }
    }
}

// =============================================================================
// Mock Post Store
// =============================================================================

/// Record of a call made to the mock store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockStoreCall {
    FindLatest { title: String },
    CustomField { id: PostId, name: String },
}

/// An in-memory store that records calls and can be made to fail.
#[derive(Default)]
pub struct MockPostStore {
    inner: MemoryPostStore,
    fail_with: Option<String>,
    calls: Arc<Mutex<Vec<MockStoreCall>>>,
}

impl MockPostStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a post.
    pub fn with_post(self, record: PostRecord) -> Self {
        self.inner.insert(record);
        self
    }

    /// Make every read fail with `StoreError::Unavailable`.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.fail_with = Some(message.into());
        self
    }

    pub fn calls(&self) -> Vec<MockStoreCall> {
        self.calls.lock().unwrap().clone()
    }

    fn check(&self) -> StoreResult<()> {
        match &self.fail_with {
            Some(message) => Err(StoreError::Unavailable(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PostStore for MockPostStore {
    async fn find_latest(&self, query: &PostQuery) -> StoreResult<Option<PostRecord>> {
        self.calls.lock().unwrap().push(MockStoreCall::FindLatest {
            title: query.title.clone(),
        });
        self.check()?;
        self.inner.find_latest(query).await
    }

    async fn custom_field(&self, id: PostId, name: &str) -> StoreResult<Option<String>> {
        self.calls.lock().unwrap().push(MockStoreCall::CustomField {
            id,
            name: name.to_string(),
        });
        self.check()?;
        self.inner.custom_field(id, name).await
    }
}

//! Read-only access to the host's post storage.

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::types::{PostId, PostQuery, PostRecord};

/// Read interface over the host's content store.
///
/// Implementations must never write. The sync routine holds no
/// connection beyond a single call.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Most recently created post matching the query, if any.
    async fn find_latest(&self, query: &PostQuery) -> StoreResult<Option<PostRecord>>;

    /// Value of a named custom field on a post.
    async fn custom_field(&self, id: PostId, name: &str) -> StoreResult<Option<String>>;
}

#[async_trait]
impl<T: PostStore + ?Sized> PostStore for std::sync::Arc<T> {
    async fn find_latest(&self, query: &PostQuery) -> StoreResult<Option<PostRecord>> {
        (**self).find_latest(query).await
    }

    async fn custom_field(&self, id: PostId, name: &str) -> StoreResult<Option<String>> {
        (**self).custom_field(id, name).await
    }
}

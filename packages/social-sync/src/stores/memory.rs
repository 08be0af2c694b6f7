//! In-memory post store for testing and development.

use async_trait::async_trait;
use std::sync::RwLock;

use crate::error::StoreResult;
use crate::traits::PostStore;
use crate::types::{PostId, PostQuery, PostRecord};

/// Posts held in memory.
///
/// Not suitable for production as data is lost on restart.
#[derive(Default)]
pub struct MemoryPostStore {
    posts: RwLock<Vec<PostRecord>>,
}

impl MemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a post. A post with the same id is replaced.
    pub fn insert(&self, record: PostRecord) {
        let mut posts = self.posts.write().unwrap();
        posts.retain(|p| p.id != record.id);
        posts.push(record);
    }

    pub fn with_post(self, record: PostRecord) -> Self {
        self.insert(record);
        self
    }

    pub fn len(&self) -> usize {
        self.posts.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl PostStore for MemoryPostStore {
    async fn find_latest(&self, query: &PostQuery) -> StoreResult<Option<PostRecord>> {
        let posts = self.posts.read().unwrap();
        Ok(posts
            .iter()
            .filter(|p| query.matches(p))
            .max_by_key(|p| p.created_at)
            .cloned())
    }

    async fn custom_field(&self, id: PostId, name: &str) -> StoreResult<Option<String>> {
        let posts = self.posts.read().unwrap();
        Ok(posts
            .iter()
            .find(|p| p.id == id)
            .and_then(|p| p.custom_fields.get(name).cloned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn test_newest_matching_post_wins() {
        let now = Utc::now();
        let store = MemoryPostStore::new()
            .with_post(PostRecord::new(1, "Hello", "old").with_created_at(now - Duration::days(2)))
            .with_post(PostRecord::new(2, "Hello", "new").with_created_at(now))
            .with_post(
                PostRecord::new(3, "Hello", "draft")
                    .with_created_at(now + Duration::days(1))
                    .with_status("draft"),
            )
            .with_post(
                PostRecord::new(4, "Hello", "page")
                    .with_created_at(now + Duration::days(1))
                    .with_content_type("page"),
            );

        let found = store
            .find_latest(&PostQuery::published_post("Hello"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(found.id, PostId(2));
    }

    #[tokio::test]
    async fn test_missing_post() {
        let store = MemoryPostStore::new().with_post(PostRecord::new(1, "Hello", "x"));
        let found = store
            .find_latest(&PostQuery::published_post("Goodbye"))
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_custom_field() {
        let store = MemoryPostStore::new()
            .with_post(PostRecord::new(1, "Hello", "x").with_field("summary", "Short"));

        assert_eq!(
            store.custom_field(PostId(1), "summary").await.unwrap(),
            Some("Short".to_string())
        );
        assert_eq!(store.custom_field(PostId(1), "other").await.unwrap(), None);
        assert_eq!(store.custom_field(PostId(9), "summary").await.unwrap(), None);
    }

    #[test]
    fn test_insert_replaces_same_id() {
        let store = MemoryPostStore::new();
        store.insert(PostRecord::new(1, "a", "x"));
        store.insert(PostRecord::new(1, "b", "y"));
        assert_eq!(store.len(), 1);
    }
}

//! Published post collection with change notification.

use super::model::Post;
use std::sync::Arc;
use tokio::sync::watch;

/// Shared, immutable snapshot of the post collection.
pub type PostCollection = Arc<[Post]>;

/// Owner of the current post collection.
///
/// The collection is swapped wholesale on `replace`; readers hold an `Arc`
/// snapshot and never see a half-written list. Subscribers get a
/// `watch::Receiver` that is marked changed on every replacement.
pub struct PostStore {
    tx: watch::Sender<PostCollection>,
}

impl PostStore {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(PostCollection::from(Vec::new()));
        Self { tx }
    }

    /// Current collection. O(1): clones the `Arc`, not the posts.
    pub fn snapshot(&self) -> PostCollection {
        self.tx.borrow().clone()
    }

    /// Install a new collection and notify subscribers.
    ///
    /// Works with zero subscribers; the value is stored either way.
    pub fn replace(&self, posts: Vec<Post>) {
        let count = posts.len();
        self.tx.send_replace(PostCollection::from(posts));
        tracing::debug!(
            count,
            subscribers = self.tx.receiver_count(),
            "Post collection replaced"
        );
    }

    /// Register an observer of collection replacements.
    pub fn subscribe(&self) -> watch::Receiver<PostCollection> {
        self.tx.subscribe()
    }

    pub fn len(&self) -> usize {
        self.tx.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tx.borrow().is_empty()
    }
}

impl Default for PostStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: i64) -> Post {
        Post {
            author_id: 1,
            id,
            title: format!("t{}", id),
            body: String::new(),
        }
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = PostStore::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn test_replace_without_subscribers_stores_value() {
        let store = PostStore::new();
        store.replace(vec![post(1), post(2)]);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_replace_discards_previous_collection() {
        let store = PostStore::new();
        store.replace(vec![post(1), post(2), post(3)]);
        store.replace(vec![post(7)]);
        let ids: Vec<i64> = store.snapshot().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![7]);
    }

    #[test]
    fn test_old_snapshot_unaffected_by_replace() {
        let store = PostStore::new();
        store.replace(vec![post(1)]);
        let before = store.snapshot();
        store.replace(vec![post(2), post(3)]);
        assert_eq!(before.len(), 1);
        assert_eq!(before[0].id, 1);
    }

    #[tokio::test]
    async fn test_subscriber_notified_on_replace() {
        let store = PostStore::new();
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().unwrap());

        store.replace(vec![post(5)]);

        rx.changed().await.unwrap();
        let seen = rx.borrow_and_update().clone();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].id, 5);
        assert!(!rx.has_changed().unwrap());
    }
}

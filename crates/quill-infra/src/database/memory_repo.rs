//! In-memory post repository - used when no database is configured.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use quill_core::domain::Post;
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, PostRepository};

struct Store {
    posts: BTreeMap<i32, Post>,
    next_id: i32,
}

/// Post repository backed by an ordered map behind an async RwLock.
///
/// Follows the same save rules as the PostgreSQL repository.
/// Note: Data is lost on process restart.
pub struct InMemoryPostRepository {
    store: RwLock<Store>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(Store {
                posts: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for InMemoryPostRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<Post, i32> for InMemoryPostRepository {
    async fn find_all(&self) -> Result<Vec<Post>, RepoError> {
        let store = self.store.read().await;
        Ok(store.posts.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Post>, RepoError> {
        let store = self.store.read().await;
        Ok(store.posts.get(&id).cloned())
    }

    async fn save(&self, mut post: Post) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;

        let id = match post.id {
            Some(id) => match store.posts.get(&id) {
                Some(current) if current.version != post.version => {
                    return Err(RepoError::StaleVersion {
                        id,
                        expected: post.version,
                        found: current.version,
                    });
                }
                Some(_) => id,
                None => {
                    post.version = None;
                    id
                }
            },
            None => {
                post.version = None;

                // Skip ids callers already claimed.
                let mut candidate = store.next_id;
                while store.posts.contains_key(&candidate) {
                    candidate = candidate
                        .checked_add(1)
                        .ok_or_else(|| RepoError::Constraint("post id space exhausted".to_string()))?;
                }
                candidate
            }
        };

        store.next_id = store.next_id.max(id.saturating_add(1));
        post.id = Some(id);
        store.posts.insert(id, post.clone());

        tracing::debug!(post_id = id, "Saved post in memory");
        Ok(post)
    }

    async fn delete_by_id(&self, id: i32) -> Result<(), RepoError> {
        let mut store = self.store.write().await;
        store.posts.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_by_title(&self, title: &str) -> Result<Vec<Post>, RepoError> {
        let store = self.store.read().await;
        Ok(store
            .posts
            .values()
            .filter(|post| post.title == title)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: i32, user_id: i32, title: &str) -> Post {
        Post::new(Some(id), user_id, title, "This is a test case.")
    }

    #[tokio::test]
    async fn test_find_by_title_is_exact() {
        let repo = InMemoryPostRepository::new();
        repo.save(post(1, 1, "Hello, new world.")).await.unwrap();
        repo.save(post(2, 2, "Hello, new world.")).await.unwrap();
        repo.save(post(3, 2, "Hello, new world.")).await.unwrap();
        repo.save(post(4, 3, "Hello, new world. Good for sharing"))
            .await
            .unwrap();

        let found = repo.find_by_title("Hello, new world.").await.unwrap();

        assert_eq!(found.len(), 3);
        assert!(found.iter().all(|p| p.title == "Hello, new world."));
    }

    #[tokio::test]
    async fn test_save_assigns_ids_after_caller_ids() {
        let repo = InMemoryPostRepository::new();
        repo.save(post(1, 1, "first")).await.unwrap();
        repo.save(post(5, 1, "fifth")).await.unwrap();

        let saved = repo
            .save(Post::new(None, 1, "next", "body"))
            .await
            .unwrap();

        assert_eq!(saved.id, Some(6));
    }

    #[tokio::test]
    async fn test_save_updates_existing_id() {
        let repo = InMemoryPostRepository::new();
        repo.save(post(1, 1, "before")).await.unwrap();

        let updated = repo.save(post(1, 1, "after")).await.unwrap();

        assert_eq!(updated.title, "after");
        assert_eq!(repo.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_save_rejects_stale_version() {
        let repo = InMemoryPostRepository::new();
        repo.save(post(1, 1, "versioned")).await.unwrap();

        let mut stale = post(1, 1, "stale write");
        stale.version = Some(1);
        let err = repo.save(stale).await.unwrap_err();

        assert!(matches!(
            err,
            RepoError::StaleVersion {
                id: 1,
                expected: Some(1),
                found: None
            }
        ));
        assert_eq!(repo.find_by_id(1).await.unwrap().unwrap().title, "versioned");
    }

    #[tokio::test]
    async fn test_insert_drops_caller_version() {
        let repo = InMemoryPostRepository::new();

        let mut fresh = Post::new(None, 1, "fresh", "body");
        fresh.version = Some(7);
        let saved = repo.save(fresh).await.unwrap();
        assert_eq!(saved.version, None);

        let mut chosen = post(9, 1, "chosen id");
        chosen.version = Some(3);
        repo.save(chosen).await.unwrap();
        assert_eq!(repo.find_by_id(9).await.unwrap().unwrap().version, None);
    }

    #[tokio::test]
    async fn test_exhausted_id_space_is_an_error() {
        let repo = InMemoryPostRepository::new();
        repo.save(post(i32::MAX, 1, "last")).await.unwrap();

        let err = repo
            .save(Post::new(None, 1, "one too many", "body"))
            .await
            .unwrap_err();

        assert!(matches!(err, RepoError::Constraint(_)));
        assert_eq!(repo.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_missing_id_is_noop() {
        let repo = InMemoryPostRepository::new();
        repo.save(post(1, 1, "keep")).await.unwrap();

        repo.delete_by_id(42).await.unwrap();
        repo.delete_by_id(1).await.unwrap();

        assert!(repo.find_by_id(1).await.unwrap().is_none());
    }
}

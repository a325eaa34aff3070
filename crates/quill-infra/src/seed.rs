//! Startup seeding from a JSON document of posts.

use std::path::Path;

use thiserror::Error;

use quill_core::domain::Post;
use quill_core::error::{DomainError, RepoError};
use quill_core::ports::{BaseRepository, PostRepository};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse seed file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid post at index {index}: {source}")]
    Invalid { index: usize, source: DomainError },

    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Load the posts in `path` into `repo` when the repository is empty.
///
/// Returns how many posts were saved. A repository that already holds
/// posts is left alone and the file is not read.
pub async fn seed_posts(repo: &dyn PostRepository, path: &Path) -> Result<usize, SeedError> {
    if !repo.find_all().await?.is_empty() {
        tracing::debug!("Posts already present, skipping seed");
        return Ok(0);
    }

    let raw = tokio::fs::read(path).await?;
    let posts: Vec<Post> = serde_json::from_slice(&raw)?;

    for (index, post) in posts.iter().enumerate() {
        post.ensure_valid()
            .map_err(|source| SeedError::Invalid { index, source })?;
    }

    let count = posts.len();
    for post in posts {
        repo.save(post).await?;
    }

    tracing::info!(count, path = %path.display(), "Seeded posts");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::InMemoryPostRepository;

    fn seed_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    const POSTS: &str = r#"[
        {"id": 1, "userId": 1, "title": "Hello world", "body": "This is my first post.", "version": null},
        {"id": 2, "userId": 1, "title": "New Post Again!", "body": "This is my second post."}
    ]"#;

    #[tokio::test]
    async fn test_seeds_empty_repository() {
        let repo = InMemoryPostRepository::new();
        let file = seed_file(POSTS);

        let count = seed_posts(&repo, file.path()).await.unwrap();

        assert_eq!(count, 2);
        let second = repo.find_by_id(2).await.unwrap().unwrap();
        assert_eq!(second.title, "New Post Again!");
    }

    #[tokio::test]
    async fn test_skips_populated_repository() {
        let repo = InMemoryPostRepository::new();
        repo.save(Post::new(Some(9), 1, "Existing", "Already here"))
            .await
            .unwrap();

        let count = seed_posts(&repo, Path::new("/does/not/exist.json"))
            .await
            .unwrap();

        assert_eq!(count, 0);
        assert_eq!(repo.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_rejects_invalid_post_before_saving() {
        let repo = InMemoryPostRepository::new();
        let file = seed_file(
            r#"[
                {"id": 1, "userId": 1, "title": "Fine", "body": "Fine"},
                {"id": 2, "userId": 1, "title": "", "body": "No title"}
            ]"#,
        );

        let err = seed_posts(&repo, file.path()).await.unwrap_err();

        assert!(matches!(err, SeedError::Invalid { index: 1, .. }));
        assert!(repo.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let repo = InMemoryPostRepository::new();

        let err = seed_posts(&repo, Path::new("/does/not/exist.json"))
            .await
            .unwrap_err();

        assert!(matches!(err, SeedError::Io(_)));
    }
}

//! Application state - built once at startup and shared by every handler.

use std::sync::Arc;

use quill_core::error::RepoError;
use quill_core::ports::PostRepository;
use quill_infra::InMemoryPostRepository;
use quill_infra::seed::{SeedError, seed_posts};

#[cfg(feature = "postgres")]
use migration::{Migrator, MigratorTrait};
#[cfg(feature = "postgres")]
use quill_infra::{DatabaseConnections, PostgresPostRepository};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostRepository>,
    /// Same repository as `posts` when it is database-backed.
    #[cfg(feature = "postgres")]
    pub db: Option<Arc<PostgresPostRepository>>,
}

impl AppState {
    /// State over an arbitrary repository, without a database handle.
    pub fn with_repository(posts: Arc<dyn PostRepository>) -> Self {
        Self {
            posts,
            #[cfg(feature = "postgres")]
            db: None,
        }
    }

    /// State over a fresh in-memory repository.
    pub fn in_memory() -> Self {
        Self::with_repository(Arc::new(InMemoryPostRepository::new()))
    }

    /// Build the application state with the configured storage, then seed it.
    pub async fn new(config: &AppConfig) -> Self {
        let state = Self::connect(config).await;

        if let Some(path) = &config.seed_path {
            match seed_posts(state.posts.as_ref(), path).await {
                Ok(_) => {}
                Err(SeedError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                    tracing::warn!(path = %path.display(), "Seed file not found, starting without seed data");
                }
                Err(e) => tracing::error!("Failed to seed posts: {}", e),
            }
        }

        tracing::info!(storage = state.storage(), "Application state initialized");
        state
    }

    /// Name of the backing store, reported by the health check.
    #[cfg(feature = "postgres")]
    pub fn storage(&self) -> &'static str {
        if self.db.is_some() { "postgres" } else { "memory" }
    }

    #[cfg(not(feature = "postgres"))]
    pub fn storage(&self) -> &'static str {
        "memory"
    }

    /// Check that the backing store answers. Memory storage always does.
    #[cfg(feature = "postgres")]
    pub async fn ping(&self) -> Result<(), RepoError> {
        match &self.db {
            Some(db) => db.ping().await,
            None => Ok(()),
        }
    }

    #[cfg(not(feature = "postgres"))]
    pub async fn ping(&self) -> Result<(), RepoError> {
        Ok(())
    }

    #[cfg(feature = "postgres")]
    async fn connect(config: &AppConfig) -> Self {
        let Some(db_config) = &config.database else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return Self::in_memory();
        };

        let connections = match DatabaseConnections::init(db_config).await {
            Ok(connections) => connections,
            Err(e) => {
                tracing::error!("Failed to connect to database: {}. Using in-memory fallback.", e);
                return Self::in_memory();
            }
        };

        if config.run_migrations {
            if let Err(e) = Migrator::up(&connections.main, None).await {
                tracing::error!("Failed to apply migrations: {}. Using in-memory fallback.", e);
                return Self::in_memory();
            }
            tracing::info!("Migrations applied");
        }

        let db = Arc::new(PostgresPostRepository::new(connections.main));
        Self {
            posts: db.clone(),
            db: Some(db),
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn connect(_config: &AppConfig) -> Self {
        tracing::info!("Running without postgres feature - using in-memory repository");
        Self::in_memory()
    }
}

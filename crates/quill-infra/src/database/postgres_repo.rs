//! PostgreSQL post repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, DbBackend, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, Set, Statement, TransactionTrait,
};

use quill_core::domain::Post;
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, PostRepository};

use super::entity::post::{self, Entity as PostEntity};
use super::postgres_base::{PostgresBaseRepository, query_error};

/// Moves the serial sequence past ids that callers chose themselves.
const SYNC_ID_SEQUENCE: &str = "SELECT setval(pg_get_serial_sequence('posts', 'id'), \
     GREATEST((SELECT MAX(id) FROM posts), 1))";

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

impl PostgresPostRepository {
    async fn insert(
        &self,
        txn: &DatabaseTransaction,
        mut post: Post,
    ) -> Result<post::Model, RepoError> {
        // New rows start without a version.
        post.version = None;

        let caller_assigned = post.id.is_some();
        let active: post::ActiveModel = post.into();
        let model = active.insert(txn).await.map_err(query_error)?;

        if caller_assigned {
            txn.execute(Statement::from_string(DbBackend::Postgres, SYNC_ID_SEQUENCE))
                .await
                .map_err(query_error)?;
        }

        tracing::debug!(post_id = model.id, "Inserted post");
        Ok(model)
    }

    async fn update(
        &self,
        txn: &DatabaseTransaction,
        current: post::Model,
        post: Post,
    ) -> Result<post::Model, RepoError> {
        if current.version != post.version {
            return Err(RepoError::StaleVersion {
                id: current.id,
                expected: post.version,
                found: current.version,
            });
        }

        let mut active = current.into_active_model();
        active.user_id = Set(post.user_id);
        active.title = Set(post.title);
        active.body = Set(post.body);

        let model = active.update(txn).await.map_err(query_error)?;
        tracing::debug!(post_id = model.id, "Updated post");
        Ok(model)
    }
}

#[async_trait]
impl BaseRepository<Post, i32> for PostgresPostRepository {
    async fn find_all(&self) -> Result<Vec<Post>, RepoError> {
        self.fetch_all().await
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Post>, RepoError> {
        tracing::debug!(post_id = id, "Finding post by id");
        self.fetch_by_id(id).await
    }

    async fn save(&self, post: Post) -> Result<Post, RepoError> {
        let txn = self.db.begin().await.map_err(query_error)?;

        let existing = match post.id {
            Some(id) => PostEntity::find_by_id(id)
                .one(&txn)
                .await
                .map_err(query_error)?,
            None => None,
        };

        let model = match existing {
            Some(current) => self.update(&txn, current, post).await?,
            None => self.insert(&txn, post).await?,
        };

        txn.commit().await.map_err(query_error)?;
        Ok(model.into())
    }

    async fn delete_by_id(&self, id: i32) -> Result<(), RepoError> {
        let removed = self.remove_by_id(id).await?;
        tracing::debug!(post_id = id, removed, "Deleted post");
        Ok(())
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_by_title(&self, title: &str) -> Result<Vec<Post>, RepoError> {
        let rows = PostEntity::find()
            .filter(post::Column::Title.eq(title))
            .order_by_asc(post::Column::Id)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

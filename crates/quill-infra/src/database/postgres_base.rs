use std::marker::PhantomData;

use sea_orm::{
    DbConn, DbErr, EntityTrait, Iterable, PrimaryKeyToColumn, PrimaryKeyTrait, QueryOrder,
};

use quill_core::error::RepoError;

/// Generic PostgreSQL repository.
///
/// Covers the reads and deletes every entity shares. Writes stay with the
/// concrete repositories since they depend on each table's id and version
/// rules.
pub struct PostgresBaseRepository<E>
where
    E: EntityTrait,
{
    pub(crate) db: DbConn,
    _entity: PhantomData<E>,
}

impl<E> PostgresBaseRepository<E>
where
    E: EntityTrait,
{
    pub fn new(db: DbConn) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }

    /// Round-trip to the server, used by the health check.
    pub async fn ping(&self) -> Result<(), RepoError> {
        self.db.ping().await.map_err(query_error)
    }

    /// All rows, ordered by primary key.
    pub(crate) async fn fetch_all<T>(&self) -> Result<Vec<T>, RepoError>
    where
        T: From<E::Model>,
    {
        let mut query = E::find();
        for key in E::PrimaryKey::iter() {
            query = query.order_by_asc(key.into_column());
        }

        let rows = query.all(&self.db).await.map_err(query_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub(crate) async fn fetch_by_id<T, ID>(&self, id: ID) -> Result<Option<T>, RepoError>
    where
        T: From<E::Model>,
        ID: Into<<E::PrimaryKey as PrimaryKeyTrait>::ValueType>,
    {
        let row = E::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(row.map(Into::into))
    }

    /// Returns the number of rows removed; zero is not an error.
    pub(crate) async fn remove_by_id<ID>(&self, id: ID) -> Result<u64, RepoError>
    where
        ID: Into<<E::PrimaryKey as PrimaryKeyTrait>::ValueType>,
    {
        let result = E::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.rows_affected)
    }
}

/// Map a SeaORM error onto the repository error kinds.
pub(crate) fn query_error(err: DbErr) -> RepoError {
    match err {
        DbErr::Conn(e) => RepoError::Connection(e.to_string()),
        DbErr::ConnectionAcquire(e) => RepoError::Connection(e.to_string()),
        other => {
            let msg = other.to_string();
            if msg.contains("duplicate") || msg.contains("unique") {
                RepoError::Constraint(msg)
            } else {
                RepoError::Query(msg)
            }
        }
    }
}

use std::time::Duration;

use async_trait::async_trait;
use sqlx::{postgres::PgRow, Decode, PgPool, Postgres, Row, Type};

use crate::{database::PoolConfig, DatabaseError, SqlArg};

/// A pool of database connections.
///
/// All statements take positional arguments bound to `$1`, `$2`, ... and an
/// optional timeout after which they fail with [`DatabaseError::Timeout`].
#[async_trait]
pub trait PoolRunner: Send + Sync {
    /// Open a new pool.
    ///
    /// If `build` is set, the tables of [`PoolRunner::tables`] will be created.
    async fn create_pool(config: &PoolConfig, build: bool) -> Result<Self, DatabaseError>
    where
        Self: Sized;

    /// The underlying pool, `None` if it has been closed.
    fn pool(&self) -> Option<&PgPool>;

    /// Execute a statement and return the amount of affected rows.
    async fn execute(
        &self,
        sql: &str,
        args: &[SqlArg],
        timeout: Option<Duration>,
    ) -> Result<u64, DatabaseError>;

    async fn fetch(
        &self,
        sql: &str,
        args: &[SqlArg],
        timeout: Option<Duration>,
    ) -> Result<Vec<PgRow>, DatabaseError>;

    /// Fetch the first row, if any.
    async fn fetchrow(
        &self,
        sql: &str,
        args: &[SqlArg],
        timeout: Option<Duration>,
    ) -> Result<Option<PgRow>, DatabaseError>;

    /// Fetch a single value of the first row.
    ///
    /// `column` defaults to the first column. Returns `None` if there is no
    /// row. A `NULL` in the column fails with [`DatabaseError::Query`] unless
    /// `T` is an `Option`, e.g. `fetchval::<Option<String>>`.
    async fn fetchval<T>(
        &self,
        sql: &str,
        args: &[SqlArg],
        column: Option<usize>,
        timeout: Option<Duration>,
    ) -> Result<Option<T>, DatabaseError>
    where
        T: for<'r> Decode<'r, Postgres> + Type<Postgres> + Send,
    {
        let Some(row) = self.fetchrow(sql, args, timeout).await? else {
            return Ok(None);
        };

        row.try_get(column.unwrap_or(0))
            .map(Some)
            .map_err(DatabaseError::from)
    }

    /// Close all connections of the pool.
    async fn close(&self);

    /// The statements to create all tables.
    fn tables() -> &'static str
    where
        Self: Sized;
}

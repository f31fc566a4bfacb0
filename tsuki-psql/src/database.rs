use std::{future::Future, time::Duration};

use async_trait::async_trait;
use eyre::WrapErr;
use sqlx::{
    postgres::{PgPoolOptions, PgRow},
    Error as SqlxError, PgPool,
};

use crate::{args::bind_all, schema::SCHEMA, DatabaseError, PoolRunner, SqlArg};

#[derive(Clone, Debug)]
pub struct PoolConfig {
    pub url: Box<str>,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl PoolConfig {
    pub fn new(url: impl Into<Box<str>>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            acquire_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Creates the pool without opening any connections yet.
    pub fn new(config: &PoolConfig) -> Result<Self, DatabaseError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect_lazy(&config.url)
            .wrap_err("Failed to create database pool")?;

        Ok(Self { pool })
    }

    /// Creates all tables that don't exist yet.
    pub async fn build_tables(&self) -> Result<(), DatabaseError> {
        sqlx::raw_sql(SCHEMA).execute(&self.pool).await?;

        info!("Created database tables");

        Ok(())
    }
}

#[async_trait]
impl PoolRunner for Database {
    async fn create_pool(config: &PoolConfig, build: bool) -> Result<Self, DatabaseError> {
        let db = Self::new(config)?;

        if build {
            db.build_tables().await?;
        }

        Ok(db)
    }

    fn pool(&self) -> Option<&PgPool> {
        (!self.pool.is_closed()).then_some(&self.pool)
    }

    async fn execute(
        &self,
        sql: &str,
        args: &[SqlArg],
        timeout: Option<Duration>,
    ) -> Result<u64, DatabaseError> {
        trace!(sql, args = args.len(), "Executing statement");
        let query = bind_all(sql, args);

        bounded(timeout, query.execute(&self.pool))
            .await
            .map(|res| res.rows_affected())
    }

    async fn fetch(
        &self,
        sql: &str,
        args: &[SqlArg],
        timeout: Option<Duration>,
    ) -> Result<Vec<PgRow>, DatabaseError> {
        trace!(sql, args = args.len(), "Fetching rows");
        let query = bind_all(sql, args);

        bounded(timeout, query.fetch_all(&self.pool)).await
    }

    async fn fetchrow(
        &self,
        sql: &str,
        args: &[SqlArg],
        timeout: Option<Duration>,
    ) -> Result<Option<PgRow>, DatabaseError> {
        trace!(sql, args = args.len(), "Fetching row");
        let query = bind_all(sql, args);

        bounded(timeout, query.fetch_optional(&self.pool)).await
    }

    async fn close(&self) {
        self.pool.close().await;

        debug!("Closed database pool");
    }

    fn tables() -> &'static str {
        SCHEMA
    }
}

/// Awaits the future, failing with [`DatabaseError::Timeout`] if it doesn't
/// finish in time.
async fn bounded<T, F>(timeout: Option<Duration>, fut: F) -> Result<T, DatabaseError>
where
    F: Future<Output = Result<T, SqlxError>>,
{
    let res = match timeout {
        Some(duration) => tokio::time::timeout(duration, fut)
            .await
            .map_err(|_| DatabaseError::Timeout)?,
        None => fut.await,
    };

    res.map_err(DatabaseError::from)
}

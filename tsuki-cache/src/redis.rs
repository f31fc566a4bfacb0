use std::{collections::HashMap, fmt::Display, hash::Hash};

use async_trait::async_trait;
use bb8_redis::{
    bb8::{Pool, PooledConnection},
    redis::{AsyncCommands, FromRedisValue, ToRedisArgs},
    RedisConnectionManager,
};
use eyre::{Result, WrapErr};
use tsuki_model::HashView;

use crate::{CacheError, HashRunner};

/// [`HashRunner`] backed by redis hashes.
///
/// Clones share the underlying connection pool, the handle itself holds no
/// mutable state.
#[derive(Clone)]
pub struct RedisHash {
    redis: Pool<RedisConnectionManager>,
}

impl RedisHash {
    pub async fn new(host: impl Display, port: u16, db_idx: u8) -> Result<Self> {
        let redis_uri = format!("redis://{host}:{port}/{db_idx}");

        let redis_manager =
            RedisConnectionManager::new(redis_uri).wrap_err("Failed to create redis manager")?;

        let redis = Pool::builder()
            .max_size(16)
            .build(redis_manager)
            .await
            .wrap_err("Failed to create redis pool")?;

        debug!(%host, port, db_idx, "Created redis pool");

        Ok(Self { redis })
    }

    pub fn from_pool(redis: Pool<RedisConnectionManager>) -> Self {
        Self { redis }
    }

    async fn connection(&self) -> Result<PooledConnection<'_, RedisConnectionManager>> {
        self.redis
            .get()
            .await
            .wrap_err("Failed to get redis connection")
    }
}

#[async_trait]
impl<H, F, V> HashRunner<H, F, V> for RedisHash
where
    H: ToRedisArgs + Send + Sync,
    F: ToRedisArgs + FromRedisValue + Eq + Hash + Send + Sync,
    V: ToRedisArgs + FromRedisValue + Send + Sync,
{
    async fn set(&self, bucket: &H, field: &F, value: &V) -> Result<(), CacheError> {
        let _: () = self
            .connection()
            .await?
            .hset(bucket, field, value)
            .await
            .wrap_err("Failed to set hash field")?;

        Ok(())
    }

    async fn setx(&self, bucket: &H, field: &F, value: &V) -> Result<bool, CacheError> {
        let inserted: bool = self
            .connection()
            .await?
            .hset_nx(bucket, field, value)
            .await
            .wrap_err("Failed to set hash field if not exists")?;

        Ok(inserted)
    }

    async fn remove(&self, bucket: &H) -> Result<bool, CacheError> {
        let removed: usize = self
            .connection()
            .await?
            .del(bucket)
            .await
            .wrap_err("Failed to remove hash")?;

        Ok(removed > 0)
    }

    async fn len(&self, bucket: &H) -> Result<usize, CacheError> {
        let len: usize = self
            .connection()
            .await?
            .hlen(bucket)
            .await
            .wrap_err("Failed to get hash length")?;

        Ok(len)
    }

    async fn all(&self, bucket: &H) -> Result<Option<Vec<HashView<F, V>>>, CacheError> {
        let fields: HashMap<F, V> = self
            .connection()
            .await?
            .hgetall(bucket)
            .await
            .wrap_err("Failed to get all hash fields")?;

        if fields.is_empty() {
            return Ok(None);
        }

        Ok(Some(fields.into_iter().map(HashView::from).collect()))
    }

    async fn delete(&self, bucket: &H, field: &F) -> Result<bool, CacheError> {
        let removed: usize = self
            .connection()
            .await?
            .hdel(bucket, field)
            .await
            .wrap_err("Failed to delete hash field")?;

        Ok(removed > 0)
    }

    async fn exists(&self, bucket: &H, field: &F) -> Result<bool, CacheError> {
        let exists: bool = self
            .connection()
            .await?
            .hexists(bucket, field)
            .await
            .wrap_err("Failed to check hash field existence")?;

        Ok(exists)
    }

    async fn get(&self, bucket: &H, field: &F) -> Result<V, CacheError> {
        let value: Option<V> = self
            .connection()
            .await?
            .hget(bucket, field)
            .await
            .wrap_err("Failed to get hash field")?;

        value.ok_or(CacheError::NotFound)
    }
}

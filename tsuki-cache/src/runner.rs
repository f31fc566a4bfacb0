use async_trait::async_trait;
use tsuki_model::HashView;

use crate::CacheError;

/// A store of buckets, each holding a set of fields with a value.
///
/// Mirrors the semantics of redis hashes: a bucket exists as long as it
/// holds at least one field.
///
/// Cloning a runner yields an independent handle. Data fetched through one
/// handle is owned by the caller and never changes due to mutations through
/// another handle.
#[async_trait]
pub trait HashRunner<H, F, V>: Clone + Send + Sync
where
    H: Send + Sync,
    F: Send + Sync,
    V: Send + Sync,
{
    /// Insert the field into the bucket, replacing any previous value.
    async fn set(&self, bucket: &H, field: &F, value: &V) -> Result<(), CacheError>;

    /// Insert the field into the bucket only if it's not already present.
    ///
    /// Returns whether the value was inserted.
    async fn setx(&self, bucket: &H, field: &F, value: &V) -> Result<bool, CacheError>;

    /// Remove the bucket with all its fields.
    ///
    /// Returns whether the bucket existed.
    async fn remove(&self, bucket: &H) -> Result<bool, CacheError>;

    /// The amount of fields in the bucket.
    async fn len(&self, bucket: &H) -> Result<usize, CacheError>;

    /// All entries of the bucket or `None` if the bucket doesn't exist.
    async fn all(&self, bucket: &H) -> Result<Option<Vec<HashView<F, V>>>, CacheError>;

    /// Remove a single field from the bucket.
    ///
    /// Returns whether the field existed.
    async fn delete(&self, bucket: &H, field: &F) -> Result<bool, CacheError>;

    async fn exists(&self, bucket: &H, field: &F) -> Result<bool, CacheError>;

    /// The value of the field, [`CacheError::NotFound`] if it's missing.
    async fn get(&self, bucket: &H, field: &F) -> Result<V, CacheError>;
}

#[macro_use]
extern crate tracing;

pub use self::{error::CacheError, memory::MemoryHash, redis::RedisHash, runner::HashRunner};

mod error;
mod memory;
mod redis;
mod runner;

#[cfg(test)]
pub(crate) mod tests {
    use crate::{CacheError, HashRunner};

    type Result<T> = std::result::Result<T, CacheError>;

    /// Runs the shared checks of the hash contract against the given runner.
    ///
    /// Uses buckets prefixed with `__tsuki_test` so it's safe to run against
    /// a live redis instance.
    pub async fn hash_contract<R>(hash: &R) -> Result<()>
    where
        R: HashRunner<String, String, String>,
    {
        let bucket = "__tsuki_test:contract".to_owned();
        let missing = "__tsuki_test:missing".to_owned();
        let field = "field".to_owned();

        hash.remove(&bucket).await?;

        // setx doesn't overwrite
        hash.set(&bucket, &field, &"v1".to_owned()).await?;
        assert!(!hash.setx(&bucket, &field, &"v2".to_owned()).await?);
        assert_eq!(hash.get(&bucket, &field).await?, "v1");

        // setx inserts new fields
        let other = "other".to_owned();
        assert!(hash.setx(&bucket, &other, &"v3".to_owned()).await?);
        assert!(hash.exists(&bucket, &other).await?);
        assert_eq!(hash.len(&bucket).await?, 2);

        // set overwrites
        hash.set(&bucket, &field, &"v4".to_owned()).await?;
        assert_eq!(hash.get(&bucket, &field).await?, "v4");

        let mut entries = hash.all(&bucket).await?.expect("bucket exists");
        entries.sort_unstable_by(|a, b| a.key.cmp(&b.key));
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].key, "field");
        assert_eq!(entries[0].value, "v4");

        // single field deletion
        assert!(hash.delete(&bucket, &other).await?);
        assert!(!hash.delete(&bucket, &other).await?);
        assert!(!hash.exists(&bucket, &other).await?);
        assert!(matches!(
            hash.get(&bucket, &other).await,
            Err(CacheError::NotFound)
        ));

        // missing buckets
        assert!(!hash.remove(&missing).await?);
        assert_eq!(hash.len(&missing).await?, 0);
        assert!(hash.all(&missing).await?.is_none());
        assert!(matches!(
            hash.get(&missing, &field).await,
            Err(CacheError::NotFound)
        ));

        assert!(hash.remove(&bucket).await?);
        assert!(!hash.exists(&bucket, &field).await?);

        Ok(())
    }
}

use std::{
    collections::{hash_map::Entry, HashMap},
    hash::Hash,
};

use async_trait::async_trait;
use parking_lot::RwLock;
use tsuki_model::HashView;

use crate::{CacheError, HashRunner};

type Buckets<H, F, V> = HashMap<H, HashMap<F, V>>;

/// In-process [`HashRunner`].
///
/// Cloning copies all buckets, the clone and the original share nothing.
pub struct MemoryHash<H, F, V> {
    buckets: RwLock<Buckets<H, F, V>>,
}

impl<H, F, V> MemoryHash<H, F, V> {
    pub fn new() -> Self {
        Self {
            buckets: RwLock::new(HashMap::new()),
        }
    }
}

impl<H, F, V> Default for MemoryHash<H, F, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Clone, F: Clone, V: Clone> Clone for MemoryHash<H, F, V> {
    fn clone(&self) -> Self {
        Self {
            buckets: RwLock::new(self.buckets.read().clone()),
        }
    }
}

#[async_trait]
impl<H, F, V> HashRunner<H, F, V> for MemoryHash<H, F, V>
where
    H: Clone + Eq + Hash + Send + Sync,
    F: Clone + Eq + Hash + Send + Sync,
    V: Clone + Send + Sync,
{
    async fn set(&self, bucket: &H, field: &F, value: &V) -> Result<(), CacheError> {
        self.buckets
            .write()
            .entry(bucket.clone())
            .or_default()
            .insert(field.clone(), value.clone());

        Ok(())
    }

    async fn setx(&self, bucket: &H, field: &F, value: &V) -> Result<bool, CacheError> {
        let mut buckets = self.buckets.write();

        match buckets.entry(bucket.clone()).or_default().entry(field.clone()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(e) => {
                e.insert(value.clone());

                Ok(true)
            }
        }
    }

    async fn remove(&self, bucket: &H) -> Result<bool, CacheError> {
        Ok(self.buckets.write().remove(bucket).is_some())
    }

    async fn len(&self, bucket: &H) -> Result<usize, CacheError> {
        Ok(self.buckets.read().get(bucket).map_or(0, HashMap::len))
    }

    async fn all(&self, bucket: &H) -> Result<Option<Vec<HashView<F, V>>>, CacheError> {
        let buckets = self.buckets.read();

        let entries = buckets.get(bucket).map(|fields| {
            fields
                .iter()
                .map(|(field, value)| HashView::new(field.clone(), value.clone()))
                .collect()
        });

        Ok(entries)
    }

    async fn delete(&self, bucket: &H, field: &F) -> Result<bool, CacheError> {
        let mut buckets = self.buckets.write();

        let Some(fields) = buckets.get_mut(bucket) else {
            return Ok(false);
        };

        let removed = fields.remove(field).is_some();

        // redis drops hashes once their last field is gone
        if fields.is_empty() {
            buckets.remove(bucket);
        }

        Ok(removed)
    }

    async fn exists(&self, bucket: &H, field: &F) -> Result<bool, CacheError> {
        let buckets = self.buckets.read();

        Ok(buckets
            .get(bucket)
            .is_some_and(|fields| fields.contains_key(field)))
    }

    async fn get(&self, bucket: &H, field: &F) -> Result<V, CacheError> {
        self.buckets
            .read()
            .get(bucket)
            .and_then(|fields| fields.get(field))
            .cloned()
            .ok_or(CacheError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::hash_contract;

    type StringHash = MemoryHash<String, String, String>;

    #[tokio::test]
    async fn contract() -> Result<(), CacheError> {
        hash_contract(&StringHash::new()).await
    }

    #[tokio::test]
    async fn clone_is_independent() -> Result<(), CacheError> {
        let bucket = "bucket".to_owned();
        let field = "field".to_owned();

        let hash = StringHash::new();
        hash.set(&bucket, &field, &"original".to_owned()).await?;

        let snapshot = hash.all(&bucket).await?.unwrap();

        let clone = hash.clone();
        clone.set(&bucket, &field, &"changed".to_owned()).await?;
        clone.set(&bucket, &"new".to_owned(), &"value".to_owned()).await?;

        assert_eq!(snapshot, vec![HashView::new(field.clone(), "original".to_owned())]);
        assert_eq!(hash.get(&bucket, &field).await?, "original");
        assert_eq!(hash.len(&bucket).await?, 1);
        assert_eq!(clone.get(&bucket, &field).await?, "changed");

        assert!(hash.remove(&bucket).await?);
        assert!(clone.exists(&bucket, &field).await?);

        Ok(())
    }

    #[tokio::test]
    async fn deleting_last_field_removes_bucket() -> Result<(), CacheError> {
        let hash = MemoryHash::<u64, u64, u64>::new();

        hash.set(&1, &2, &3).await?;
        assert!(hash.delete(&1, &2).await?);
        assert!(hash.all(&1).await?.is_none());
        assert!(!hash.remove(&1).await?);

        Ok(())
    }
}

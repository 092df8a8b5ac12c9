//! Cache backend trait

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{CacheEntry, CacheStats, DeskError};

/// Core trait for query cache storage backends
///
/// Backends store serialized payloads and never judge freshness on their
/// own: the caller decides with its clock whether an entry is still usable.
#[async_trait]
pub trait CacheBackend: Send + Sync + 'static {
    /// Get an entry from the cache, fresh or not
    async fn get(&self, key: &str) -> Result<Option<CacheEntry<Vec<u8>>>, DeskError>;

    /// Store an entry, replacing any previous one under the key
    async fn set(&self, key: &str, entry: CacheEntry<Vec<u8>>) -> Result<(), DeskError>;

    /// Delete a key from the cache
    ///
    /// Returns `true` if the key existed and was deleted.
    async fn delete(&self, key: &str) -> Result<bool, DeskError>;

    /// Remove every entry
    ///
    /// Returns the number of entries removed.
    async fn clear(&self) -> Result<u64, DeskError>;

    /// Remove entries that are expired at `now`
    ///
    /// Returns the number of entries removed.
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, DeskError>;

    /// Get cache statistics
    async fn stats(&self) -> Result<CacheStats, DeskError>;

    /// Get the number of entries in the cache
    async fn len(&self) -> Result<usize, DeskError>;

    /// Check if the cache is empty
    async fn is_empty(&self) -> Result<bool, DeskError> {
        Ok(self.len().await? == 0)
    }
}

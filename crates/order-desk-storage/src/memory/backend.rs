//! In-memory cache backend using DashMap

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::Arc;

use order_desk_core::{CacheBackend, CacheEntry, CacheStats, Result};

/// Configuration for the memory backend
#[derive(Debug, Clone)]
pub struct MemoryConfig {
    /// Maximum number of entries (0 = unlimited)
    pub max_capacity: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self { max_capacity: 1_000 }
    }
}

impl MemoryConfig {
    /// Create config with specific capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            max_capacity: capacity,
        }
    }

    /// Create config with unlimited capacity
    pub fn unlimited() -> Self {
        Self { max_capacity: 0 }
    }
}

/// Internal statistics tracking
#[derive(Debug, Default)]
struct MemoryStats {
    writes: u64,
    deletes: u64,
    evictions: u64,
}

/// In-memory cache backend
///
/// Uses `DashMap` so lookups for one key never wait on writes to another.
/// Cloning creates a new handle to the SAME underlying store.
#[derive(Clone)]
pub struct MemoryBackend {
    /// Main data store
    data: Arc<DashMap<String, CacheEntry<Vec<u8>>>>,
    /// Statistics
    stats: Arc<RwLock<MemoryStats>>,
    /// Configuration
    config: MemoryConfig,
}

impl MemoryBackend {
    /// Create a new memory backend
    pub fn new(config: MemoryConfig) -> Self {
        Self {
            data: Arc::new(DashMap::with_capacity(config.max_capacity.min(1_000))),
            stats: Arc::new(RwLock::new(MemoryStats::default())),
            config,
        }
    }

    /// Create with default configuration
    pub fn with_defaults() -> Self {
        Self::new(MemoryConfig::default())
    }

    /// Evict the oldest entries until there is room for `incoming`
    fn maybe_evict(&self, incoming: &str) {
        if self.config.max_capacity == 0 || self.data.contains_key(incoming) {
            return;
        }

        while self.data.len() >= self.config.max_capacity {
            let oldest = self
                .data
                .iter()
                .min_by_key(|entry| entry.stored_at)
                .map(|entry| entry.key().clone());

            match oldest {
                Some(key) => {
                    if self.data.remove(&key).is_some() {
                        self.stats.write().evictions += 1;
                    }
                }
                None => break,
            }
        }
    }

    /// Get approximate memory usage
    pub fn memory_usage(&self) -> usize {
        self.data
            .iter()
            .map(|entry| entry.size + entry.key().len())
            .sum()
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry<Vec<u8>>>> {
        Ok(self.data.get(key).map(|entry| entry.value().clone()))
    }

    async fn set(&self, key: &str, entry: CacheEntry<Vec<u8>>) -> Result<()> {
        self.maybe_evict(key);
        self.data.insert(key.to_string(), entry);
        self.stats.write().writes += 1;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        if self.data.remove(key).is_some() {
            self.stats.write().deletes += 1;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn clear(&self) -> Result<u64> {
        let keys: Vec<String> = self.data.iter().map(|entry| entry.key().clone()).collect();
        let mut count = 0;
        for key in keys {
            if self.data.remove(&key).is_some() {
                count += 1;
            }
        }
        self.stats.write().deletes += count;
        Ok(count)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        let before = self.data.len();
        self.data.retain(|_, entry| !entry.is_expired(now));
        let removed = before.saturating_sub(self.data.len()) as u64;
        self.stats.write().evictions += removed;
        Ok(removed)
    }

    async fn stats(&self) -> Result<CacheStats> {
        let stats = self.stats.read();
        Ok(CacheStats {
            writes: stats.writes,
            deletes: stats.deletes,
            evictions: stats.evictions,
            size: self.data.len(),
            memory_bytes: self.memory_usage(),
            ..Default::default()
        })
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.data.len())
    }
}

//! Cache entry type

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A cached query result with its freshness metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    /// The cached value
    pub value: T,
    /// When the value was stored
    pub stored_at: DateTime<Utc>,
    /// Time-to-live
    pub ttl: Duration,
    /// Size in bytes
    pub size: usize,
}

impl<T> CacheEntry<T> {
    /// Create a new cache entry stored at `stored_at`
    pub fn new(value: T, size: usize, stored_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            value,
            stored_at,
            ttl,
            size,
        }
    }

    /// Get age of the entry at `now`; zero if `now` precedes storage
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now.signed_duration_since(self.stored_at)
            .to_std()
            .unwrap_or_default()
    }

    /// Check if the entry has outlived its TTL at `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.age(now) > self.ttl
    }

    /// Get remaining TTL at `now`
    pub fn ttl_remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.ttl.checked_sub(self.age(now))
    }

    /// Replace the value, keeping the metadata
    pub fn map<U, F>(self, f: F) -> CacheEntry<U>
    where
        F: FnOnce(T) -> U,
    {
        CacheEntry {
            value: f(self.value),
            stored_at: self.stored_at,
            ttl: self.ttl,
            size: self.size,
        }
    }
}

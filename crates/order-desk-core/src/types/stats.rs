//! Cache statistics

use serde::Serialize;

/// Statistics for cache operations
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Number of fresh hits
    pub hits: u64,
    /// Number of lookups that found nothing usable
    pub misses: u64,
    /// Number of lookups that found an expired entry
    pub expired: u64,
    /// Number of write operations
    pub writes: u64,
    /// Number of entries removed by deletes and bulk invalidation
    pub deletes: u64,
    /// Number of bulk invalidations
    pub invalidations: u64,
    /// Number of capacity evictions
    pub evictions: u64,
    /// Current number of entries
    pub size: usize,
    /// Approximate memory usage in bytes
    pub memory_bytes: usize,
}

impl CacheStats {
    /// Calculate hit ratio (0.0 to 1.0)
    pub fn hit_ratio(&self) -> f64 {
        let total = self.total_requests();
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Calculate miss ratio (0.0 to 1.0)
    pub fn miss_ratio(&self) -> f64 {
        1.0 - self.hit_ratio()
    }

    /// Total lookups
    pub fn total_requests(&self) -> u64 {
        self.hits + self.misses
    }
}

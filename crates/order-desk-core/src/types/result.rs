//! Cache result type

use super::entry::CacheEntry;

/// Result of a cache lookup operation
#[derive(Debug, Clone, PartialEq)]
pub enum CacheResult<T> {
    /// Fresh cache hit
    Hit(CacheEntry<T>),
    /// Entry present but past its TTL; must not be served
    Expired(CacheEntry<T>),
    /// Cache miss
    Miss,
}

impl<T> CacheResult<T> {
    /// Check if this is a fresh hit
    pub fn is_hit(&self) -> bool {
        matches!(self, CacheResult::Hit(_))
    }

    /// Check if this is a miss
    pub fn is_miss(&self) -> bool {
        matches!(self, CacheResult::Miss)
    }

    /// Check if an entry was found but is past its TTL
    pub fn is_expired(&self) -> bool {
        matches!(self, CacheResult::Expired(_))
    }

    /// Extract the fresh value, consuming the result
    pub fn value(self) -> Option<T> {
        match self {
            CacheResult::Hit(entry) => Some(entry.value),
            _ => None,
        }
    }

    /// Extract the fresh entry, consuming the result
    pub fn entry(self) -> Option<CacheEntry<T>> {
        match self {
            CacheResult::Hit(entry) => Some(entry),
            _ => None,
        }
    }

    /// Map the value if present
    pub fn map<U, F>(self, f: F) -> CacheResult<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            CacheResult::Hit(entry) => CacheResult::Hit(entry.map(f)),
            CacheResult::Expired(entry) => CacheResult::Expired(entry.map(f)),
            CacheResult::Miss => CacheResult::Miss,
        }
    }
}

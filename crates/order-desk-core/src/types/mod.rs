//! Core types for cache operations

mod entry;
mod result;
mod stats;

pub use entry::CacheEntry;
pub use result::CacheResult;
pub use stats::CacheStats;

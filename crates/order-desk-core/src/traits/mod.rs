//! Core traits for cache operations

mod backend;
mod key;
mod metrics;
mod serializer;
mod tracing_metrics;

pub use backend::CacheBackend;
pub use key::CacheKey;
pub use self::metrics::{CacheMetrics, CacheOperation, NoopMetrics};
pub use serializer::{JsonSerializer, Serializer};
pub use tracing_metrics::TracingMetrics;

#[cfg(feature = "metrics")]
pub use self::metrics::MetricsCrateAdapter;

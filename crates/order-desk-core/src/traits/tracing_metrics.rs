use crate::{CacheMetrics, CacheOperation};
use std::time::Duration;
use tracing::{debug, trace};

/// Metrics adapter that logs events via `tracing`
#[derive(Debug, Clone, Default)]
pub struct TracingMetrics {
    /// Service name/prefix (optional)
    service_name: Option<String>,
}

impl TracingMetrics {
    /// Create new tracing metrics adapter
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with service name prefix
    pub fn with_service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = Some(name.into());
        self
    }
}

impl CacheMetrics for TracingMetrics {
    fn record_hit(&self, key: &str) {
        debug!(
            target: "order_desk",
            event = "hit",
            key = %key,
            service = ?self.service_name,
            "Cache Hit"
        );
    }

    fn record_miss(&self, key: &str) {
        debug!(
            target: "order_desk",
            event = "miss",
            key = %key,
            service = ?self.service_name,
            "Cache Miss"
        );
    }

    fn record_fetch(&self, key: &str, succeeded: bool) {
        debug!(
            target: "order_desk",
            event = "fetch",
            key = %key,
            succeeded,
            service = ?self.service_name,
            "Order Source Fetch"
        );
    }

    fn record_latency(&self, operation: CacheOperation, duration: Duration) {
        trace!(
            target: "order_desk",
            event = "latency",
            operation = operation.as_str(),
            duration_ms = duration.as_millis() as u64,
            service = ?self.service_name,
            "Cache Operation Latency"
        );
    }

    fn record_invalidation(&self, removed: u64) {
        debug!(
            target: "order_desk",
            event = "invalidate",
            removed,
            service = ?self.service_name,
            "Cache Invalidated"
        );
    }

    fn record_size(&self, size: usize, memory_bytes: usize) {
        trace!(
            target: "order_desk",
            event = "size",
            size = size,
            bytes = memory_bytes,
            service = ?self.service_name,
            "Cache Size Update"
        );
    }
}

//! order-desk: order list priority engine and query cache
//!
//! # Features
//!
//! - **Priority engine**: days pending, overdue flag and urgency score for every order
//! - **Query cache** with a five minute TTL and bulk invalidation on mutation
//! - **Request coalescing** for concurrent misses on the same view
//! - **Permission checks** against flat permission sets
//! - **Metrics integration**
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use order_desk::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//!     let cache = QueryCache::new(MemoryBackend::new(MemoryConfig::default()));
//!     let query = OrderQuery::new().status(OrderStatus::Pending);
//!
//!     let page: OrderPage = cache
//!         .get_or_fetch(&query, || async { Ok::<_, DeskError>(OrderPage::default()) }, false)
//!         .await?;
//!
//!     let now = cache.now();
//!     for order in page.orders.iter().map(|o| annotate(o, now)) {
//!         println!("{} scored {}", order.order_id, order.priority_score);
//!     }
//!
//!     Ok(())
//! }
//! ```

mod cache;
mod desk;

// Re-export core
pub use order_desk_core::*;

// Re-export storage
pub use order_desk_storage::{MemoryBackend, MemoryConfig};

// Export cache and service
pub use cache::{DEFAULT_REFRESH_AFTER, DEFAULT_TTL, QueryCache, QueryCacheConfig};
pub use desk::{OrderDesk, OrderSource};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        AnnotatedOrder, AnnotatedPage, CacheKey, CacheResult, Clock, DeskError, MemoryBackend,
        MemoryConfig, Order, OrderDesk, OrderPage, OrderPatch, OrderQuery, OrderSource,
        OrderStatus, PaymentStatus, PermissionSet, PriorityClass, QueryCache, QueryCacheConfig,
        Result, SortDirection, SortField, annotate, can_i, classify, sort_by_priority,
    };
}

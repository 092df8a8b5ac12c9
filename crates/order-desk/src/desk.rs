//! Order list service: backend source, query cache and priority engine

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use order_desk_core::{
    AnnotatedPage, CacheBackend, CacheMetrics, DeskError, JsonSerializer, NoopMetrics, OrderPage,
    OrderPatch, OrderQuery, OrderStatus, SortField, annotate, filter_by_priority, sort_by_priority,
};
use order_desk_storage::MemoryBackend;

use crate::QueryCache;

/// The REST backend that owns orders
///
/// Errors are the source's own type and reach callers of [`OrderDesk`]
/// unchanged; cache failures are folded in through `From<DeskError>`.
#[async_trait]
pub trait OrderSource: Send + Sync + 'static {
    type Error: From<DeskError> + Send;

    /// Fetch one page of the order list
    async fn fetch_page(&self, query: &OrderQuery) -> Result<OrderPage, Self::Error>;

    /// Change an order's status
    async fn update_status(&self, order_id: &str, status: OrderStatus) -> Result<(), Self::Error>;

    /// Edit an order's fields
    async fn update_order(&self, order_id: &str, patch: &OrderPatch) -> Result<(), Self::Error>;
}

/// Order list view model
///
/// Pages come from the cache when fresh, otherwise from the source; either
/// way every order is annotated at the current instant before it is returned.
/// Mutations go to the source and clear the whole cache when they succeed.
pub struct OrderDesk<Src, B = MemoryBackend, M = NoopMetrics>
where
    Src: OrderSource,
    B: CacheBackend,
    M: CacheMetrics,
{
    source: Arc<Src>,
    cache: QueryCache<B, JsonSerializer, M>,
}

impl<Src: OrderSource> OrderDesk<Src, MemoryBackend, NoopMetrics> {
    /// Create a desk with an in-memory cache and default settings
    pub fn new(source: Src) -> Self {
        Self::with_cache(source, QueryCache::new(MemoryBackend::default()))
    }
}

impl<Src, B, M> OrderDesk<Src, B, M>
where
    Src: OrderSource,
    B: CacheBackend,
    M: CacheMetrics,
{
    /// Create a desk around an existing cache
    pub fn with_cache(source: Src, cache: QueryCache<B, JsonSerializer, M>) -> Self {
        Self {
            source: Arc::new(source),
            cache,
        }
    }

    pub fn cache(&self) -> &QueryCache<B, JsonSerializer, M> {
        &self.cache
    }

    pub fn source(&self) -> &Src {
        &self.source
    }

    /// List one page of orders, annotated, filtered and sorted per `query`
    pub async fn list_orders(
        &self,
        query: &OrderQuery,
        force_refresh: bool,
    ) -> Result<AnnotatedPage, Src::Error> {
        let source = &self.source;
        let page: OrderPage = self
            .cache
            .get_or_fetch(query, || source.fetch_page(query), force_refresh)
            .await?;
        Ok(self.present(page, query))
    }

    /// Force a reload when the last fetch is older than the refresh window
    ///
    /// Returns `None` when the cached data is recent enough.
    pub async fn refresh_if_stale(
        &self,
        query: &OrderQuery,
    ) -> Result<Option<AnnotatedPage>, Src::Error> {
        if !self.cache.needs_refresh() {
            return Ok(None);
        }
        self.list_orders(query, true).await.map(Some)
    }

    /// Change an order's status, then drop every cached page
    pub async fn update_status(
        &self,
        order_id: &str,
        status: OrderStatus,
    ) -> Result<(), Src::Error> {
        self.source.update_status(order_id, status).await?;
        let removed = self.cache.invalidate_all().await?;
        debug!(
            target: "order_desk",
            order_id,
            status = status.as_str(),
            removed,
            "order status updated"
        );
        Ok(())
    }

    /// Edit an order, then drop every cached page
    pub async fn update_order(&self, order_id: &str, patch: &OrderPatch) -> Result<(), Src::Error> {
        self.source.update_order(order_id, patch).await?;
        let removed = self.cache.invalidate_all().await?;
        debug!(target: "order_desk", order_id, removed, "order updated");
        Ok(())
    }

    /// Annotate a backend page at the cache clock's instant
    fn present(&self, page: OrderPage, query: &OrderQuery) -> AnnotatedPage {
        let now = self.cache.now();
        let mut orders: Vec<_> = page.orders.iter().map(|order| annotate(order, now)).collect();

        if let Some(class) = query.priority {
            orders = filter_by_priority(orders, class);
        }
        if query.sort_by == SortField::Priority {
            sort_by_priority(&mut orders, query.sort_dir);
        }

        AnnotatedPage {
            orders,
            pagination: page.pagination,
        }
    }
}

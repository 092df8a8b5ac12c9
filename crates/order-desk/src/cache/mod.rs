//! Query result cache for order list views

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::debug;

use order_desk_core::{
    CacheBackend, CacheEntry, CacheKey, CacheMetrics, CacheOperation, CacheResult, CacheStats,
    Clock, DeskError, JsonSerializer, NoopMetrics, Result, Serializer, SystemClock,
};

mod coalescer;
use coalescer::{Coalescer, Flight};

/// Default time-to-live of a cached page
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Default age of the last fetch after which a forced refresh is suggested
pub const DEFAULT_REFRESH_AFTER: Duration = Duration::from_secs(2 * 60);

/// Configuration for QueryCache
#[derive(Debug, Clone)]
pub struct QueryCacheConfig {
    /// Time-to-live of every entry
    pub ttl: Duration,
    /// Age of the last successful fetch after which `needs_refresh` is true
    pub refresh_after: Duration,
    /// Namespace prefix for all keys
    pub namespace: Option<String>,
    /// Collapse concurrent misses for the same key into one fetch
    pub coalesce: bool,
}

impl Default for QueryCacheConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            refresh_after: DEFAULT_REFRESH_AFTER,
            namespace: None,
            coalesce: true,
        }
    }
}

impl QueryCacheConfig {
    /// Create config with specific TTL
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            ..Default::default()
        }
    }

    /// Create config with namespace
    pub fn with_namespace(namespace: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            ..Default::default()
        }
    }

    /// Let concurrent misses for the same key each fetch
    pub fn no_coalesce(mut self) -> Self {
        self.coalesce = false;
        self
    }
}

/// Counters kept by the cache itself; the backend tracks storage counters
#[derive(Debug, Default)]
struct QueryState {
    hits: u64,
    misses: u64,
    expired: u64,
    invalidations: u64,
    last_fetch: Option<DateTime<Utc>>,
}

/// Time-bounded memoization of order list queries
///
/// Entries live for the configured TTL and are dropped in bulk by
/// [`invalidate_all`](Self::invalidate_all) after any mutation. Cloning
/// creates a new handle to the SAME cache.
///
/// Generic over:
/// - `B`: The storage backend
/// - `S`: The payload serializer
/// - `M`: The metrics collector
pub struct QueryCache<B, S = JsonSerializer, M = NoopMetrics>
where
    B: CacheBackend,
    S: Serializer,
    M: CacheMetrics,
{
    backend: Arc<B>,
    serializer: Arc<S>,
    metrics: Arc<M>,
    clock: Arc<dyn Clock>,
    config: QueryCacheConfig,
    coalescer: Coalescer,
    state: Arc<RwLock<QueryState>>,
    /// Bumped by every invalidation; fetches started under an older
    /// generation are not stored
    generation: Arc<AtomicU64>,
}

impl<B: CacheBackend> QueryCache<B, JsonSerializer, NoopMetrics> {
    /// Create a QueryCache with default config, JSON payloads and no metrics
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, QueryCacheConfig::default())
    }

    /// Create with custom config
    pub fn with_config(backend: B, config: QueryCacheConfig) -> Self {
        Self::with_serializer_and_metrics(backend, JsonSerializer, NoopMetrics, config)
    }
}

impl<B, S, M> QueryCache<B, S, M>
where
    B: CacheBackend,
    S: Serializer,
    M: CacheMetrics,
{
    /// Create a QueryCache with custom serializer and metrics
    pub fn with_serializer_and_metrics(
        backend: B,
        serializer: S,
        metrics: M,
        config: QueryCacheConfig,
    ) -> Self {
        Self {
            backend: Arc::new(backend),
            serializer: Arc::new(serializer),
            metrics: Arc::new(metrics),
            clock: Arc::new(SystemClock),
            config,
            coalescer: Coalescer::new(),
            state: Arc::new(RwLock::new(QueryState::default())),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Replace the time source
    pub fn with_clock(mut self, clock: impl Clock) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Current instant according to the cache's clock
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn config(&self) -> &QueryCacheConfig {
        &self.config
    }

    /// Get the full key with namespace prefix
    fn full_key<K: CacheKey + ?Sized>(&self, key: &K) -> String {
        match &self.config.namespace {
            Some(ns) => format!("{}:{}", ns, key.full_key()),
            None => key.full_key(),
        }
    }

    /// Look up a key without fetching
    pub async fn lookup<K, T>(&self, key: &K) -> Result<CacheResult<T>>
    where
        K: CacheKey + ?Sized,
        T: DeserializeOwned,
    {
        let result = match self.probe(&self.full_key(key)).await? {
            CacheResult::Hit(entry) => CacheResult::Hit(self.deserialize_entry(entry)?),
            CacheResult::Expired(entry) => CacheResult::Expired(self.deserialize_entry(entry)?),
            CacheResult::Miss => CacheResult::Miss,
        };
        Ok(result)
    }

    /// Classify the raw entry under `full_key` and count the lookup
    async fn probe(&self, full_key: &str) -> Result<CacheResult<Vec<u8>>> {
        let start = Instant::now();
        let found = self.backend.get(full_key).await?;
        self.metrics
            .record_latency(CacheOperation::Get, start.elapsed());

        let result = match found {
            Some(entry) if !entry.is_expired(self.clock.now()) => {
                self.state.write().hits += 1;
                self.metrics.record_hit(full_key);
                CacheResult::Hit(entry)
            }
            Some(entry) => {
                {
                    let mut state = self.state.write();
                    state.expired += 1;
                    state.misses += 1;
                }
                self.metrics.record_miss(full_key);
                CacheResult::Expired(entry)
            }
            None => {
                self.state.write().misses += 1;
                self.metrics.record_miss(full_key);
                CacheResult::Miss
            }
        };
        Ok(result)
    }

    /// Return the cached result for `key`, or fetch and cache it
    ///
    /// A fresh entry is returned without calling `fetch` unless
    /// `force_refresh` is set. Errors from `fetch` are returned as they are
    /// and nothing is cached for them.
    pub async fn get_or_fetch<K, T, E, F, Fut>(
        &self,
        key: &K,
        fetch: F,
        force_refresh: bool,
    ) -> std::result::Result<T, E>
    where
        K: CacheKey + ?Sized,
        T: Serialize + DeserializeOwned,
        E: From<DeskError>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
    {
        let full_key = self.full_key(key);

        if force_refresh {
            self.state.write().misses += 1;
            self.metrics.record_miss(&full_key);
            debug!(target: "order_desk", key = %full_key, "forced refresh");
            return self.fetch_and_store(&full_key, fetch).await.map(|(value, _)| value);
        }

        // Expired payloads are never decoded; they may predate a schema change
        if let CacheResult::Hit(entry) = self.probe(&full_key).await? {
            return Ok(self.deserialize_entry::<T>(entry)?.value);
        }

        let leader = if self.config.coalesce {
            match self.coalescer.join(&full_key) {
                Flight::Leader(guard) => {
                    // Another leader may have stored the page since our lookup
                    if let Some(entry) = self.fresh_raw(&full_key).await? {
                        let value = self.serializer.deserialize(&entry.value)?;
                        guard.complete(entry.value);
                        return Ok(value);
                    }
                    Some(guard)
                }
                Flight::Follower(rx) => {
                    if let Some(payload) = coalescer::wait(rx).await {
                        debug!(target: "order_desk", key = %full_key, "joined in-flight fetch");
                        return Ok(self.serializer.deserialize(&payload)?);
                    }
                    // Leader failed; fetch on our own
                    None
                }
            }
        } else {
            None
        };

        let (value, payload) = self.fetch_and_store(&full_key, fetch).await?;
        if let Some(guard) = leader {
            guard.complete(payload);
        }
        Ok(value)
    }

    /// Fresh raw entry, without touching counters
    async fn fresh_raw(&self, full_key: &str) -> Result<Option<CacheEntry<Vec<u8>>>> {
        let now = self.clock.now();
        Ok(self
            .backend
            .get(full_key)
            .await?
            .filter(|entry| !entry.is_expired(now)))
    }

    async fn fetch_and_store<T, E, F, Fut>(
        &self,
        full_key: &str,
        fetch: F,
    ) -> std::result::Result<(T, Vec<u8>), E>
    where
        T: Serialize,
        E: From<DeskError>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
    {
        let generation = self.generation.load(Ordering::Acquire);

        let start = Instant::now();
        let outcome = fetch().await;
        self.metrics
            .record_latency(CacheOperation::Fetch, start.elapsed());
        self.metrics.record_fetch(full_key, outcome.is_ok());
        let value = outcome?;

        let serialize_start = Instant::now();
        let payload = self.serializer.serialize(&value)?;
        self.metrics
            .record_latency(CacheOperation::Serialize, serialize_start.elapsed());

        let now = self.clock.now();
        if self.generation.load(Ordering::Acquire) == generation {
            let entry = CacheEntry::new(payload.clone(), payload.len(), now, self.config.ttl);
            let set_start = Instant::now();
            self.backend.set(full_key, entry).await?;
            self.metrics
                .record_latency(CacheOperation::Set, set_start.elapsed());
            self.state.write().last_fetch = Some(now);
        } else {
            debug!(
                target: "order_desk",
                key = %full_key,
                "cache invalidated during fetch; result not stored"
            );
        }

        Ok((value, payload))
    }

    /// Drop every cached entry
    ///
    /// Call after any successful mutation: one changed order can move
    /// priorities and page counts of every cached view. Returns the number of
    /// entries removed.
    pub async fn invalidate_all(&self) -> Result<u64> {
        let start = Instant::now();
        self.generation.fetch_add(1, Ordering::AcqRel);
        // Later misses must not join a fetch that started before the mutation
        self.coalescer.abandon_all();
        let removed = self.backend.clear().await?;
        self.state.write().invalidations += 1;

        self.metrics
            .record_latency(CacheOperation::Invalidate, start.elapsed());
        self.metrics.record_invalidation(removed);
        debug!(target: "order_desk", removed, "query cache invalidated");
        Ok(removed)
    }

    /// Remove entries already past their TTL
    pub async fn purge_expired(&self) -> Result<u64> {
        self.backend.purge_expired(self.clock.now()).await
    }

    /// Whether a forced refresh is due
    ///
    /// True once more than `refresh_after` has passed since the last stored
    /// fetch, or when nothing was stored yet.
    pub fn needs_refresh(&self) -> bool {
        match self.state.read().last_fetch {
            Some(last) => {
                let elapsed = self
                    .clock
                    .now()
                    .signed_duration_since(last)
                    .to_std()
                    .unwrap_or_default();
                elapsed > self.config.refresh_after
            }
            None => true,
        }
    }

    /// Time of the last fetch whose result was stored
    pub fn last_fetch(&self) -> Option<DateTime<Utc>> {
        self.state.read().last_fetch
    }

    /// Get cache statistics
    pub async fn stats(&self) -> Result<CacheStats> {
        let mut stats = self.backend.stats().await?;
        let state = self.state.read();
        stats.hits = state.hits;
        stats.misses = state.misses;
        stats.expired = state.expired;
        stats.invalidations = state.invalidations;
        self.metrics.record_size(stats.size, stats.memory_bytes);
        Ok(stats)
    }

    /// Get the number of entries
    pub async fn len(&self) -> Result<usize> {
        self.backend.len().await
    }

    /// Check if cache is empty
    pub async fn is_empty(&self) -> Result<bool> {
        self.backend.is_empty().await
    }

    /// Deserialize a cache entry
    fn deserialize_entry<T>(&self, entry: CacheEntry<Vec<u8>>) -> Result<CacheEntry<T>>
    where
        T: DeserializeOwned,
    {
        let deserialize_start = Instant::now();
        let value: T = self.serializer.deserialize(&entry.value)?;
        self.metrics
            .record_latency(CacheOperation::Deserialize, deserialize_start.elapsed());

        Ok(entry.map(|_| value))
    }
}

impl<B, S, M> Clone for QueryCache<B, S, M>
where
    B: CacheBackend,
    S: Serializer,
    M: CacheMetrics,
{
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            serializer: self.serializer.clone(),
            metrics: self.metrics.clone(),
            clock: self.clock.clone(),
            config: self.config.clone(),
            coalescer: self.coalescer.clone(),
            state: self.state.clone(),
            generation: self.generation.clone(),
        }
    }
}

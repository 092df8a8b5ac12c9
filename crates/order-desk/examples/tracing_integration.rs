use order_desk::prelude::*;
use order_desk::{JsonSerializer, TracingMetrics};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing subscriber
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::TRACE) // TRACE shows latency events
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| DeskError::Internal(e.to_string()))?;

    // 2. Create the cache with TracingMetrics
    let backend = MemoryBackend::new(MemoryConfig::default());
    let metrics = TracingMetrics::new().with_service_name("order-desk-example");
    let cache = QueryCache::with_serializer_and_metrics(
        backend,
        JsonSerializer,
        metrics,
        QueryCacheConfig::default(),
    );

    let query = OrderQuery::new().search("oud");
    let fetch = || async { Ok::<_, DeskError>(OrderPage::default()) };

    println!("\n-> First load (miss, fetch)...");
    cache.get_or_fetch(&query, fetch, false).await?;

    println!("\n-> Second load (hit)...");
    cache.get_or_fetch(&query, fetch, false).await?;

    println!("\n-> Invalidate after a mutation...");
    cache.invalidate_all().await?;

    println!("\nCheck the console output for structured events under target `order_desk`.");

    Ok(())
}

use order_desk::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::time::sleep;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    // 1. Setup cache
    let cache = QueryCache::new(MemoryBackend::new(MemoryConfig::default()));

    // 2. Shared counter to track actual backend calls
    let fetch_count = Arc::new(AtomicUsize::new(0));

    let mut handles = Vec::new();
    let query = OrderQuery::new().status(OrderStatus::Pending);

    println!("Spawning 10 concurrent loads of the pending orders view...");

    // 3. Launch concurrent requests
    for _ in 0..10 {
        let cache = cache.clone();
        let fetch_count = fetch_count.clone();
        let query = query.clone();

        handles.push(tokio::spawn(async move {
            let page: OrderPage = cache
                .get_or_fetch(
                    &query,
                    || async move {
                        // Simulate a slow backend (100ms)
                        sleep(Duration::from_millis(100)).await;
                        let count = fetch_count.fetch_add(1, Ordering::SeqCst) + 1;
                        println!("Fetching... (count: {})", count);
                        Ok::<_, DeskError>(OrderPage::default())
                    },
                    false,
                )
                .await?;
            Ok::<_, DeskError>(page)
        }));
    }

    // 4. Wait for all to complete
    for h in handles {
        h.await??;
    }

    // 5. Verify coalescing
    let total_fetches = fetch_count.load(Ordering::SeqCst);
    println!("Total backend fetches performed: {}", total_fetches);

    if total_fetches != 1 {
        return Err(format!("expected 1 fetch, got {}", total_fetches).into());
    }
    println!("SUCCESS: Concurrent loads were coalesced!");

    Ok(())
}

//! Order list with priority badges, backed by an in-memory source

use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use order_desk::prelude::*;
use order_desk::{Pagination, PrioritySummary};
use std::sync::Mutex;

/// Stand-in for the REST backend
struct InMemorySource {
    orders: Mutex<Vec<Order>>,
}

#[async_trait]
impl OrderSource for InMemorySource {
    type Error = DeskError;

    async fn fetch_page(&self, query: &OrderQuery) -> Result<OrderPage> {
        println!("   -> backend fetch for page {}", query.page);
        let orders: Vec<Order> = self
            .orders
            .lock()
            .map_err(|e| DeskError::Source(e.to_string()))?
            .iter()
            .filter(|o| query.status.is_none_or(|s| o.status == s))
            .cloned()
            .collect();
        let total_orders = orders.len() as u64;
        Ok(OrderPage {
            orders,
            pagination: Pagination {
                current_page: query.page,
                total_pages: 1,
                total_orders,
                limit: 10,
            },
        })
    }

    async fn update_status(&self, order_id: &str, status: OrderStatus) -> Result<()> {
        let mut orders = self
            .orders
            .lock()
            .map_err(|e| DeskError::Source(e.to_string()))?;
        match orders.iter_mut().find(|o| o.order_id == order_id) {
            Some(order) => {
                order.status = status;
                Ok(())
            }
            None => Err(DeskError::Source(format!("order {order_id} not found"))),
        }
    }

    async fn update_order(&self, order_id: &str, patch: &OrderPatch) -> Result<()> {
        let mut orders = self
            .orders
            .lock()
            .map_err(|e| DeskError::Source(e.to_string()))?;
        let order = orders
            .iter_mut()
            .find(|o| o.order_id == order_id)
            .ok_or_else(|| DeskError::Source(format!("order {order_id} not found")))?;
        if let Some(payment) = patch.payment_status {
            order.payment_status = payment;
        }
        Ok(())
    }
}

fn print_page(page: &AnnotatedPage) {
    for order in &page.orders {
        let badge = order.class().map(|c| c.as_str()).unwrap_or("-");
        println!(
            "   {:<8} {:<10} {:>10.2} {:>3}d score {:>5} [{}]",
            order.order_id,
            order.status,
            order.total_amount,
            order.days_pending,
            order.priority_score,
            badge
        );
    }
    let summary: PrioritySummary = page.summary();
    println!("   {} flagged of {}\n", summary.flagged(), page.orders.len());
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    println!("=== order-desk Order List Example ===\n");

    let now = Utc::now();
    let source = InMemorySource {
        orders: Mutex::new(vec![
            Order::new(
                "ORD-1001",
                Some(now - TimeDelta::days(9)),
                OrderStatus::Pending,
                120_000.0,
                PaymentStatus::Failed,
            )
            .with_expected_delivery(now - TimeDelta::days(2)),
            Order::new(
                "ORD-1002",
                Some(now - TimeDelta::days(4)),
                OrderStatus::Pending,
                2_400.0,
                PaymentStatus::Pending,
            ),
            Order::new(
                "ORD-1003",
                Some(now - TimeDelta::days(6)),
                OrderStatus::Processing,
                60_000.0,
                PaymentStatus::Success,
            ),
            Order::new(
                "ORD-1004",
                Some(now),
                OrderStatus::Shipped,
                950.0,
                PaymentStatus::Success,
            ),
        ]),
    };

    let permissions: PermissionSet = ["orders.view", "orders.edit"].into_iter().collect();
    permissions.require("orders.view")?;

    let desk = OrderDesk::new(source);
    let by_priority = OrderQuery::new().sort(SortField::Priority, SortDirection::Desc);

    println!("First load:");
    print_page(&desk.list_orders(&by_priority, false).await?);

    println!("Second load (cached):");
    print_page(&desk.list_orders(&by_priority, false).await?);

    println!("Overdue only:");
    let overdue = by_priority.clone().priority(PriorityClass::Overdue);
    print_page(&desk.list_orders(&overdue, false).await?);

    permissions.require("orders.edit")?;
    desk.update_status("ORD-1001", OrderStatus::Processing).await?;
    println!("After status change (cache cleared):");
    print_page(&desk.list_orders(&by_priority, false).await?);

    let stats = desk.cache().stats().await?;
    println!(
        "Cache: {} hits, {} misses, {} invalidations",
        stats.hits, stats.misses, stats.invalidations
    );

    Ok(())
}

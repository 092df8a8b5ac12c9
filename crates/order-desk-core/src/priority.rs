//! Order priority engine
//!
//! Derives urgency fields from an order and the current instant:
//! days pending, overdue flag and an additive priority score. The engine
//! holds no state and does no I/O; the same order annotated twice at the
//! same instant yields the same result.
//!
//! Score contributions, all independent and additive:
//!
//! | condition | points |
//! |---|---|
//! | overdue | `1000 + 10 × days past delivery date` |
//! | pending > 7 days | `500 + 5 × days` |
//! | pending > 3 days | `300 + 3 × days` |
//! | pending > 1 day | `100 + days` |
//! | processing > 5 days | `200 + 2 × days` |
//! | processing otherwise | `50 + days` |
//! | total > 100 000 | `100` |
//! | total > 50 000 | `50` |
//! | payment failed | `300` |
//! | payment pending | `150` |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

use crate::{Order, OrderStatus, Pagination, PaymentStatus, SortDirection};

const OVERDUE_BASE: u64 = 1000;
const OVERDUE_PER_DAY: u64 = 10;
const HIGH_VALUE_THRESHOLD: f64 = 100_000.0;
const MID_VALUE_THRESHOLD: f64 = 50_000.0;
const FAILED_PAYMENT_POINTS: u64 = 300;
const PENDING_PAYMENT_POINTS: u64 = 150;

/// Display class derived from score and flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityClass {
    Overdue,
    Urgent,
    High,
    Medium,
}

impl PriorityClass {
    /// Get class as its wire label
    pub fn as_str(&self) -> &'static str {
        match self {
            PriorityClass::Overdue => "overdue",
            PriorityClass::Urgent => "urgent",
            PriorityClass::High => "high",
            PriorityClass::Medium => "medium",
        }
    }
}

impl fmt::Display for PriorityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// An order together with its derived urgency fields
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedOrder {
    #[serde(flatten)]
    pub order: Order,
    /// Whole days since creation, 0 when unknown
    pub days_pending: u64,
    /// Delivery date passed and not delivered
    pub is_overdue: bool,
    /// Additive urgency score
    pub priority_score: u64,
}

impl AnnotatedOrder {
    /// Recompute the derived fields at `now`
    pub fn reannotate(&self, now: DateTime<Utc>) -> AnnotatedOrder {
        annotate(&self.order, now)
    }

    /// Display class of this order
    pub fn class(&self) -> Option<PriorityClass> {
        classify(self)
    }
}

impl Deref for AnnotatedOrder {
    type Target = Order;

    fn deref(&self) -> &Order {
        &self.order
    }
}

/// A page of annotated orders
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnnotatedPage {
    pub orders: Vec<AnnotatedOrder>,
    pub pagination: Pagination,
}

impl AnnotatedPage {
    /// Per-class counts of the orders on this page
    pub fn summary(&self) -> PrioritySummary {
        PrioritySummary::from_orders(&self.orders)
    }
}

/// Whole days from `from` to `to`, truncated, never negative
fn whole_days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> u64 {
    u64::try_from(to.signed_duration_since(from).num_days()).unwrap_or(0)
}

fn status_points(status: OrderStatus, days_pending: u64) -> u64 {
    match status {
        OrderStatus::Pending if days_pending > 7 => 500 + 5 * days_pending,
        OrderStatus::Pending if days_pending > 3 => 300 + 3 * days_pending,
        OrderStatus::Pending if days_pending > 1 => 100 + days_pending,
        OrderStatus::Pending => 0,
        OrderStatus::Processing if days_pending > 5 => 200 + 2 * days_pending,
        OrderStatus::Processing => 50 + days_pending,
        OrderStatus::Shipped
        | OrderStatus::Delivered
        | OrderStatus::Cancelled
        | OrderStatus::Unknown => 0,
    }
}

fn value_points(total_amount: f64) -> u64 {
    if total_amount > HIGH_VALUE_THRESHOLD {
        100
    } else if total_amount > MID_VALUE_THRESHOLD {
        50
    } else {
        0
    }
}

fn payment_points(payment_status: PaymentStatus) -> u64 {
    match payment_status {
        PaymentStatus::Failed => FAILED_PAYMENT_POINTS,
        PaymentStatus::Pending => PENDING_PAYMENT_POINTS,
        PaymentStatus::Success | PaymentStatus::Refunded | PaymentStatus::Unknown => 0,
    }
}

/// Annotate an order with its urgency fields at `now`
pub fn annotate(order: &Order, now: DateTime<Utc>) -> AnnotatedOrder {
    let days_pending = order
        .created_at
        .map(|created| whole_days_between(created, now))
        .unwrap_or(0);

    let overdue_since = order
        .expected_delivery_date
        .filter(|expected| now > *expected && order.status != OrderStatus::Delivered);
    let is_overdue = overdue_since.is_some();

    let mut priority_score = 0;
    if let Some(expected) = overdue_since {
        // Days past the delivery date, not days since creation
        priority_score += OVERDUE_BASE + OVERDUE_PER_DAY * whole_days_between(expected, now);
    }
    priority_score += status_points(order.status, days_pending);
    priority_score += value_points(order.total_amount);
    priority_score += payment_points(order.payment_status);

    AnnotatedOrder {
        order: order.clone(),
        days_pending,
        is_overdue,
        priority_score,
    }
}

/// Annotate an order against the wall clock
pub fn annotate_now(order: &Order) -> AnnotatedOrder {
    annotate(order, Utc::now())
}

/// Classify an annotated order; first match wins
pub fn classify(order: &AnnotatedOrder) -> Option<PriorityClass> {
    if order.is_overdue {
        Some(PriorityClass::Overdue)
    } else if order.order.status == OrderStatus::Pending && order.days_pending > 7 {
        Some(PriorityClass::Urgent)
    } else if order.priority_score > 300 {
        Some(PriorityClass::High)
    } else if order.priority_score > 100 {
        Some(PriorityClass::Medium)
    } else {
        None
    }
}

/// Stable sort by priority score; equal scores keep their incoming order
pub fn sort_by_priority(orders: &mut [AnnotatedOrder], direction: SortDirection) {
    match direction {
        SortDirection::Desc => orders.sort_by(|a, b| b.priority_score.cmp(&a.priority_score)),
        SortDirection::Asc => orders.sort_by(|a, b| a.priority_score.cmp(&b.priority_score)),
    }
}

/// Keep only the orders of the given class, preserving order
pub fn filter_by_priority(
    orders: Vec<AnnotatedOrder>,
    class: PriorityClass,
) -> Vec<AnnotatedOrder> {
    orders
        .into_iter()
        .filter(|order| classify(order) == Some(class))
        .collect()
}

/// Per-class order counts for dashboard badges
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrioritySummary {
    pub overdue: u64,
    pub urgent: u64,
    pub high: u64,
    pub medium: u64,
    pub unclassified: u64,
}

impl PrioritySummary {
    /// Count the orders of each class
    pub fn from_orders<'a, I>(orders: I) -> Self
    where
        I: IntoIterator<Item = &'a AnnotatedOrder>,
    {
        let mut summary = Self::default();
        for order in orders {
            match classify(order) {
                Some(PriorityClass::Overdue) => summary.overdue += 1,
                Some(PriorityClass::Urgent) => summary.urgent += 1,
                Some(PriorityClass::High) => summary.high += 1,
                Some(PriorityClass::Medium) => summary.medium += 1,
                None => summary.unclassified += 1,
            }
        }
        summary
    }

    /// Orders needing attention (any class)
    pub fn flagged(&self) -> u64 {
        self.overdue + self.urgent + self.high + self.medium
    }
}

//! Order records as delivered by the REST backend

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::DeskError;

/// Fulfilment status of an order
///
/// Labels this crate does not know deserialize as `Unknown`, which scores no
/// status points, so one odd record never fails a whole page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    /// Get status as its wire label
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "processing" => Ok(OrderStatus::Processing),
            "shipped" => Ok(OrderStatus::Shipped),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            "unknown" => Ok(OrderStatus::Unknown),
            other => Err(DeskError::Deserialization(format!(
                "unknown order status: {other}"
            ))),
        }
    }
}

/// Payment status of an order; unrecognised labels become `Unknown`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Success,
    Failed,
    Refunded,
    #[serde(other)]
    Unknown,
}

impl PaymentStatus {
    /// Get status as its wire label
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Success => "success",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Refunded => "refunded",
            PaymentStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// An order as returned by the backend
///
/// Only the fields the priority engine reads are typed. Everything else the
/// backend sends (customer, line items, address) is kept in `extra` so the
/// record can be handed to the display layer unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Stable, unique order identifier
    pub order_id: String,
    /// Creation time; `None` when missing or unparseable
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    /// Fulfilment status
    pub status: OrderStatus,
    /// Order value in currency units
    #[serde(default, deserialize_with = "lenient_amount")]
    pub total_amount: f64,
    /// Payment status
    pub payment_status: PaymentStatus,
    /// Promised delivery date; `None` means no deadline
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub expected_delivery_date: Option<DateTime<Utc>>,
    /// Fields not interpreted here
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Order {
    /// Create an order with the fields the engine reads
    pub fn new(
        order_id: impl Into<String>,
        created_at: Option<DateTime<Utc>>,
        status: OrderStatus,
        total_amount: f64,
        payment_status: PaymentStatus,
    ) -> Self {
        Self {
            order_id: order_id.into(),
            created_at,
            status,
            total_amount,
            payment_status,
            expected_delivery_date: None,
            extra: Map::new(),
        }
    }

    /// Set the expected delivery date
    pub fn with_expected_delivery(mut self, date: DateTime<Utc>) -> Self {
        self.expected_delivery_date = Some(date);
        self
    }
}

/// Pagination metadata of an order list page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub current_page: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_orders: u64,
    #[serde(default)]
    pub limit: u32,
}

/// One page of the order list, as returned by the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderPage {
    #[serde(default)]
    pub orders: Vec<Order>,
    #[serde(default)]
    pub pagination: Pagination,
}

/// Field edits sent to the backend for a single order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_delivery_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_notes: Option<String>,
}

impl OrderPatch {
    /// True when the patch changes nothing
    pub fn is_empty(&self) -> bool {
        self.payment_status.is_none()
            && self.expected_delivery_date.is_none()
            && self.tracking_number.is_none()
            && self.admin_notes.is_none()
    }
}

/// Parse a backend timestamp
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS` (with optional `T` separator and
/// fractional seconds, read as UTC) and bare `YYYY-MM-DD` (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::String(s)) => parse_timestamp(&s),
        // Epoch milliseconds
        Some(Value::Number(n)) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    })
}

fn lenient_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2024-03-01T12:30:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-01T14:30:00+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-01 12:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-01T12:30:00.000"), Some(expected));
        assert_eq!(
            parse_timestamp("2024-03-01"),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_parse_timestamp_garbage() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("   "), None);
        assert_eq!(parse_timestamp("not a date"), None);
        assert_eq!(parse_timestamp("2024-13-45"), None);
    }

    #[test]
    fn test_deserialize_backend_order() {
        let json = r#"{
            "order_id": "ORD-1001",
            "created_at": "2024-03-01T08:00:00Z",
            "status": "pending",
            "total_amount": 120000,
            "payment_status": "failed",
            "expected_delivery_date": "2024-03-05",
            "customer_name": "Aline"
        }"#;

        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.order_id, "ORD-1001");
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.payment_status, PaymentStatus::Failed);
        assert_eq!(order.total_amount, 120000.0);
        assert_eq!(
            order.expected_delivery_date,
            Some(Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap())
        );
        assert_eq!(order.extra.get("customer_name"), Some(&Value::from("Aline")));
    }

    #[test]
    fn test_deserialize_dirty_fields() {
        let json = r#"{
            "order_id": "ORD-1002",
            "created_at": "yesterday-ish",
            "status": "processing",
            "total_amount": "5400.50",
            "payment_status": "success",
            "expected_delivery_date": null
        }"#;

        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.created_at, None);
        assert_eq!(order.expected_delivery_date, None);
        assert_eq!(order.total_amount, 5400.5);
    }

    #[test]
    fn test_deserialize_missing_optional_fields() {
        let json = r#"{"order_id": "ORD-1003", "status": "shipped", "payment_status": "pending"}"#;

        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.created_at, None);
        assert_eq!(order.total_amount, 0.0);
        assert!(order.extra.is_empty());
    }

    #[test]
    fn test_unknown_labels_fall_back() {
        let json = r#"{"order_id": "x", "status": "lost", "payment_status": "chargeback"}"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.status, OrderStatus::Unknown);
        assert_eq!(order.payment_status, PaymentStatus::Unknown);

        assert!("lost".parse::<OrderStatus>().is_err());
        assert_eq!("shipped".parse::<OrderStatus>().unwrap(), OrderStatus::Shipped);
    }

    #[test]
    fn test_page_with_one_odd_order_still_decodes() {
        let json = r#"{
            "orders": [
                {"order_id": "A", "status": "pending", "payment_status": "success"},
                {"order_id": "B", "status": "on_hold", "payment_status": "success"}
            ],
            "pagination": {"current_page": 1, "total_pages": 1, "total_orders": 2, "limit": 10}
        }"#;

        let page: OrderPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.orders.len(), 2);
        assert_eq!(page.orders[1].status, OrderStatus::Unknown);
    }

    #[test]
    fn test_page_survives_reencoding() {
        let created = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        let page = OrderPage {
            orders: vec![Order::new(
                "ORD-1",
                Some(created),
                OrderStatus::Pending,
                990.0,
                PaymentStatus::Pending,
            )],
            pagination: Pagination {
                current_page: 1,
                total_pages: 3,
                total_orders: 25,
                limit: 10,
            },
        };

        let bytes = serde_json::to_vec(&page).unwrap();
        let decoded: OrderPage = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(decoded, page);
    }

    #[test]
    fn test_patch_is_empty() {
        assert!(OrderPatch::default().is_empty());
        let patch = OrderPatch {
            tracking_number: Some("TRK-42".into()),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}

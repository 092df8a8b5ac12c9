//! Order list query parameters

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::{CacheKey, OrderStatus, PriorityClass};

/// Field the order list is sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    CreatedAt,
    TotalAmount,
    Status,
    Priority,
}

impl SortField {
    /// Get field as its wire label
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "created_at",
            SortField::TotalAmount => "total_amount",
            SortField::Status => "status",
            SortField::Priority => "priority",
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    /// Get direction as its wire label
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Parameters of one order list view
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderQuery {
    /// 1-based page number
    pub page: u32,
    /// Free-text search
    pub search: String,
    /// Status filter; `None` means all statuses
    pub status: Option<OrderStatus>,
    /// Priority filter; `None` means all orders
    pub priority: Option<PriorityClass>,
    pub sort_by: SortField,
    pub sort_dir: SortDirection,
}

impl Default for OrderQuery {
    fn default() -> Self {
        Self {
            page: 1,
            search: String::new(),
            status: None,
            priority: None,
            sort_by: SortField::default(),
            sort_dir: SortDirection::default(),
        }
    }
}

impl OrderQuery {
    /// Create the default first-page query
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page
    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Set the search text
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// Filter by status
    pub fn status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Filter by priority class
    pub fn priority(mut self, priority: PriorityClass) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Set the sort field and direction
    pub fn sort(mut self, field: SortField, direction: SortDirection) -> Self {
        self.sort_by = field;
        self.sort_dir = direction;
        self
    }

    /// Canonical name/value pairs, sorted by name
    fn canonical_fields(&self) -> BTreeMap<&'static str, Value> {
        let mut fields = BTreeMap::new();
        fields.insert("page", Value::from(self.page));
        fields.insert("search", Value::from(self.search.as_str()));
        fields.insert(
            "status",
            Value::from(self.status.map(|s| s.as_str()).unwrap_or("all")),
        );
        fields.insert(
            "priority",
            Value::from(self.priority.map(|p| p.as_str()).unwrap_or("all")),
        );
        fields.insert("sort_by", Value::from(self.sort_by.as_str()));
        fields.insert("sort_dir", Value::from(self.sort_dir.as_str()));
        fields
    }
}

impl CacheKey for OrderQuery {
    fn cache_key(&self) -> String {
        self.canonical_fields()
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("&")
    }

    fn namespace(&self) -> Option<&str> {
        Some("orders")
    }
}

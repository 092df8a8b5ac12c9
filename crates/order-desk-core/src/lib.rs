//! order-desk-core: Core types and traits for the order-desk back office
//!
//! This crate provides the order model, the priority engine, the permission
//! check, and the traits and types shared by the cache layers.

mod clock;
mod error;
mod order;
mod permissions;
pub mod priority;
mod query;
mod traits;
mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{DeskError, Result};
pub use order::{
    Order, OrderPage, OrderPatch, OrderStatus, Pagination, PaymentStatus, parse_timestamp,
};
pub use permissions::{ALL_PERMISSIONS, PermissionSet, can_i};
pub use priority::{
    AnnotatedOrder, AnnotatedPage, PriorityClass, PrioritySummary, annotate, annotate_now,
    classify, filter_by_priority, sort_by_priority,
};
pub use query::{OrderQuery, SortDirection, SortField};
pub use traits::*;
pub use types::*;

//! Error types for order-desk operations

use thiserror::Error;

/// Main error type for all order-desk operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeskError {
    /// Serialization failed
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Deserialization failed
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// The order source (REST backend) rejected or failed a request
    #[error("order source error: {0}")]
    Source(String),

    /// The caller lacks the permission for an action
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type alias for order-desk operations
pub type Result<T> = std::result::Result<T, DeskError>;

//! Pluggable serialization trait

use crate::DeskError;
use serde::{Serialize, de::DeserializeOwned};

/// Trait for the format cached payloads are stored in
pub trait Serializer: Send + Sync + Clone + 'static {
    /// Name of the serializer (for debugging/metrics)
    fn name(&self) -> &str;

    /// Serialize a value to bytes
    fn serialize<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, DeskError>;

    /// Deserialize bytes to a value
    fn deserialize<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, DeskError>;
}

/// JSON serializer (default)
///
/// Backend payloads arrive as JSON, so this keeps cached pages byte-comparable
/// with what the REST backend sent.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl Serializer for JsonSerializer {
    fn name(&self) -> &str {
        "json"
    }

    fn serialize<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, DeskError> {
        serde_json::to_vec(value).map_err(|e| DeskError::Serialization(e.to_string()))
    }

    fn deserialize<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, DeskError> {
        serde_json::from_slice(bytes).map_err(|e| DeskError::Deserialization(e.to_string()))
    }
}

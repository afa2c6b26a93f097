//! Pure functions for serializing/deserializing drafts to/from cache bytes.
//!
//! Drafts are cached as JSON so cached values stay readable from `redis-cli`.

use thiserror::Error;

use crate::draft::Draft;

/// Errors that can occur during cache serialization/deserialization.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SerializationError {
    /// Failed to serialize a value to bytes.
    #[error("Failed to serialize: {0}")]
    SerializeFailed(String),
    /// Failed to deserialize bytes to a value.
    #[error("Failed to deserialize: {0}")]
    DeserializeFailed(String),
}

/// Result type for serialization operations.
pub type Result<T> = std::result::Result<T, SerializationError>;

/// Serializes a draft to JSON bytes.
///
/// The password is included: cached values are only read back by the
/// trusted repository layer.
pub fn serialize_draft(draft: &Draft) -> Result<Vec<u8>> {
    serde_json::to_vec(draft).map_err(|e| SerializationError::SerializeFailed(e.to_string()))
}

/// Deserializes JSON bytes to a draft.
pub fn deserialize_draft(bytes: &[u8]) -> Result<Draft> {
    serde_json::from_slice(bytes).map_err(|e| SerializationError::DeserializeFailed(e.to_string()))
}

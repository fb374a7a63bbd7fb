//! JSON codec for model objects.

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Serialize a model object to JSON bytes.
///
/// # Errors
///
/// Returns error if the value cannot be represented as JSON.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, CodecError> {
    serde_json::to_vec(value).map_err(|e| CodecError::Encode(e.to_string()))
}

/// Deserialize a model object from JSON bytes.
///
/// # Errors
///
/// Returns error if the bytes are not valid JSON for `T`.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError> {
    serde_json::from_slice(bytes).map_err(|e| CodecError::Decode(e.to_string()))
}

/// Errors that can occur while encoding or decoding model objects.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// Serialization failed
    #[error("JSON encode error: {0}")]
    Encode(String),
    /// Deserialization failed
    #[error("JSON decode error: {0}")]
    Decode(String),
}

//! Error types for key-level operations.

use thiserror::Error;

/// Result type for key operations.
pub type KeyResult<T> = Result<T, KeyError>;

/// Errors raised by a single [`DataKey`](crate::DataKey) or [`AnyKey`](crate::AnyKey).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    /// The key has no string codec, so it cannot be parsed from or rendered to text.
    #[error("Key '{key}' has no string codec")]
    NoCodec {
        /// Name of the key.
        key: String,
    },

    /// The codec rejected the input text.
    #[error("Could not decode '{input}' for key '{key}': {reason}")]
    Decode {
        /// Name of the key.
        key: String,
        /// Text that failed to decode.
        input: String,
        /// Reason reported by the codec.
        reason: String,
    },

    /// A value of the wrong type was offered to a key.
    #[error("Key '{key}' expects values of type {expected}, got {actual}")]
    TypeMismatch {
        /// Name of the key.
        key: String,
        /// Type the key holds.
        expected: String,
        /// Type that was offered.
        actual: String,
    },
}

impl KeyError {
    /// Creates a type mismatch error.
    pub fn type_mismatch(
        key: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            key: key.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Returns the name of the key this error refers to.
    pub fn key(&self) -> &str {
        match self {
            Self::NoCodec { key } | Self::Decode { key, .. } | Self::TypeMismatch { key, .. } => {
                key
            }
        }
    }
}

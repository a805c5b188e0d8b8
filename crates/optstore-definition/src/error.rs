//! Definition and store error types.

use thiserror::Error;

use optstore_core::KeyError;

/// Result type for schema operations.
pub type DefinitionResult<T> = Result<T, DefinitionError>;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised while building or querying a definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    /// Two keys of one definition share a name.
    #[error("Duplicate key name: '{name}'")]
    DuplicateKey {
        /// The repeated name.
        name: String,
    },

    /// A key was added twice to one section.
    #[error("Datakey clash for name '{name}'")]
    KeyClash {
        /// The repeated name.
        name: String,
    },

    /// Lookup of a name the definition does not contain.
    #[error("Key '{name}' not found in definition '{definition}'")]
    KeyNotFound {
        /// The requested name.
        name: String,
        /// Name of the definition that was searched.
        definition: String,
    },

    /// The key exists but holds another value type.
    #[error("Key '{name}' holds values of type {actual}, not {expected}")]
    KeyTypeMismatch {
        /// The requested name.
        name: String,
        /// Type the caller asked for.
        expected: String,
        /// Type the key holds.
        actual: String,
    },

    /// Index lookup of a name the definition does not contain.
    #[error("Key '{name}' not present in this definition: {available:?}")]
    IndexNotFound {
        /// The requested name.
        name: String,
        /// Every name the definition does contain.
        available: Vec<String>,
    },
}

/// Errors raised by a [`DataStore`](crate::DataStore).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Write or read of a key outside the store's definition.
    #[error("Key '{key}' is not part of definition '{definition}'")]
    KeyNotInDefinition {
        /// The key name.
        key: String,
        /// Name of the store's definition.
        definition: String,
    },

    /// Strict store without a value for the key.
    #[error("No value present in store '{store}' for key '{key}'")]
    NoValue {
        /// The key name.
        key: String,
        /// Name of the store.
        store: String,
    },

    /// No stored value and the key has no default.
    #[error("No value for key '{key}' and the key has no default")]
    NoDefault {
        /// The key name.
        key: String,
    },

    /// The key is recorded as present but its value was never defined.
    #[error("Key '{key}' is present in store '{store}' but its value is undefined")]
    UndefinedValue {
        /// The key name.
        key: String,
        /// Name of the store.
        store: String,
    },

    /// `add` on a key that already has a value.
    #[error("Key '{key}' already has a value")]
    AlreadyPresent {
        /// The key name.
        key: String,
    },

    /// `replace` on a key without a value.
    #[error("Key '{key}' has no value to replace")]
    NotPresent {
        /// The key name.
        key: String,
    },

    /// A `name=value` argument with nothing before the `=`.
    #[error("Found empty key string in argument '{argument}'")]
    EmptyArgumentKey {
        /// The offending argument.
        argument: String,
    },

    /// Key-level failure.
    #[error(transparent)]
    Key(#[from] KeyError),

    /// Schema-level failure.
    #[error(transparent)]
    Definition(#[from] DefinitionError),
}

/// Renders an optional definition or store name.
pub(crate) fn display_name(name: Option<&str>) -> String {
    name.unwrap_or("null").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_message() {
        let err = DefinitionError::DuplicateKey {
            name: "testString".into(),
        };
        assert_eq!(err.to_string(), "Duplicate key name: 'testString'");
    }

    #[test]
    fn test_index_message_lists_names() {
        let err = DefinitionError::IndexNotFound {
            name: "missing.key".into(),
            available: vec!["a".into(), "b".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("Key 'missing.key' not present in this definition"));
        assert!(msg.contains("\"a\", \"b\""));
    }

    #[test]
    fn test_store_error_wraps_key_error() {
        let err: StoreError = KeyError::NoCodec { key: "k".into() }.into();
        assert_eq!(err.to_string(), "Key 'k' has no string codec");
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name(None), "null");
        assert_eq!(display_name(Some("App")), "App");
        assert_eq!(display_name(Some("")), "");
    }
}

//! CLI error types.

use thiserror::Error;

use optstore_definition::{DefinitionError, StoreError};

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// The demo definition could not be built.
    #[error("Definition error: {0}")]
    Definition(#[from] DefinitionError),

    /// Options could not be applied.
    #[error("Invalid options: {0}")]
    Store(#[from] StoreError),
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;

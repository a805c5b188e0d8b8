//! CLI command implementations.

pub mod apply;
pub mod describe;
pub mod help;

// Re-export submodules for convenience
pub use apply::ApplyArgs;
pub use describe::DescribeArgs;

use optstore_definition::GenericStoreDefinition;

use crate::demo;
use crate::error::CliResult;

/// Builds the demo definition every command works on.
fn load_definition() -> CliResult<GenericStoreDefinition> {
    Ok(demo::definition()?)
}

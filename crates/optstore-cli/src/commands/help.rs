//! Help command implementation.
//!
//! Prints the usage text for `name=value` options of the demo definition.

use anyhow::Result;

use optstore_definition::CommandLineArgs;

/// Execute the help-options command.
pub fn execute() -> Result<()> {
    let definition = super::load_definition()?;
    print!("{}", CommandLineArgs::new(&definition).help());
    Ok(())
}

//! Apply command implementation.
//!
//! Applies `name=value` options to a store over the demo definition and prints
//! every key with its resulting value.

use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use optstore_core::{AnyKey, RawValue};
use optstore_definition::{CommandLineArgs, DataStore, StoreDefinition};

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::output::{print_info, print_output, print_warning, MinimalLine};

/// Arguments for the apply command.
#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Options of the form name=value
    pub assignments: Vec<String>,
}

/// Where a value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Set on the command line.
    Set,
    /// The key's default.
    Default,
    /// No value and no default.
    Unset,
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Source::Set => "set",
            Source::Default => "default",
            Source::Unset => "unset",
        };
        f.write_str(text)
    }
}

/// One key with its resulting value.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct ValueRow {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Source")]
    pub source: Source,
}

impl MinimalLine for ValueRow {
    fn minimal_line(&self) -> String {
        format!("{}={}", self.key, self.value)
    }
}

/// Execute the apply command.
pub fn execute(args: ApplyArgs, format: OutputFormat) -> Result<()> {
    let definition: Arc<dyn StoreDefinition> =
        Arc::new(super::load_definition()?);
    let mut store = DataStore::closed(Arc::clone(&definition));

    let applied = CommandLineArgs::new(&*definition)
        .apply(&mut store, &args.assignments)
        .map_err(CliError::from)?;
    tracing::debug!(applied, total = args.assignments.len(), "options applied");

    if applied < args.assignments.len() {
        print_warning(&format!(
            "{} of {} options were ignored (set RUST_LOG=info for details)",
            args.assignments.len() - applied,
            args.assignments.len()
        ));
    }
    if format == OutputFormat::Table {
        print_info(&format!("Applied {} option(s) to {}", applied, store));
    }

    print_output(&rows(&*definition, &store), format)
}

fn rows(definition: &dyn StoreDefinition, store: &DataStore) -> Vec<ValueRow> {
    definition
        .keys()
        .iter()
        .map(|key| {
            let (value, source) = match (store.get_raw(key), key.default_raw()) {
                (Some(value), _) => (render(key, &value), Source::Set),
                (None, Some(default)) => (render(key, &default), Source::Default),
                (None, None) => ("-".to_string(), Source::Unset),
            };
            ValueRow {
                key: key.name().to_string(),
                value,
                source,
            }
        })
        .collect()
}

fn render(key: &AnyKey, value: &RawValue) -> String {
    key.encode_raw(value)
        .unwrap_or_else(|_| format!("{value:?}"))
}

//! Describe command implementation.
//!
//! Lists the sections and keys of the demo definition.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use optstore_definition::{DefinitionDescriptor, StoreDefinition};

use crate::cli::OutputFormat;
use crate::output::{or_dash, print_header, print_output, print_single_json, MinimalLine};

/// Arguments for the describe command.
#[derive(Args, Debug)]
pub struct DescribeArgs {
    /// Only show this section ("-" selects the unnamed section)
    #[arg(long)]
    pub section: Option<String>,
}

/// One key of the definition.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct KeyRow {
    #[tabled(rename = "Section")]
    pub section: String,
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Type")]
    pub value_type: String,
    #[tabled(rename = "Default")]
    pub default: String,
    #[tabled(rename = "Label")]
    pub label: String,
}

impl MinimalLine for KeyRow {
    fn minimal_line(&self) -> String {
        format!("{} ({})", self.key, self.value_type)
    }
}

/// Execute the describe command.
pub fn execute(args: DescribeArgs, format: OutputFormat) -> Result<()> {
    let definition = super::load_definition()?;
    let mut descriptor = definition.describe();
    if let Some(wanted) = args.section.as_deref() {
        descriptor
            .sections
            .retain(|section| section_matches(section.name.as_deref(), wanted));
    }

    match format {
        OutputFormat::Json => print_single_json(&descriptor),
        OutputFormat::Table => {
            print_header(&definition.to_string());
            print_output(&rows(&descriptor), format)
        }
        OutputFormat::Minimal => print_output(&rows(&descriptor), format),
    }
}

fn section_matches(name: Option<&str>, wanted: &str) -> bool {
    match name {
        Some(name) => name == wanted,
        None => wanted == "-",
    }
}

fn rows(descriptor: &DefinitionDescriptor) -> Vec<KeyRow> {
    descriptor
        .sections
        .iter()
        .flat_map(|section| {
            section.keys.iter().map(move |key| KeyRow {
                section: or_dash(section.name.as_deref()),
                key: key.name.clone(),
                value_type: key.value_type.clone(),
                default: or_dash(key.default.as_deref()),
                label: or_dash(key.label.as_deref()),
            })
        })
        .collect()
}

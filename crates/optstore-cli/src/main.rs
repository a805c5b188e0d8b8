//! Optstore CLI - inspect a store definition and apply options to it.
//!
//! # Usage
//!
//! ```bash
//! # Show the demo definition, section by section
//! optstore describe
//!
//! # The same as JSON, for tooling
//! optstore --format json describe
//!
//! # Print the option help
//! optstore help-options
//!
//! # Apply name=value assignments and show the resulting store
//! optstore apply threads=8 output=out.txt
//! ```

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod demo;
mod error;
mod output;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so JSON output stays clean
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| cli.log_level.clone()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let format = cli.format;

    match cli.command {
        Commands::Describe(args) => commands::describe::execute(args, format)?,
        Commands::HelpOptions => commands::help::execute()?,
        Commands::Apply(args) => commands::apply::execute(args, format)?,
    }

    Ok(())
}

//! Command-line interface wiring for the `fire` binary.
//!
//! This module owns the clap definitions and delegates execution to one
//! submodule per command.

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod common;
pub mod convert;
pub mod inspect;
pub mod layout;
pub mod utils;
pub mod validate;

/// Parsed CLI entrypoint for the `fire` binary.
#[derive(Parser, Debug)]
#[command(
    name = "fire",
    version,
    about = "Generate IRS files for transmission through the IRS FIRE system"
)]
pub struct Cli {
    /// Log pipeline stages (overridden by RUST_LOG).
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check a JSON document without producing output.
    Validate(validate::ValidateArgs),
    /// Validate, normalize and encode a JSON document into FIRE records.
    Convert(convert::ConvertArgs),
    /// Show the fixed-width layout of an entity.
    Layout(layout::LayoutArgs),
    /// Render records of an encoded file and verify their blank regions.
    Inspect(inspect::InspectArgs),
}

/// Execute the requested command.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Validate(args) => validate::handle(args),
        Command::Convert(args) => convert::handle(args),
        Command::Layout(args) => layout::handle(args),
        Command::Inspect(args) => inspect::handle(args),
    }
}

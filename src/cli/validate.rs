//! Input checking (`fire validate ...`).

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Args;
use fire_irs::{EntityLayout, ValidationError, validate};

use crate::cli::common::parse_entity;
use crate::cli::utils::load_document;

/// Arguments for `fire validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// JSON document to check (`-` for stdin).
    pub input: PathBuf,
    /// Entity layout the records must satisfy.
    #[arg(long, default_value = "payee", value_parser = parse_entity)]
    pub entity: &'static EntityLayout,
    /// Print violations as JSON on stdout.
    #[arg(long)]
    pub json: bool,
}

/// Execute `fire validate`.
pub fn handle(args: ValidateArgs) -> Result<()> {
    let document = load_document(&args.input)?;
    match validate(&document, args.entity) {
        Ok(batch) => {
            println!(
                "OK: {} {} record(s) valid in {}",
                batch.len(),
                args.entity.name,
                args.input.display()
            );
            Ok(())
        }
        Err(ValidationError::Rejected(violations)) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&violations)?);
            } else {
                for violation in violations.iter() {
                    eprintln!("{}", violation);
                }
            }
            Err(anyhow!(
                "{} failed validation with {} violation(s)",
                args.input.display(),
                violations.len()
            ))
        }
        Err(err) => Err(err).with_context(|| format!("failed to validate {}", args.input.display())),
    }
}

//! Encoded file inspection (`fire inspect ...`).

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Args;
use fire_irs::{EntityLayout, split_records, verify_blanks};

use crate::cli::common::{RenderStyleArg, parse_entity};
use crate::cli::utils::read_input;

/// Arguments for `fire inspect`.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Encoded FIRE file (`-` for stdin).
    pub file: PathBuf,
    /// Entity layout of the records.
    #[arg(long, default_value = "payee", value_parser = parse_entity)]
    pub entity: &'static EntityLayout,
    /// Show only this record (1-based).
    #[arg(long)]
    pub record: Option<usize>,
    /// Rendering style.
    #[arg(long, default_value_t = RenderStyleArg::Fields, value_enum)]
    pub style: RenderStyleArg,
}

/// Execute `fire inspect`.
pub fn handle(args: InspectArgs) -> Result<()> {
    let bytes = read_input(&args.file)?;
    let records = split_records(args.entity, &bytes)
        .with_context(|| format!("{} is not a sequence of {} records", args.file.display(), args.entity.name))?;

    let selected: Vec<usize> = match args.record {
        Some(0) => return Err(anyhow!("record numbers are 1-based")),
        Some(n) if n > records.len() => {
            return Err(anyhow!("record {} out of range 1..{}", n, records.len()));
        }
        Some(n) => vec![n - 1],
        None => (0..records.len()).collect(),
    };
    for idx in selected {
        println!("record {}", idx + 1);
        println!("{}", records[idx].render(args.style.into()));
    }

    verify_blanks(args.entity, &bytes)
        .with_context(|| format!("blank region check failed for {}", args.file.display()))?;
    println!(
        "{} record(s); all {} blank region(s) per record are NUL",
        records.len(),
        args.entity.blank_map().len()
    );
    Ok(())
}

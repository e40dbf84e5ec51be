//! Layout listing (`fire layout ...`).

use anyhow::{Context, Result};
use clap::Args;
use fire_irs::EntityLayout;

use crate::cli::common::parse_entity;

/// Arguments for `fire layout`.
#[derive(Args, Debug)]
pub struct LayoutArgs {
    /// Entity whose layout is printed.
    #[arg(long, default_value = "payee", value_parser = parse_entity)]
    pub entity: &'static EntityLayout,
    /// Emit the layout as JSON.
    #[arg(long)]
    pub json: bool,
    /// Only list reserved blank regions.
    #[arg(long)]
    pub blanks: bool,
}

/// Execute `fire layout`.
pub fn handle(args: LayoutArgs) -> Result<()> {
    let layout = args.entity;
    if args.json {
        let json = serde_json::to_string_pretty(layout).context("failed to serialize layout")?;
        println!("{}", json);
        return Ok(());
    }
    if args.blanks {
        for range in layout.blank_map() {
            println!("{}-{}", range.start, range.end);
        }
        return Ok(());
    }

    println!("{} - {} ({} bytes)", layout.name, layout.description, layout.width);
    for spec in layout.fields {
        println!(
            "{:>9}  {:>3}  {:<36}  {:<15}  {}",
            spec.range.to_string(),
            spec.width(),
            spec.name,
            spec.kind.label(),
            if spec.required { "required" } else { "" }
        );
    }
    Ok(())
}

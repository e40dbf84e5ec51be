//! Shared clap helper types for CLI commands.

use clap::ValueEnum;
use fire_irs::{EntityLayout, LayoutRegistry, RenderStyle};

/// Clap value parser resolving an entity name through the layout registry.
pub fn parse_entity(input: &str) -> Result<&'static EntityLayout, String> {
    LayoutRegistry::get(input).map_err(|err| {
        let known: Vec<&str> = LayoutRegistry::list().iter().map(|l| l.name).collect();
        format!("{} (known: {})", err, known.join(", "))
    })
}

/// Render styles available for `fire inspect`.
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum RenderStyleArg {
    Fields,
    Ruler,
}

impl From<RenderStyleArg> for RenderStyle {
    fn from(value: RenderStyleArg) -> Self {
        match value {
            RenderStyleArg::Fields => RenderStyle::Fields,
            RenderStyleArg::Ruler => RenderStyle::Ruler,
        }
    }
}

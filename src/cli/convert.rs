//! Encoding workflow (`fire convert ...`).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use clap::Args;
use fire_irs::{
    EntityLayout, FireError, SequencePolicy, ValidationError, XformOptions, encode_document,
};
use log::info;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::cli::common::parse_entity;
use crate::cli::utils::{load_document, write_output};

/// Arguments for `fire convert`.
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// JSON document to encode (`-` for stdin).
    pub input: PathBuf,
    /// Destination for the fixed-width records (`-` for stdout).
    #[arg(long, short = 'o', default_value = "-")]
    pub output: PathBuf,
    /// Entity layout used for validation and encoding.
    #[arg(long, default_value = "payee", value_parser = parse_entity)]
    pub entity: &'static EntityLayout,
    /// Renumber record sequence numbers starting at N instead of keeping supplied ones.
    #[arg(long = "renumber-from", value_name = "N")]
    pub renumber_from: Option<u64>,
    /// Write a JSON manifest (record count, size, SHA-256) next to the output.
    #[arg(long)]
    pub manifest: Option<PathBuf>,
}

/// Summary of one conversion run.
#[derive(Debug, Serialize)]
pub struct Manifest {
    pub entity: &'static str,
    pub source: String,
    pub records: usize,
    pub record_width: usize,
    pub bytes: usize,
    pub sha256: String,
    pub generated_at: DateTime<Utc>,
}

impl Manifest {
    fn new(layout: &EntityLayout, source: &Path, bytes: &[u8]) -> Self {
        let digest = Sha256::digest(bytes);
        Self {
            entity: layout.name,
            source: source.display().to_string(),
            records: bytes.len() / layout.width,
            record_width: layout.width,
            bytes: bytes.len(),
            sha256: format!("{:x}", digest),
            generated_at: Utc::now(),
        }
    }
}

/// Execute `fire convert`.
pub fn handle(args: ConvertArgs) -> Result<()> {
    let document = load_document(&args.input)?;
    let options = XformOptions {
        sequence: match args.renumber_from {
            Some(start) => SequencePolicy::Renumber { start },
            None => SequencePolicy::Preserve,
        },
    };

    let bytes = match encode_document(&document, args.entity, &options) {
        Ok(bytes) => bytes,
        Err(FireError::Validation(ValidationError::Rejected(violations))) => {
            for violation in violations.iter() {
                eprintln!("{}", violation);
            }
            return Err(anyhow!(
                "{} failed validation with {} violation(s); nothing written",
                args.input.display(),
                violations.len()
            ));
        }
        Err(err) => {
            return Err(err).with_context(|| format!("failed to convert {}", args.input.display()));
        }
    };

    write_output(&args.output, &bytes)?;
    info!(
        "wrote {} {} record(s) ({} bytes) to {}",
        bytes.len() / args.entity.width,
        args.entity.name,
        bytes.len(),
        args.output.display()
    );

    if let Some(path) = &args.manifest {
        let manifest = Manifest::new(args.entity, &args.input, &bytes);
        let json = serde_json::to_string_pretty(&manifest).context("failed to serialize manifest")?;
        write_output(path, json.as_bytes())?;
    }
    Ok(())
}

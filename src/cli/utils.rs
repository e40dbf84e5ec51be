//! Convenience helpers shared across command handlers.

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use fire_irs::Document;

/// Read a whole file, or stdin when the path is `-`.
pub fn read_input(path: &Path) -> Result<Vec<u8>> {
    if path.as_os_str() == "-" {
        let mut buffer = Vec::new();
        io::stdin()
            .read_to_end(&mut buffer)
            .context("failed to read from stdin")?;
        return Ok(buffer);
    }
    fs::read(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Persist bytes either to a file or stdout when `-` is provided.
pub fn write_output(path: &Path, content: &[u8]) -> Result<()> {
    if path.as_os_str() == "-" {
        let mut stdout = io::stdout().lock();
        stdout.write_all(content)?;
        stdout.flush()?;
        return Ok(());
    }
    fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}

/// Load a JSON input document, attaching path context to any error.
pub fn load_document(path: &Path) -> Result<Document> {
    let bytes = read_input(path)?;
    Document::from_reader(bytes.as_slice())
        .with_context(|| format!("failed to load document {}", path.display()))
}

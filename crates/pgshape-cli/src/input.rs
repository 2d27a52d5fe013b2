//! Query input from a file or standard input.

use std::io::Read;
use std::path::Path;

use anyhow::Context;

/// Reads the query text from `path`, or from stdin when `path` is absent
/// or `-`.
pub fn read_query(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read query from {}", path.display())),
        _ => read_from(std::io::stdin().lock()),
    }
}

fn read_from(mut reader: impl Read) -> anyhow::Result<String> {
    let mut query = String::new();
    reader
        .read_to_string(&mut query)
        .context("failed to read query from stdin")?;
    Ok(query)
}

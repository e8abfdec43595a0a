use crate::entities::Results;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

/// Writes the result mapping as pretty-printed JSON, one key per scanned
/// domain with its endpoints sorted.
pub fn write_results(path: &Path, results: &Results) -> Result<()> {
    let json = serde_json::to_string_pretty(results).context("Failed to serialize results")?;
    std::fs::write(path, json).context("Failed to write results file")?;

    info!(path = %path.display(), "results written");
    Ok(())
}

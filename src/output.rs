use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::record::{ExampleRecord, LinkShape};

/// Pretty JSON array, two-space indent, non-ASCII written as-is.
pub fn to_json(records: &[ExampleRecord], shape: LinkShape) -> serde_json::Result<String> {
    let view: Vec<_> = records.iter().map(|r| r.to_json(shape)).collect();
    serde_json::to_string_pretty(&view)
}

/// Overwrite `path` with the records, creating parent directories as needed.
pub fn write_json(path: &Path, records: &[ExampleRecord], shape: LinkShape) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating output directory {}", dir.display()))?;
    }
    let json = to_json(records, shape)?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Tweet dumps are tab-separated; `.csv` is tolerated for files exported
/// with the wrong extension.
pub fn validate_tsv_or_csv_file(path: &str) -> Result<()> {
    let pb = PathBuf::from(path);

    let ext = pb
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase());
    match ext.as_deref() {
        Some("tsv") | Some("csv") => {}
        _ => anyhow::bail!("Tweet file must have a .tsv or .csv extension: {}", path),
    }

    if !pb.exists() {
        anyhow::bail!("Tweet file does not exist: {}", path);
    }

    Ok(())
}

pub fn ensure_output_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))
}

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use authorship_classifiers::report::{plot_all, EvaluatedModel};

use crate::util::ensure_output_dir;

pub fn write_scores(models: &[EvaluatedModel], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(models)?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write scores to {}", path.display()))?;
    log::info!("Wrote scores of {} classifiers to {}", models.len(), path.display());
    Ok(())
}

pub fn load_scores(path: &Path) -> Result<Vec<EvaluatedModel>> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read scores file: {}", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse scores file: {}", path.display()))
}

/// Re-render the comparison charts from a `scores.json` written by `train`.
pub fn run_plot(scores_path: &Path, out_dir: &Path) -> Result<()> {
    let models = load_scores(scores_path)?;
    if models.is_empty() {
        log::warn!("{} holds no classifiers, charts will be empty", scores_path.display());
    }
    ensure_output_dir(out_dir)?;
    plot_all(&models, out_dir)
}

use anyhow::{Context, Result};
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::path::Path;

use authorship_classifiers::config::ClassifierConfig;
use authorship_classifiers::data_handling::Table;
use authorship_classifiers::models::{build_classifier, MODEL_FILE_NAME};
use authorship_classifiers::preprocessing::{preprocess, DatasetSplit};
use authorship_classifiers::report::{evaluate, plot_all, EvaluatedModel};
use authorship_classifiers::vectorize::{labels, FeatureAssembler, TfIdfVectorizer};

use crate::plot::write_scores;
use crate::util::{ensure_output_dir, validate_tsv_or_csv_file};

use super::input::TrainConfig;

const TEXT_COLUMN: &str = "text";
const LABEL_COLUMN: &str = "device";
pub const SCORES_FILE_NAME: &str = "scores.json";

/// Shuffled train/eval row indices. Each side keeps at least one row when
/// there are two or more rows.
pub fn holdout_split(n: usize, eval_fraction: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut StdRng::seed_from_u64(seed));

    let mut n_eval = (n as f64 * eval_fraction).round() as usize;
    if n >= 2 {
        n_eval = n_eval.clamp(1, n - 1);
    }
    let train = indices.split_off(n_eval.min(n));
    (train, indices)
}

fn split_tables(config: &TrainConfig) -> Result<(Table, Table)> {
    validate_tsv_or_csv_file(&config.train_data)?;
    let table = preprocess(&config.train_data, DatasetSplit::Train)
        .context("Failed to load training data")?;

    match &config.eval_data {
        Some(eval_path) => {
            validate_tsv_or_csv_file(eval_path)?;
            let eval = preprocess(eval_path, DatasetSplit::Train)
                .context("Failed to load evaluation data")?;
            Ok((table, eval))
        }
        None => {
            log::warn!(
                "No evaluation data provided, holding out {:.0}% of the training rows",
                config.eval_fraction * 100.0
            );
            let (train_idx, eval_idx) =
                holdout_split(table.nrows(), config.eval_fraction, config.seed);
            Ok((table.select_rows(&train_idx), table.select_rows(&eval_idx)))
        }
    }
}

struct Features {
    x: Array2<f32>,
    y: Vec<u32>,
}

fn features(assembler: &FeatureAssembler, table: &Table) -> Result<Features> {
    Ok(Features {
        x: assembler.transform(table)?,
        y: labels(table, LABEL_COLUMN)?,
    })
}

/// Train and score every configured classifier. The classifier with the best
/// F1 on the evaluation rows is saved to `<output_dir>/best_model`.
pub fn run_training(config: &TrainConfig) -> Result<Vec<EvaluatedModel>> {
    let out_dir = Path::new(&config.output_dir);
    ensure_output_dir(out_dir)?;

    let (train_table, eval_table) = split_tables(config)?;
    log::info!(
        "Training on {} tweets, evaluating on {}",
        train_table.nrows(),
        eval_table.nrows()
    );

    let assembler = FeatureAssembler::fit(
        &train_table,
        TEXT_COLUMN,
        &config.meta_columns,
        Box::new(TfIdfVectorizer::new(config.vectorizer.clone())),
    )?;
    let train = features(&assembler, &train_table)?;
    let eval = features(&assembler, &eval_table)?;
    let n_meta = assembler.meta_columns().len();

    let model_path = out_dir.join(MODEL_FILE_NAME);
    let mut best_f1 = f64::NEG_INFINITY;
    let mut evaluated = Vec::with_capacity(config.classifiers.len());

    for classifier_config in &config.classifiers {
        let mut classifier_config: ClassifierConfig = classifier_config.clone();
        classifier_config.resolve_dims(train.x.ncols(), n_meta);

        let mut classifier = build_classifier(&classifier_config)?;
        log::info!("Training {}", classifier.name());
        classifier
            .train(&train.x, &train.y)
            .with_context(|| format!("Training {} failed", classifier.name()))?;

        let result = evaluate(
            classifier.as_ref(),
            assembler.vectorizer_name(),
            &eval.x,
            &eval.y,
        )?;
        if result.scores.f1 > best_f1 {
            best_f1 = result.scores.f1;
            classifier.save_to(&model_path)?;
            log::info!("{} is the best so far, saved to {}", result.name, model_path.display());
        }
        evaluated.push(result);
    }

    write_scores(&evaluated, &out_dir.join(SCORES_FILE_NAME))?;
    plot_all(&evaluated, out_dir)?;
    Ok(evaluated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn holdout_keeps_both_sides_non_empty() {
        let (train, eval) = holdout_split(3, 0.01, 1);
        assert_eq!(eval.len(), 1);
        assert_eq!(train.len(), 2);

        let (train, eval) = holdout_split(10, 0.2, 1);
        assert_eq!(eval.len(), 2);
        let mut all = [train, eval].concat();
        all.sort_unstable();
        assert_eq!(all, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn holdout_is_seeded() {
        assert_eq!(holdout_split(50, 0.2, 9), holdout_split(50, 0.2, 9));
    }
}

use anyhow::Result;
use log::info;
use ndarray::Array2;

use crate::metrics::{roc_curve, Scores};
use crate::models::Classifier;
use crate::report::plots::EvaluatedModel;

/// Score a trained classifier on held-out rows.
///
/// The report key is `<classifier>_<vectorizer>`.
pub fn evaluate(
    classifier: &dyn Classifier,
    vectorizer_name: &str,
    x: &Array2<f32>,
    y: &[u32],
) -> Result<EvaluatedModel> {
    let predictions = classifier.predict(x)?;
    let probabilities = classifier.predict_proba(x)?;
    let scores = Scores::compute(y, &predictions, &probabilities);
    let name = format!("{}_{}", classifier.name(), vectorizer_name);

    info!(
        "{}: accuracy {:.3}, precision {:.3}, recall {:.3}, auc {:.3}, f1 {:.3}",
        name, scores.accuracy, scores.precision, scores.recall, scores.auc, scores.f1
    );

    Ok(EvaluatedModel {
        name,
        scores,
        roc: roc_curve(y, &probabilities),
        losses: classifier.losses().map(<[f32]>::to_vec),
    })
}

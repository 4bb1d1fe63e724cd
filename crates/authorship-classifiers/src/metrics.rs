//! Binary classification metrics with class `1` as the positive class.
use serde::{Deserialize, Serialize};

/// Names of the scalar scores, in report order.
pub const METRICS: [&str; 5] = ["accuracy", "precision", "recall", "auc", "f1"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub tp: usize,
    pub fp: usize,
    pub tn: usize,
    pub fn_: usize,
}

impl ConfusionMatrix {
    pub fn new(labels: &[u32], predictions: &[u32]) -> Self {
        let mut cm = ConfusionMatrix::default();
        for (&label, &pred) in labels.iter().zip(predictions) {
            match (label == 1, pred == 1) {
                (true, true) => cm.tp += 1,
                (false, true) => cm.fp += 1,
                (false, false) => cm.tn += 1,
                (true, false) => cm.fn_ += 1,
            }
        }
        cm
    }

    pub fn total(&self) -> usize {
        self.tp + self.fp + self.tn + self.fn_
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.tp + self.tn, self.total())
    }

    pub fn precision(&self) -> f64 {
        ratio(self.tp, self.tp + self.fp)
    }

    pub fn recall(&self) -> f64 {
        ratio(self.tp, self.tp + self.fn_)
    }

    pub fn f1(&self) -> f64 {
        let (p, r) = (self.precision(), self.recall());
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * p * r / (p + r)
        }
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RocCurve {
    pub fpr: Vec<f64>,
    pub tpr: Vec<f64>,
}

/// ROC points at every distinct score, highest first, starting at (0, 0).
///
/// With only one class present the missing rate stays at 0.
pub fn roc_curve(labels: &[u32], scores: &[f32]) -> RocCurve {
    let mut pairs: Vec<(f32, bool)> = scores
        .iter()
        .zip(labels)
        .map(|(&s, &l)| (s, l == 1))
        .collect();
    pairs.sort_by(|a, b| b.0.total_cmp(&a.0));

    let positives = pairs.iter().filter(|p| p.1).count();
    let negatives = pairs.len() - positives;

    let mut curve = RocCurve {
        fpr: vec![0.0],
        tpr: vec![0.0],
    };
    let (mut tp, mut fp) = (0usize, 0usize);
    for (i, &(score, positive)) in pairs.iter().enumerate() {
        if positive {
            tp += 1;
        } else {
            fp += 1;
        }
        // only emit a point once all rows sharing this score are counted
        let last_of_score = pairs.get(i + 1).map_or(true, |next| next.0 != score);
        if last_of_score {
            curve.fpr.push(ratio(fp, negatives));
            curve.tpr.push(ratio(tp, positives));
        }
    }
    curve
}

/// Trapezoidal area under a curve given by its x and y coordinates.
pub fn auc(x: &[f64], y: &[f64]) -> f64 {
    x.windows(2)
        .zip(y.windows(2))
        .map(|(xs, ys)| (xs[1] - xs[0]) * (ys[0] + ys[1]) / 2.0)
        .sum()
}

/// ROC AUC, 0.5 when either class is missing.
pub fn roc_auc(labels: &[u32], scores: &[f32]) -> f64 {
    let positives = labels.iter().filter(|&&l| l == 1).count();
    if positives == 0 || positives == labels.len() {
        return 0.5;
    }
    let roc = roc_curve(labels, scores);
    auc(&roc.fpr, &roc.tpr)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub auc: f64,
    pub f1: f64,
}

impl Scores {
    pub fn compute(labels: &[u32], predictions: &[u32], probabilities: &[f32]) -> Self {
        let cm = ConfusionMatrix::new(labels, predictions);
        Scores {
            accuracy: cm.accuracy(),
            precision: cm.precision(),
            recall: cm.recall(),
            auc: roc_auc(labels, probabilities),
            f1: cm.f1(),
        }
    }

    /// Score by name, one of [`METRICS`].
    pub fn get(&self, metric: &str) -> Option<f64> {
        match metric {
            "accuracy" => Some(self.accuracy),
            "precision" => Some(self.precision),
            "recall" => Some(self.recall),
            "auc" => Some(self.auc),
            "f1" => Some(self.f1),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confusion_matrix_rates() {
        let cm = ConfusionMatrix::new(&[1, 1, 0, 0, 1], &[1, 0, 0, 1, 1]);
        assert_eq!(cm, ConfusionMatrix { tp: 2, fp: 1, tn: 1, fn_: 1 });
        assert!((cm.accuracy() - 0.6).abs() < 1e-12);
        assert!((cm.precision() - 2.0 / 3.0).abs() < 1e-12);
        assert!((cm.recall() - 2.0 / 3.0).abs() < 1e-12);
        assert!((cm.f1() - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn no_positive_predictions_scores_zero_precision() {
        let cm = ConfusionMatrix::new(&[1, 0], &[0, 0]);
        assert_eq!(cm.precision(), 0.0);
        assert_eq!(cm.f1(), 0.0);
    }

    #[test]
    fn roc_auc_matches_hand_computation() {
        let auc = roc_auc(&[0, 0, 1, 1], &[0.1, 0.4, 0.35, 0.8]);
        assert!((auc - 0.75).abs() < 1e-12);
    }

    #[test]
    fn tied_scores_share_one_point() {
        let roc = roc_curve(&[0, 1, 1], &[0.5, 0.5, 0.9]);
        assert_eq!(roc.fpr, vec![0.0, 0.0, 1.0]);
        assert_eq!(roc.tpr, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn single_class_auc_is_chance() {
        assert_eq!(roc_auc(&[1, 1, 1], &[0.2, 0.9, 0.4]), 0.5);
    }
}

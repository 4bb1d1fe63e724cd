use std::path::Path;

use anyhow::Result;
use linfa::dataset::Pr;
use linfa::traits::{Fit, Predict};
use linfa::Dataset;
use linfa_svm::{Svm, SvmParams as LinfaSvmParams};
use log::{debug, info};
use ndarray::{Array1, Array2};

use crate::config::{Gamma, Kernel, SvmParams};
use crate::error::ClassifierError;
use crate::models::classifier_trait::Classifier;
use crate::models::utils::{load_bincode, save_bincode};

/// Support vector machine with Platt-scaled probabilities.
pub struct SvmClassifier {
    model: Option<Svm<f64, Pr>>,
    params: SvmParams,
    name: String,
}

impl SvmClassifier {
    pub fn new(params: SvmParams) -> Self {
        let name = format!("SVM_{}", params.kernel.as_str());
        SvmClassifier {
            model: None,
            params,
            name,
        }
    }

    fn fitted(&self) -> Result<&Svm<f64, Pr>> {
        Ok(self
            .model
            .as_ref()
            .ok_or_else(|| ClassifierError::NotTrained(self.name.clone()))?)
    }
}

/// Resolve the RBF coefficient against the training records.
///
/// `Scale` falls back to `1.0` when every feature value is identical.
pub fn resolve_gamma(gamma: Gamma, x: &Array2<f64>) -> f64 {
    let n_features = x.ncols().max(1) as f64;
    match gamma {
        Gamma::Value(value) => value,
        Gamma::Auto => 1.0 / n_features,
        Gamma::Scale => {
            let n = x.len().max(1) as f64;
            let mean = x.sum() / n;
            let var = x.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
            if var > 0.0 {
                1.0 / (n_features * var)
            } else {
                1.0
            }
        }
    }
}

impl Classifier for SvmClassifier {
    fn train(&mut self, x: &Array2<f32>, y: &[u32]) -> Result<()> {
        let records = x.mapv(|v| v as f64);
        let targets = Array1::from_iter(y.iter().map(|&l| l == 1));

        let params: LinfaSvmParams<f64, Pr> = Svm::<f64, Pr>::params()
            .eps(self.params.eps)
            .pos_neg_weights(self.params.c, self.params.c);

        let params = match self.params.kernel {
            Kernel::Linear => params.linear_kernel(),
            Kernel::Rbf => {
                let gamma = resolve_gamma(self.params.gamma, &records);
                debug!("[{}] gamma = {:.6}", self.name, gamma);
                // linfa's gaussian kernel is exp(-|x - y|^2 / eps)
                params.gaussian_kernel(1.0 / gamma)
            }
            Kernel::Poly => params.polynomial_kernel(
                self.params.polynomial_kernel_constant,
                self.params.polynomial_kernel_degree,
            ),
        };

        let dataset = Dataset::new(records, targets);
        let model = params.fit(&dataset)?;

        info!(
            "Fitted {} on {} samples x {} features ({} support vectors)",
            self.name,
            x.nrows(),
            x.ncols(),
            model.nsupport()
        );
        self.model = Some(model);
        Ok(())
    }

    fn predict(&self, x: &Array2<f32>) -> Result<Vec<u32>> {
        Ok(self
            .predict_proba(x)?
            .into_iter()
            .map(|p| (p >= 0.5) as u32)
            .collect())
    }

    fn predict_proba(&self, x: &Array2<f32>) -> Result<Vec<f32>> {
        let model = self.fitted()?;
        let predictions: Array1<Pr> = model.predict(&x.mapv(|v| v as f64));
        Ok(predictions.iter().map(|p| **p).collect())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn save_to(&self, path: &Path) -> Result<()> {
        save_bincode(self.fitted()?, path)
    }

    fn load_from(&mut self, path: &Path) -> Result<()> {
        self.model = Some(load_bincode(path)?);
        Ok(())
    }
}

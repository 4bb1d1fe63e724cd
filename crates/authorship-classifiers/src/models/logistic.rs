use std::path::Path;

use anyhow::Result;
use linfa::traits::{Fit, Predict};
use linfa::Dataset;
use linfa_logistic::{FittedLogisticRegression, LogisticRegression};
use log::info;
use ndarray::{Array1, Array2};

use crate::config::LogisticParams;
use crate::error::ClassifierError;
use crate::models::classifier_trait::Classifier;
use crate::models::utils::{load_bincode, save_bincode};

pub struct LogisticClassifier {
    model: Option<FittedLogisticRegression<f64, u32>>,
    params: LogisticParams,
    name: String,
}

impl LogisticClassifier {
    pub fn new(params: LogisticParams) -> Self {
        LogisticClassifier {
            model: None,
            params,
            name: "Logistic_Regression".to_string(),
        }
    }

    fn fitted(&self) -> Result<&FittedLogisticRegression<f64, u32>> {
        Ok(self
            .model
            .as_ref()
            .ok_or_else(|| ClassifierError::NotTrained(self.name.clone()))?)
    }
}

impl Classifier for LogisticClassifier {
    fn train(&mut self, x: &Array2<f32>, y: &[u32]) -> Result<()> {
        let dataset = Dataset::new(x.mapv(|v| v as f64), Array1::from_vec(y.to_vec()));

        let model = LogisticRegression::default()
            .alpha(self.params.alpha)
            .max_iterations(self.params.max_iterations)
            .gradient_tolerance(self.params.gradient_tolerance)
            .fit(&dataset)?;

        info!(
            "Fitted {} on {} samples x {} features",
            self.name,
            x.nrows(),
            x.ncols()
        );
        self.model = Some(model);
        Ok(())
    }

    fn predict(&self, x: &Array2<f32>) -> Result<Vec<u32>> {
        let model = self.fitted()?;
        Ok(model.predict(&x.mapv(|v| v as f64)).to_vec())
    }

    fn predict_proba(&self, x: &Array2<f32>) -> Result<Vec<f32>> {
        // linfa picks its positive class by label frequency, not by value
        let model = self.fitted()?;
        let positive_is_one = model.labels().pos.class == 1;
        Ok(model
            .predict_probabilities(&x.mapv(|v| v as f64))
            .iter()
            .map(|&p| (if positive_is_one { p } else { 1.0 - p }) as f32)
            .collect())
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

use std::path::Path;

use anyhow::{Context, Result};
use candle_core::{DType, Device};
use candle_nn::{AdamW, VarBuilder, VarMap};
use log::info;
use ndarray::Array2;

use crate::building_blocks::lstm::LstmNet;
use crate::config::LstmParams;
use crate::models::classifier_trait::Classifier;
use crate::models::utils::{
    adam, argmax_classes, eval_outputs, fit_minibatches, positive_scores, TrainSettings,
};

const LEARNING_RATE: f64 = 0.001;

/// Recurrent classifier over rows reshaped into `input_size`-wide steps.
pub struct LstmClassifier {
    varmap: VarMap,
    net: LstmNet,
    opt: AdamW,
    params: LstmParams,
    losses: Vec<f32>,
    name: String,
}

impl LstmClassifier {
    pub fn new(params: LstmParams) -> Result<Self> {
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
        let net = LstmNet::new(
            params.input_size,
            params.n_layers,
            params.linear_dim,
            params.dropout,
            vb,
        )?;
        let opt = adam(&varmap, LEARNING_RATE)?;
        Ok(Self {
            varmap,
            net,
            opt,
            params,
            losses: Vec::new(),
            name: "LSTM".to_string(),
        })
    }
}

impl Classifier for LstmClassifier {
    fn train(&mut self, x: &Array2<f32>, y: &[u32]) -> Result<()> {
        let settings = TrainSettings {
            learning_rate: LEARNING_RATE,
            epochs: self.params.epochs,
            batch_size: self.params.batch_size,
            seed: self.params.seed,
        };
        fit_minibatches(&self.name, &self.net, &mut self.opt, x, y, &settings, &mut self.losses)?;
        info!(
            "Trained {} ({} layers, width {}) for {} epochs",
            self.name, self.params.n_layers, self.params.linear_dim, self.params.epochs
        );
        Ok(())
    }

    fn predict(&self, x: &Array2<f32>) -> Result<Vec<u32>> {
        argmax_classes(&eval_outputs(&self.net, x)?)
    }

    fn predict_proba(&self, x: &Array2<f32>) -> Result<Vec<f32>> {
        positive_scores(&eval_outputs(&self.net, x)?)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn losses(&self) -> Option<&[f32]> {
        Some(&self.losses)
    }

    fn save_to(&self, path: &Path) -> Result<()> {
        self.varmap
            .save(path)
            .with_context(|| format!("Failed to save {} weights to {}", self.name, path.display()))
    }

    fn load_from(&mut self, path: &Path) -> Result<()> {
        self.varmap
            .load(path)
            .with_context(|| {
                format!(
                    "Failed to load {} weights from {}",
                    self.name,
                    path.display()
                )
            })
    }
}

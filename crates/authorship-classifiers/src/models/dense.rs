use std::path::Path;

use anyhow::{Context, Result};
use candle_core::{DType, Device, Tensor};
use candle_nn::{linear, ops, AdamW, Linear, Module, ModuleT, VarBuilder, VarMap};
use log::info;
use ndarray::Array2;

use crate::config::DenseParams;
use crate::models::classifier_trait::Classifier;
use crate::models::utils::{
    adam, argmax_classes, eval_outputs, fit_minibatches, positive_scores, TrainSettings,
};

const LEARNING_RATE: f64 = 0.01;

/// Linear(input, 64) → ReLU → Linear(64, 2) → sigmoid.
#[derive(Debug, Clone)]
pub struct DenseNet {
    hidden: Linear,
    out: Linear,
}

impl DenseNet {
    pub fn new(input_size: usize, vb: VarBuilder) -> candle_core::Result<Self> {
        Ok(Self {
            hidden: linear(input_size, 64, vb.pp("0"))?,
            out: linear(64, 2, vb.pp("2"))?,
        })
    }
}

impl ModuleT for DenseNet {
    fn forward_t(&self, xs: &Tensor, _train: bool) -> candle_core::Result<Tensor> {
        let hidden = self.hidden.forward(xs)?.relu()?;
        ops::sigmoid(&self.out.forward(&hidden)?)
    }
}

pub struct DenseClassifier {
    varmap: VarMap,
    net: DenseNet,
    opt: AdamW,
    params: DenseParams,
    losses: Vec<f32>,
    name: String,
}

impl DenseClassifier {
    pub fn new(params: DenseParams) -> Result<Self> {
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
        let net = DenseNet::new(params.input_size, vb)?;
        let opt = adam(&varmap, LEARNING_RATE)?;
        Ok(Self {
            varmap,
            net,
            opt,
            params,
            losses: Vec::new(),
            name: "DNN".to_string(),
        })
    }
}

impl Classifier for DenseClassifier {
    fn train(&mut self, x: &Array2<f32>, y: &[u32]) -> Result<()> {
        let settings = TrainSettings {
            learning_rate: LEARNING_RATE,
            epochs: self.params.epochs,
            batch_size: self.params.batch_size,
            seed: self.params.seed,
        };
        fit_minibatches(&self.name, &self.net, &mut self.opt, x, y, &settings, &mut self.losses)?;
        info!(
            "Trained {} for {} epochs, last batch loss {:?}",
            self.name,
            self.params.epochs,
            self.losses.last()
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

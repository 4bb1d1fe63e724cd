//! Helpers shared by the classifier implementations.
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::{Context, Result};
use candle_core::{DType, Device, Tensor, D};
use candle_nn::{AdamW, ModuleT, Optimizer, ParamsAdamW, VarMap};
use log::{debug, trace};
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub fn save_bincode<T: Serialize, P: AsRef<Path>>(value: &T, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)
        .with_context(|| format!("Failed to create model file: {}", path.display()))?;
    bincode::serialize_into(BufWriter::new(file), value)
        .with_context(|| format!("Failed to serialize model to {}", path.display()))?;
    Ok(())
}

pub fn load_bincode<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open model file: {}", path.display()))?;
    let value = bincode::deserialize_from(BufReader::new(file))
        .with_context(|| format!("Failed to deserialize model from {}", path.display()))?;
    Ok(value)
}

/// Row-major copy of a feature matrix as a `(rows, cols)` f32 tensor.
pub fn array_to_tensor(x: &Array2<f32>, device: &Device) -> Result<Tensor> {
    let (rows, cols) = x.dim();
    let tensor = Tensor::from_iter(x.iter().copied(), device)?.reshape((rows, cols))?;
    Ok(tensor)
}

pub fn labels_to_tensor(y: &[u32], device: &Device) -> Result<Tensor> {
    Ok(Tensor::from_slice(y, y.len(), device)?)
}

/// Shuffled row indices cut into full batches; the trailing partial batch
/// is dropped. A batch size larger than `n` yields a single batch of all rows.
pub fn shuffled_batches(n: usize, batch_size: usize, rng: &mut StdRng) -> Vec<Vec<u32>> {
    let mut indices: Vec<u32> = (0..n as u32).collect();
    indices.shuffle(rng);
    let batch_size = batch_size.clamp(1, n.max(1));
    indices
        .chunks_exact(batch_size)
        .map(|chunk| chunk.to_vec())
        .collect()
}

/// Settings of the mini-batch loop shared by the neural classifiers.
#[derive(Debug, Clone, Copy)]
pub struct TrainSettings {
    pub learning_rate: f64,
    pub epochs: usize,
    pub batch_size: usize,
    pub seed: u64,
}

/// Adam over every variable of `varmap` (decoupled weight decay disabled).
pub fn adam(varmap: &VarMap, learning_rate: f64) -> Result<AdamW> {
    let params = ParamsAdamW {
        lr: learning_rate,
        weight_decay: 0.0,
        ..Default::default()
    };
    Ok(AdamW::new(varmap.all_vars(), params)?)
}

/// Mini-batch cross-entropy training. Every batch loss is appended to `losses`.
pub fn fit_minibatches<M: ModuleT>(
    name: &str,
    net: &M,
    opt: &mut AdamW,
    x: &Array2<f32>,
    y: &[u32],
    settings: &TrainSettings,
    losses: &mut Vec<f32>,
) -> Result<()> {
    let device = Device::Cpu;
    let xs = array_to_tensor(x, &device)?;
    let ys = labels_to_tensor(y, &device)?;
    let mut rng = StdRng::seed_from_u64(settings.seed);
    debug!(
        "[{}] {} samples, batch size {}, lr {}, {} epochs",
        name,
        x.nrows(),
        settings.batch_size,
        settings.learning_rate,
        settings.epochs
    );

    for epoch in 0..settings.epochs {
        let batches = shuffled_batches(x.nrows(), settings.batch_size, &mut rng);
        let mut epoch_loss = 0.0f32;

        for (batch_idx, batch) in batches.iter().enumerate() {
            let idx = Tensor::from_slice(batch.as_slice(), batch.len(), &device)?;
            let batch_x = xs.index_select(&idx, 0)?;
            let batch_y = ys.index_select(&idx, 0)?;

            let out = net.forward_t(&batch_x, true)?;
            let loss = candle_nn::loss::cross_entropy(&out, &batch_y)?;
            opt.backward_step(&loss)?;

            let loss_value = loss.to_scalar::<f32>()?;
            trace!("[{}] epoch {} batch {}: loss {:.5}", name, epoch, batch_idx, loss_value);
            losses.push(loss_value);
            epoch_loss += loss_value;
        }

        debug!(
            "[{}] epoch {}: mean batch loss {:.5} over {} batches",
            name,
            epoch,
            epoch_loss / batches.len().max(1) as f32,
            batches.len()
        );
    }
    Ok(())
}

/// Network outputs in evaluation mode, `(rows, 2)`.
pub fn eval_outputs<M: ModuleT>(net: &M, x: &Array2<f32>) -> Result<Tensor> {
    let xs = array_to_tensor(x, &Device::Cpu)?;
    Ok(net.forward_t(&xs, false)?)
}

/// Arg-max over the two class outputs.
pub fn argmax_classes(out: &Tensor) -> Result<Vec<u32>> {
    Ok(out.argmax(D::Minus1)?.to_dtype(DType::U32)?.to_vec1::<u32>()?)
}

/// Class-1 column of the outputs.
pub fn positive_scores(out: &Tensor) -> Result<Vec<f32>> {
    Ok(out.narrow(1, 1, 1)?.squeeze(1)?.to_vec1::<f32>()?)
}

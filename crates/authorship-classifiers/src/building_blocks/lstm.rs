use candle_core::{DType, Result, Tensor};
use candle_nn::{
    batch_norm, linear, ops, rnn, BatchNorm, BatchNormConfig, Dropout, Linear, Module, ModuleT,
    VarBuilder, RNN,
};

/// Unidirectional, batch-first LSTM of `num_layers` layers.
///
/// Every forward starts from zero hidden and cell states, so no state is
/// carried between batches. Dropout is applied to the output of every layer
/// except the last one.
#[derive(Debug, Clone)]
pub struct StackedLstm {
    layers: Vec<rnn::LSTM>,
    dropout: Dropout,
}

impl StackedLstm {
    pub fn new(
        input_size: usize,
        hidden_size: usize,
        num_layers: usize,
        dropout: f32,
        vb: VarBuilder,
    ) -> Result<Self> {
        let layers = (0..num_layers.max(1))
            .map(|layer_idx| {
                let in_dim = if layer_idx == 0 { input_size } else { hidden_size };
                rnn::lstm(
                    in_dim,
                    hidden_size,
                    rnn::LSTMConfig {
                        layer_idx,
                        ..Default::default()
                    },
                    vb.pp("rnn"),
                )
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            layers,
            dropout: Dropout::new(dropout),
        })
    }

    /// `(batch, seq_len, input_size)` to `(batch, seq_len, hidden_size)`.
    pub fn forward_seq(&self, xs: &Tensor, train: bool) -> Result<Tensor> {
        let batch_size = xs.dim(0)?;
        let mut out = xs.clone();
        for (idx, layer) in self.layers.iter().enumerate() {
            let state = layer.zero_state(batch_size)?;
            let states = layer.seq_init(&out, &state)?;
            out = Tensor::stack(
                &states.iter().map(|s| s.h().clone()).collect::<Vec<_>>(),
                1,
            )?;
            if idx + 1 < self.layers.len() {
                out = self.dropout.forward(&out, train)?;
            }
        }
        Ok(out)
    }

    /// Hidden output of the last time step, `(batch, hidden_size)`.
    pub fn last_step(&self, xs: &Tensor, train: bool) -> Result<Tensor> {
        let out = self.forward_seq(xs, train)?;
        let seq_len = out.dim(1)?;
        out.narrow(1, seq_len - 1, 1)?.squeeze(1)
    }
}

/// Flat rows of `input_size * k` values become `k` time steps.
fn to_sequence(xs: &Tensor, input_size: usize) -> Result<Tensor> {
    let (batch_size, width) = xs.dims2()?;
    xs.reshape((batch_size, width / input_size.max(1), input_size))
}

/// LSTM → dropout → Linear(linear_dim, 16) → ReLU → Linear(16, 2) → sigmoid.
#[derive(Debug, Clone)]
pub struct LstmNet {
    input_size: usize,
    lstm: StackedLstm,
    dropout: Dropout,
    fc1: Linear,
    fc2: Linear,
}

impl LstmNet {
    pub fn new(
        input_size: usize,
        n_layers: usize,
        linear_dim: usize,
        dropout: f32,
        vb: VarBuilder,
    ) -> Result<Self> {
        Ok(Self {
            input_size,
            lstm: StackedLstm::new(input_size, linear_dim, n_layers, dropout, vb.pp("lstm"))?,
            dropout: Dropout::new(dropout),
            fc1: linear(linear_dim, 16, vb.pp("fc.0"))?,
            fc2: linear(16, 2, vb.pp("fc.2"))?,
        })
    }
}

impl ModuleT for LstmNet {
    fn forward_t(&self, xs: &Tensor, train: bool) -> Result<Tensor> {
        let seq = to_sequence(xs, self.input_size)?;
        let last = self.lstm.last_step(&seq, train)?;
        let out = self.dropout.forward(&last, train)?;
        let out = self.fc1.forward(&out)?.relu()?;
        ops::sigmoid(&self.fc2.forward(&out)?)
    }
}

/// LSTM over the text part of a row, joined with the row's meta features
/// before the classification head.
///
/// Input rows are `[meta (numeric_feature_size), text (vector_size * k)]`.
/// Meta features are truncated to integers before use.
#[derive(Debug, Clone)]
pub struct LstmTextNet {
    vector_size: usize,
    numeric_feature_size: usize,
    lstm: StackedLstm,
    dropout: Dropout,
    fc1: Linear,
    fc2: Linear,
    norm: BatchNorm,
    out: Linear,
}

impl LstmTextNet {
    pub fn new(
        vector_size: usize,
        n_layers: usize,
        linear_dim: usize,
        dense_size: usize,
        numeric_feature_size: usize,
        dropout: f32,
        vb: VarBuilder,
    ) -> Result<Self> {
        Ok(Self {
            vector_size,
            numeric_feature_size,
            lstm: StackedLstm::new(vector_size, linear_dim, n_layers, dropout, vb.pp("lstm"))?,
            dropout: Dropout::new(dropout),
            fc1: linear(linear_dim, dense_size, vb.pp("fc1.0"))?,
            fc2: linear(dense_size + numeric_feature_size, 16, vb.pp("fc2.0"))?,
            norm: batch_norm(16, BatchNormConfig::default(), vb.pp("fc2.2"))?,
            out: linear(16, 2, vb.pp("fc2.3"))?,
        })
    }

    /// Split a batch into its integer-truncated meta prefix and its text suffix.
    pub fn split_inputs(&self, xs: &Tensor) -> Result<(Tensor, Tensor)> {
        let width = xs.dim(1)?;
        let meta = xs
            .narrow(1, 0, self.numeric_feature_size)?
            .to_dtype(DType::I64)?
            .to_dtype(DType::F32)?;
        let text = xs.narrow(
            1,
            self.numeric_feature_size,
            width - self.numeric_feature_size,
        )?;
        Ok((meta, text))
    }
}

impl ModuleT for LstmTextNet {
    fn forward_t(&self, xs: &Tensor, train: bool) -> Result<Tensor> {
        let (meta, text) = self.split_inputs(xs)?;
        let seq = to_sequence(&text, self.vector_size)?;
        let last = self.lstm.last_step(&seq, train)?;
        let out = self.dropout.forward(&last, train)?;
        let out = self.fc1.forward(&out)?.relu()?;

        let joined = Tensor::cat(&[&out, &meta], 1)?;
        let out = self.fc2.forward(&joined)?.relu()?;
        let out = self.norm.forward_t(&out, train)?;
        ops::sigmoid(&self.out.forward(&out)?)
    }
}

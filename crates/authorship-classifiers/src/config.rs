use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ClassifierError;

/// SVM kernel family. Configuration files may use any name `from_str` accepts.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Kernel {
    Linear,
    Rbf,
    Poly,
}

impl Kernel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kernel::Linear => "linear",
            Kernel::Rbf => "rbf",
            Kernel::Poly => "poly",
        }
    }
}

impl FromStr for Kernel {
    type Err = ClassifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "linear" => Ok(Kernel::Linear),
            "rbf" | "gauss" | "gaussian" => Ok(Kernel::Rbf),
            "poly" | "polynomial" => Ok(Kernel::Poly),
            _ => Err(ClassifierError::UnknownKernel(s.to_string())),
        }
    }
}

impl TryFrom<String> for Kernel {
    type Error = ClassifierError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Kernel coefficient for the RBF kernel.
///
/// `Scale` uses `1 / (n_features * var(X))`, `Auto` uses `1 / n_features`.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Gamma {
    Scale,
    Auto,
    Value(f64),
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LogisticParams {
    /// L2 penalty strength.
    pub alpha: f64,
    pub max_iterations: u64,
    pub gradient_tolerance: f64,
}

impl Default for LogisticParams {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            max_iterations: 100,
            gradient_tolerance: 1e-4,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SvmParams {
    pub kernel: Kernel,
    pub gamma: Gamma,
    /// Misclassification penalty, applied to both classes.
    pub c: f64,
    /// Solver stopping tolerance.
    pub eps: f64,
    pub polynomial_kernel_constant: f64,
    pub polynomial_kernel_degree: f64,
}

impl Default for SvmParams {
    fn default() -> Self {
        Self {
            kernel: Kernel::Linear,
            gamma: Gamma::Scale,
            c: 1.0,
            eps: 1e-3,
            polynomial_kernel_constant: 1.0,
            polynomial_kernel_degree: 3.0,
        }
    }
}

/// Dense network hyper-parameters. `input_size == 0` means "use the width of
/// the feature matrix" (see [`ClassifierConfig::resolve_dims`]).
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DenseParams {
    pub input_size: usize,
    pub epochs: usize,
    pub batch_size: usize,
    pub seed: u64,
}

impl Default for DenseParams {
    fn default() -> Self {
        Self {
            input_size: 0,
            epochs: 50,
            batch_size: 32,
            seed: 42,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LstmParams {
    /// Width of one time step; rows are reshaped to `ncols / input_size` steps.
    pub input_size: usize,
    pub n_layers: usize,
    pub linear_dim: usize,
    pub dropout: f32,
    pub epochs: usize,
    pub batch_size: usize,
    pub seed: u64,
}

impl Default for LstmParams {
    fn default() -> Self {
        Self {
            input_size: 0,
            n_layers: 1,
            linear_dim: 32,
            dropout: 0.5,
            epochs: 50,
            batch_size: 32,
            seed: 42,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LstmTextParams {
    /// Width of one text time step.
    pub vector_size: usize,
    pub n_layers: usize,
    pub linear_dim: usize,
    pub dense_size: usize,
    /// Number of leading meta-feature columns in every row.
    pub numeric_feature_size: usize,
    pub dropout: f32,
    pub epochs: usize,
    pub batch_size: usize,
    pub seed: u64,
}

impl Default for LstmTextParams {
    fn default() -> Self {
        Self {
            vector_size: 0,
            n_layers: 1,
            linear_dim: 32,
            dense_size: 16,
            numeric_feature_size: 0,
            dropout: 0.5,
            epochs: 50,
            batch_size: 32,
            seed: 42,
        }
    }
}

/// One configured classifier variant.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierConfig {
    LogisticRegression(LogisticParams),
    Svm(SvmParams),
    Dense(DenseParams),
    Lstm(LstmParams),
    LstmText(LstmTextParams),
}

impl ClassifierConfig {
    /// Fill in input widths left at zero, given the feature matrix width and
    /// the number of meta-feature columns at its front.
    pub fn resolve_dims(&mut self, n_features: usize, n_meta: usize) {
        match self {
            ClassifierConfig::Dense(params) => {
                if params.input_size == 0 {
                    params.input_size = n_features;
                }
            }
            ClassifierConfig::Lstm(params) => {
                if params.input_size == 0 {
                    params.input_size = n_features;
                }
            }
            ClassifierConfig::LstmText(params) => {
                if params.numeric_feature_size == 0 {
                    params.numeric_feature_size = n_meta;
                }
                if params.vector_size == 0 {
                    params.vector_size = n_features.saturating_sub(params.numeric_feature_size);
                }
            }
            ClassifierConfig::LogisticRegression(_) | ClassifierConfig::Svm(_) => {}
        }
    }
}

impl FromStr for ClassifierConfig {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lr" | "logistic_regression" => {
                Ok(ClassifierConfig::LogisticRegression(LogisticParams::default()))
            }
            "svm" | "svm_linear" => Ok(ClassifierConfig::Svm(SvmParams::default())),
            "svm_rbf" => Ok(ClassifierConfig::Svm(SvmParams {
                kernel: Kernel::Rbf,
                ..Default::default()
            })),
            "svm_poly" => Ok(ClassifierConfig::Svm(SvmParams {
                kernel: Kernel::Poly,
                ..Default::default()
            })),
            "dnn" | "dense" => Ok(ClassifierConfig::Dense(DenseParams::default())),
            "lstm" => Ok(ClassifierConfig::Lstm(LstmParams::default())),
            "lstm_text" => Ok(ClassifierConfig::LstmText(LstmTextParams::default())),
            _ => Err(format!(
                "Unknown classifier: {}. Valid options are: lr, svm_linear, svm_rbf, svm_poly, dnn, lstm, lstm_text",
                s
            )),
        }
    }
}

/// TF-IDF vectorizer settings.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct VectorizerConfig {
    /// Keep at most this many terms, most frequent documents first.
    pub max_features: usize,
    /// Drop terms seen in fewer documents than this.
    pub min_df: usize,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            max_features: 1000,
            min_df: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kernel_from_str_accepts_aliases() {
        assert_eq!("RBF".parse::<Kernel>().unwrap(), Kernel::Rbf);
        assert_eq!("gauss".parse::<Kernel>().unwrap(), Kernel::Rbf);
        assert_eq!("linear".parse::<Kernel>().unwrap(), Kernel::Linear);
        assert!("liner".parse::<Kernel>().is_err());
    }

    #[test]
    fn kernel_aliases_work_in_json() {
        let params: SvmParams = serde_json::from_str(r#"{"kernel": "Gaussian"}"#).unwrap();
        assert_eq!(params.kernel, Kernel::Rbf);
        assert_eq!(serde_json::to_string(&Kernel::Poly).unwrap(), r#""poly""#);

        let err = serde_json::from_str::<SvmParams>(r#"{"kernel": "sigmoid"}"#).unwrap_err();
        assert!(err.to_string().contains("Unsupported kernel type"));
    }

    #[test]
    fn classifier_config_json_uses_defaults() {
        let cfg: ClassifierConfig = serde_json::from_str(r#"{"svm": {"kernel": "rbf"}}"#).unwrap();
        match cfg {
            ClassifierConfig::Svm(params) => {
                assert_eq!(params.kernel, Kernel::Rbf);
                assert_eq!(params.gamma, Gamma::Scale);
                assert!((params.c - 1.0).abs() < 1e-12);
            }
            other => panic!("unexpected config {:?}", other),
        }

        let gamma: Gamma = serde_json::from_str(r#"{"value": 0.5}"#).unwrap();
        assert_eq!(gamma, Gamma::Value(0.5));
    }

    #[test]
    fn resolve_dims_fills_only_missing_sizes() {
        let mut lstm_text = ClassifierConfig::LstmText(LstmTextParams::default());
        lstm_text.resolve_dims(110, 10);
        match lstm_text {
            ClassifierConfig::LstmText(p) => {
                assert_eq!(p.numeric_feature_size, 10);
                assert_eq!(p.vector_size, 100);
            }
            _ => unreachable!(),
        }

        let mut dense = ClassifierConfig::Dense(DenseParams {
            input_size: 7,
            ..Default::default()
        });
        dense.resolve_dims(110, 10);
        assert_eq!(
            dense,
            ClassifierConfig::Dense(DenseParams {
                input_size: 7,
                ..Default::default()
            })
        );
    }
}

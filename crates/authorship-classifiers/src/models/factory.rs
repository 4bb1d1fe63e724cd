use anyhow::Result;

use crate::config::ClassifierConfig;
use crate::models::classifier_trait::Classifier;
use crate::models::dense::DenseClassifier;
use crate::models::logistic::LogisticClassifier;
use crate::models::lstm::LstmClassifier;
use crate::models::lstm_text::LstmTextClassifier;
use crate::models::svm::SvmClassifier;

/// Build a boxed classifier from its configuration.
///
/// Neural variants allocate their weights here, so their input sizes must
/// already be resolved (see [`ClassifierConfig::resolve_dims`]).
pub fn build_classifier(config: &ClassifierConfig) -> Result<Box<dyn Classifier>> {
    Ok(match config {
        ClassifierConfig::LogisticRegression(params) => {
            Box::new(LogisticClassifier::new(params.clone()))
        }
        ClassifierConfig::Svm(params) => Box::new(SvmClassifier::new(params.clone())),
        ClassifierConfig::Dense(params) => Box::new(DenseClassifier::new(params.clone())?),
        ClassifierConfig::Lstm(params) => Box::new(LstmClassifier::new(params.clone())?),
        ClassifierConfig::LstmText(params) => Box::new(LstmTextClassifier::new(params.clone())?),
    })
}

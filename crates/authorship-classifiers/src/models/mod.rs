pub mod classifier_trait;
pub mod dense;
pub mod factory;
pub mod logistic;
pub mod lstm;
pub mod lstm_text;
pub mod svm;
pub mod utils;

pub use classifier_trait::{Classifier, MODEL_FILE_NAME};
pub use factory::build_classifier;

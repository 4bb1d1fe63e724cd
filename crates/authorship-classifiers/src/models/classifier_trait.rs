use std::path::Path;

use anyhow::Result;
use ndarray::Array2;

/// File every classifier saves to and loads from by default, relative to
/// the working directory. Each `save` overwrites it.
pub const MODEL_FILE_NAME: &str = "best_model";

/// Common contract of every authorship classifier.
///
/// Labels are `0`/`1`; probabilities are for class `1`.
pub trait Classifier {
    /// Fit on the whole training set.
    fn train(&mut self, x: &Array2<f32>, y: &[u32]) -> Result<()>;

    /// One class per row.
    fn predict(&self, x: &Array2<f32>) -> Result<Vec<u32>>;

    /// Probability of class `1` per row.
    fn predict_proba(&self, x: &Array2<f32>) -> Result<Vec<f32>>;

    /// Reporting key of the configured variant.
    fn name(&self) -> &str;

    /// Per-batch training losses, for gradient-trained classifiers.
    fn losses(&self) -> Option<&[f32]> {
        None
    }

    fn save_to(&self, path: &Path) -> Result<()>;

    /// Restore state written by [`Classifier::save_to`] into `self`. Neural
    /// classifiers must be built with the configuration used when saving.
    fn load_from(&mut self, path: &Path) -> Result<()>;

    fn save(&self) -> Result<()> {
        self.save_to(Path::new(MODEL_FILE_NAME))
    }

    fn load(&mut self) -> Result<()> {
        self.load_from(Path::new(MODEL_FILE_NAME))
    }
}

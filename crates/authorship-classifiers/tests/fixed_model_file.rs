//! `save`/`load` use a fixed file name in the working directory. This lives in
//! its own test binary because it changes the process working directory.
use authorship_classifiers::config::LogisticParams;
use authorship_classifiers::models::logistic::LogisticClassifier;
use authorship_classifiers::models::{Classifier, MODEL_FILE_NAME};
use ndarray::Array2;

#[test]
fn save_overwrites_best_model_in_working_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::env::set_current_dir(dir.path()).unwrap();

    let x = Array2::from_shape_vec(
        (6, 2),
        vec![1.0, 0.0, 0.0, 1.0, 1.0, 0.1, 0.0, 0.9, 1.1, 0.0, 0.0, 1.2],
    )
    .unwrap();
    let y = vec![1, 0, 1, 0, 1, 0];
    let flipped: Vec<u32> = y.iter().map(|&l| 1 - l).collect();

    let mut first = LogisticClassifier::new(LogisticParams::default());
    first.train(&x, &y).unwrap();
    first.save().unwrap();
    assert!(dir.path().join(MODEL_FILE_NAME).exists());

    let mut second = LogisticClassifier::new(LogisticParams::default());
    second.train(&x, &flipped).unwrap();
    second.save().unwrap();

    let mut restored = LogisticClassifier::new(LogisticParams::default());
    restored.load().unwrap();
    assert_eq!(restored.predict(&x).unwrap(), second.predict(&x).unwrap());
    assert_ne!(restored.predict(&x).unwrap(), first.predict(&x).unwrap());
}

use authorship_classifiers::config::{
    ClassifierConfig, DenseParams, Kernel, LogisticParams, LstmParams, LstmTextParams, SvmParams,
};
use authorship_classifiers::models::build_classifier;
use ndarray::Array2;

/// Two integer-valued meta columns followed by two continuous columns.
fn toy_data() -> (Array2<f32>, Vec<u32>) {
    let n = 16;
    let x = Array2::from_shape_fn((n, 4), |(i, j)| {
        let positive = i % 2 == 1;
        let sign = if positive { 1.0 } else { -1.0 };
        match j {
            0 => (positive as u32) as f32,
            1 => (i / 2) as f32,
            _ => sign * (0.5 + 0.05 * (i + j) as f32),
        }
    });
    let y = (0..n).map(|i| (i % 2) as u32).collect();
    (x, y)
}

/// Same layout, but only every third row is class 1.
fn majority_zero_data() -> (Array2<f32>, Vec<u32>) {
    let n = 18;
    let x = Array2::from_shape_fn((n, 4), |(i, j)| {
        let positive = i % 3 == 2;
        let sign = if positive { 1.0 } else { -1.0 };
        match j {
            0 => (positive as u32) as f32,
            1 => (i / 3) as f32,
            _ => sign * (0.5 + 0.05 * (i + j) as f32),
        }
    });
    let y = (0..n).map(|i| (i % 3 == 2) as u32).collect();
    (x, y)
}

fn classical_configs() -> Vec<ClassifierConfig> {
    configs()
        .into_iter()
        .filter(|c| {
            matches!(
                c,
                ClassifierConfig::LogisticRegression(_) | ClassifierConfig::Svm(_)
            )
        })
        .collect()
}

fn configs() -> Vec<ClassifierConfig> {
    let mut configs = vec![
        ClassifierConfig::LogisticRegression(LogisticParams::default()),
        ClassifierConfig::Svm(SvmParams::default()),
        ClassifierConfig::Svm(SvmParams {
            kernel: Kernel::Rbf,
            ..Default::default()
        }),
        ClassifierConfig::Svm(SvmParams {
            kernel: Kernel::Poly,
            polynomial_kernel_degree: 2.0,
            ..Default::default()
        }),
        ClassifierConfig::Dense(DenseParams {
            epochs: 3,
            batch_size: 4,
            ..Default::default()
        }),
        ClassifierConfig::Lstm(LstmParams {
            n_layers: 2,
            linear_dim: 8,
            epochs: 3,
            batch_size: 4,
            ..Default::default()
        }),
        ClassifierConfig::LstmText(LstmTextParams {
            linear_dim: 8,
            dense_size: 4,
            epochs: 3,
            batch_size: 4,
            ..Default::default()
        }),
    ];
    for config in configs.iter_mut() {
        config.resolve_dims(4, 2);
    }
    configs
}

#[test]
fn predictions_have_one_valid_value_per_row() {
    let (x, y) = toy_data();
    for config in configs() {
        let mut clf = build_classifier(&config).unwrap();
        clf.train(&x, &y).unwrap();

        let predictions = clf.predict(&x).unwrap();
        assert_eq!(predictions.len(), x.nrows(), "{}", clf.name());
        assert!(predictions.iter().all(|&p| p == 0 || p == 1), "{}", clf.name());

        let proba = clf.predict_proba(&x).unwrap();
        assert_eq!(proba.len(), x.nrows(), "{}", clf.name());
        assert!(
            proba.iter().all(|p| (0.0..=1.0).contains(p)),
            "{}: {:?}",
            clf.name(),
            proba
        );
    }
}

#[test]
fn classical_probabilities_point_at_class_one() {
    for (x, y) in [toy_data(), majority_zero_data()] {
        for config in classical_configs() {
            let mut clf = build_classifier(&config).unwrap();
            clf.train(&x, &y).unwrap();

            let predictions = clf.predict(&x).unwrap();
            let proba = clf.predict_proba(&x).unwrap();
            for (p, c) in proba.iter().zip(&predictions) {
                assert_eq!(*p >= 0.5, *c == 1, "{}: {:?}", clf.name(), proba);
            }
        }
    }
}

#[test]
fn neural_classifiers_record_one_loss_per_batch() {
    let (x, y) = toy_data();
    for config in configs() {
        let mut clf = build_classifier(&config).unwrap();
        clf.train(&x, &y).unwrap();
        match config {
            ClassifierConfig::Dense(_)
            | ClassifierConfig::Lstm(_)
            | ClassifierConfig::LstmText(_) => {
                // 16 rows in batches of 4, 3 epochs
                assert_eq!(clf.losses().map(<[f32]>::len), Some(12), "{}", clf.name());
            }
            _ => assert!(clf.losses().is_none(), "{}", clf.name()),
        }
    }
}

#[test]
fn save_and_load_reproduce_predictions() {
    let (x, y) = toy_data();
    let dir = tempfile::tempdir().unwrap();

    for config in configs() {
        let mut clf = build_classifier(&config).unwrap();
        clf.train(&x, &y).unwrap();
        let path = dir.path().join(clf.name());
        clf.save_to(&path).unwrap();

        let mut restored = build_classifier(&config).unwrap();
        restored.load_from(&path).unwrap();

        assert_eq!(clf.predict(&x).unwrap(), restored.predict(&x).unwrap(), "{}", clf.name());
        assert_eq!(
            clf.predict_proba(&x).unwrap(),
            restored.predict_proba(&x).unwrap(),
            "{}",
            clf.name()
        );
    }
}

#[test]
fn loading_a_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    for config in configs() {
        let mut clf = build_classifier(&config).unwrap();
        assert!(clf.load_from(&dir.path().join("nothing_here")).is_err());
    }
}

#[test]
fn evaluation_keys_by_classifier_and_vectorizer() {
    let (x, y) = toy_data();
    let config = ClassifierConfig::LogisticRegression(LogisticParams::default());
    let mut clf = build_classifier(&config).unwrap();
    clf.train(&x, &y).unwrap();

    let evaluated =
        authorship_classifiers::report::evaluate(clf.as_ref(), "TFIDF", &x, &y).unwrap();
    assert_eq!(evaluated.name, "Logistic_Regression_TFIDF");
    assert!(evaluated.scores.accuracy > 0.9);
    assert!(evaluated.scores.auc > 0.9);
    assert_eq!(evaluated.roc.fpr.first(), Some(&0.0));
    assert_eq!(evaluated.roc.tpr.last(), Some(&1.0));
    assert!(evaluated.losses.is_none());
}

#[test]
fn evaluation_auc_is_high_when_class_zero_dominates() {
    let (x, y) = majority_zero_data();
    for config in classical_configs() {
        let mut clf = build_classifier(&config).unwrap();
        clf.train(&x, &y).unwrap();

        let evaluated =
            authorship_classifiers::report::evaluate(clf.as_ref(), "TFIDF", &x, &y).unwrap();
        assert!(evaluated.scores.auc > 0.9, "{}: {}", evaluated.name, evaluated.scores.auc);
    }
}

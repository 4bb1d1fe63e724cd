//! Integration tests for CLI config parsing, util helpers and the train/plot flow.

use std::io::Write;

use authorship_classifiers::config::{ClassifierConfig, Kernel};
use authorship_classifiers::models::MODEL_FILE_NAME;
use authorship_cli::plot::{load_scores, run_plot};
use authorship_cli::train::input::{TrainConfig, DEFAULT_CLASSIFIERS};
use authorship_cli::train::trainer::{run_training, SCORES_FILE_NAME};
use authorship_cli::util::validate_tsv_or_csv_file;

// ---------------------------------------------------------------------------
// validate_tsv_or_csv_file
// ---------------------------------------------------------------------------

#[test]
fn validate_tsv_file_exists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tweets.tsv");
    std::fs::File::create(&path).unwrap();
    assert!(validate_tsv_or_csv_file(path.to_str().unwrap()).is_ok());
}

#[test]
fn validate_wrong_extension_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tweets.json");
    std::fs::File::create(&path).unwrap();
    assert!(validate_tsv_or_csv_file(path.to_str().unwrap()).is_err());
}

#[test]
fn validate_nonexistent_file_errors() {
    assert!(validate_tsv_or_csv_file("/nonexistent/path/tweets.tsv").is_err());
}

// ---------------------------------------------------------------------------
// TrainConfig
// ---------------------------------------------------------------------------

#[test]
fn train_config_default_values() {
    let cfg = TrainConfig::default();
    assert_eq!(cfg.classifiers.len(), DEFAULT_CLASSIFIERS.len());
    assert!(cfg.eval_data.is_none());
    assert!(cfg.eval_fraction > 0.0 && cfg.eval_fraction < 1.0);
    assert_eq!(cfg.meta_columns[0], "user_handle");
    assert_eq!(cfg.output_dir, ".");
}

#[test]
fn train_config_partial_json_keeps_defaults() {
    let cfg = TrainConfig::from_json(
        r#"{
            "train_data": "trump_train.tsv",
            "classifiers": [{"svm": {"kernel": "poly"}}, {"dense": {"epochs": 5}}],
            "seed": "not a number"
        }"#,
    )
    .unwrap();

    assert_eq!(cfg.train_data, "trump_train.tsv");
    assert_eq!(cfg.seed, TrainConfig::default().seed);
    assert_eq!(cfg.classifiers.len(), 2);
    match &cfg.classifiers[0] {
        ClassifierConfig::Svm(params) => assert_eq!(params.kernel, Kernel::Poly),
        other => panic!("unexpected classifier {:?}", other),
    }
    match &cfg.classifiers[1] {
        ClassifierConfig::Dense(params) => {
            assert_eq!(params.epochs, 5);
            assert_eq!(params.batch_size, 32);
        }
        other => panic!("unexpected classifier {:?}", other),
    }
}

#[test]
fn train_config_rejects_invalid_json() {
    assert!(TrainConfig::from_json("{ not json").is_err());
}

// ---------------------------------------------------------------------------
// train + plot
// ---------------------------------------------------------------------------

fn write_tweets(dir: &std::path::Path) -> String {
    let path = dir.join("train.tsv");
    let mut file = std::fs::File::create(&path).unwrap();
    for i in 0..40 {
        let (device, text, hour) = if i % 2 == 0 {
            ("android", "crooked media total disaster sad", 6)
        } else {
            ("iphone", "thank you join us tickets available", 15)
        };
        writeln!(
            file,
            "{}\t@realDonaldTrump\t{} {}\t2016-0{}-1{} {:02}:{:02}:00\t{}",
            i,
            text,
            i,
            1 + i % 9,
            i % 10,
            hour,
            i % 60,
            device
        )
        .unwrap();
    }
    path.to_str().unwrap().to_string()
}

#[test]
fn training_writes_scores_model_and_charts() {
    let dir = tempfile::tempdir().unwrap();
    let out_dir = dir.path().join("out");

    let mut config = TrainConfig::from_json(
        r#"{"classifiers": [
            {"logistic_regression": {}},
            {"dense": {"epochs": 2, "batch_size": 8}}
        ]}"#,
    )
    .unwrap();
    config.train_data = write_tweets(dir.path());
    config.output_dir = out_dir.to_str().unwrap().to_string();

    let results = run_training(&config).unwrap();
    let names: Vec<&str> = results.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Logistic_Regression_TFIDF", "DNN_TFIDF"]);
    assert!(results[0].losses.is_none());
    assert!(results[1].losses.as_ref().map_or(false, |l| !l.is_empty()));

    assert!(out_dir.join(MODEL_FILE_NAME).exists());
    assert!(out_dir.join("train_loss.html").exists());
    assert!(out_dir.join("f1.html").exists());

    let scores_path = out_dir.join(SCORES_FILE_NAME);
    assert_eq!(load_scores(&scores_path).unwrap(), results);

    let replot_dir = dir.path().join("replot");
    run_plot(&scores_path, &replot_dir).unwrap();
    assert!(replot_dir.join("roc_curves.html").exists());
}

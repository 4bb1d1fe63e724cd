use anyhow::{Context, Result};
use clap::ArgMatches;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use authorship_classifiers::config::{ClassifierConfig, VectorizerConfig};
use authorship_classifiers::preprocessing::TIMESTAMP_FEATURES;

/// Short names of the classifiers trained when the config lists none.
pub const DEFAULT_CLASSIFIERS: [&str; 6] =
    ["lr", "svm_linear", "svm_rbf", "dnn", "lstm", "lstm_text"];

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TrainConfig {
    pub train_data: String,
    /// Labelled evaluation file. When absent, `eval_fraction` of the
    /// training rows are held out instead.
    pub eval_data: Option<String>,
    pub eval_fraction: f64,
    pub output_dir: String,
    pub classifiers: Vec<ClassifierConfig>,
    pub vectorizer: VectorizerConfig,
    /// Meta-feature selectors; a selector also picks up its `<name>_*`
    /// dummy columns.
    pub meta_columns: Vec<String>,
    pub seed: u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        let mut meta_columns = vec![String::from("user_handle")];
        meta_columns.extend(TIMESTAMP_FEATURES.iter().map(|s| s.to_string()));

        TrainConfig {
            train_data: String::new(),
            eval_data: None,
            eval_fraction: 0.2,
            output_dir: String::from("."),
            classifiers: DEFAULT_CLASSIFIERS
                .iter()
                .filter_map(|s| ClassifierConfig::from_str(s).ok())
                .collect(),
            vectorizer: VectorizerConfig::default(),
            meta_columns,
            seed: 42,
        }
    }
}

impl TrainConfig {
    pub fn from_json(config_json: &str) -> Result<Self> {
        let partial: serde_json::Value =
            serde_json::from_str(config_json).context("Config is not valid JSON")?;
        let mut config = TrainConfig::default();

        macro_rules! load_or_default {
            ($field:ident) => {
                if let Some(val) = partial.get(stringify!($field)) {
                    match serde_json::from_value(val.clone()) {
                        Ok(parsed) => config.$field = parsed,
                        Err(e) => log::warn!(
                            "Config invalid value for '{}' ({}), using default: {:?}",
                            stringify!($field),
                            e,
                            config.$field
                        ),
                    }
                } else {
                    log::debug!(
                        "Config missing field '{}', using default: {:?}",
                        stringify!($field),
                        config.$field
                    );
                }
            };
        }

        load_or_default!(train_data);
        load_or_default!(eval_data);
        load_or_default!(eval_fraction);
        load_or_default!(output_dir);
        load_or_default!(classifiers);
        load_or_default!(vectorizer);
        load_or_default!(meta_columns);
        load_or_default!(seed);

        Ok(config)
    }

    pub fn from_arguments(config_path: &PathBuf, matches: &ArgMatches) -> Result<Self> {
        let config_json = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
        let mut config = TrainConfig::from_json(&config_json)?;

        // CLI overrides
        if let Some(train_data) = matches.get_one::<String>("train_data") {
            config.train_data = train_data.clone();
        }
        if let Some(eval_data) = matches.get_one::<String>("eval_data") {
            config.eval_data = Some(eval_data.clone());
        }
        if let Some(output_dir) = matches.get_one::<String>("output_dir") {
            config.output_dir = output_dir.clone();
        }
        if let Some(names) = matches.get_many::<String>("classifiers") {
            config.classifiers = names
                .map(|name| ClassifierConfig::from_str(name).map_err(anyhow::Error::msg))
                .collect::<Result<Vec<_>>>()?;
        }

        Ok(config)
    }
}

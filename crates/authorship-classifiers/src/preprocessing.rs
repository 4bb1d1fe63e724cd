//! Per-column preprocessing pipeline for tweet dumps.
//!
//! A split (train or test) is described by an ordered list of
//! [`ColumnSpec`]s. The raw file is read into one text column per entry, rows
//! with missing fields are dropped, then each transform runs in order on the
//! table left by the previous one.
use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use log::{debug, info};
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

use crate::data_handling::{Column, Table, TIMESTAMP_FORMAT};
use crate::error::ClassifierError;
use crate::io::read_raw_tsv;

/// Calendar features derived from every timestamp column, in output order.
pub const TIMESTAMP_FEATURES: [&str; 6] = [
    "day_of_week",
    "day_of_month",
    "month",
    "hour",
    "minute",
    "year",
];

/// The two device labels kept by the training split.
pub const ALLOWED_DEVICES: [&str; 2] = ["android", "iphone"];

const TIMESTAMP_INPUT_FORMATS: [&str; 4] = [
    TIMESTAMP_FORMAT,
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
];

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnTransform {
    /// Pass-through.
    Identity,
    /// One indicator column per distinct value.
    Dummy,
    /// Lowercase, collapse whitespace, tokenize, drop punctuation.
    Text,
    /// Parse and append calendar features.
    Timestamp,
    /// Keep rows whose value is allowed and encode by alphabetical rank.
    LabelEncode { allowed: Vec<String> },
}

impl ColumnTransform {
    pub fn apply(&self, table: Table, name: &str) -> Result<Table> {
        match self {
            ColumnTransform::Identity => Ok(table),
            ColumnTransform::Dummy => dummy_encode(table, name),
            ColumnTransform::Text => text_preprocess(table, name),
            ColumnTransform::Timestamp => timestamp_preprocess(table, name),
            ColumnTransform::LabelEncode { allowed } => label_encode(table, name, allowed),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    pub name: String,
    pub transform: ColumnTransform,
}

impl ColumnSpec {
    pub fn new(name: &str, transform: ColumnTransform) -> Self {
        Self {
            name: name.to_string(),
            transform,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetSplit {
    Train,
    Test,
}

impl DatasetSplit {
    /// Column layout of the raw file and the transform applied to each column.
    ///
    /// The test layout has no id and no device column.
    pub fn structure(&self) -> Vec<ColumnSpec> {
        match self {
            DatasetSplit::Train => vec![
                ColumnSpec::new("tweet_id", ColumnTransform::Identity),
                ColumnSpec::new("user_handle", ColumnTransform::Dummy),
                ColumnSpec::new("text", ColumnTransform::Text),
                ColumnSpec::new("timestamp", ColumnTransform::Timestamp),
                ColumnSpec::new(
                    "device",
                    ColumnTransform::LabelEncode {
                        allowed: ALLOWED_DEVICES.iter().map(|s| s.to_string()).collect(),
                    },
                ),
            ],
            DatasetSplit::Test => vec![
                ColumnSpec::new("user_handle", ColumnTransform::Dummy),
                ColumnSpec::new("text", ColumnTransform::Text),
                ColumnSpec::new("timestamp", ColumnTransform::Timestamp),
            ],
        }
    }
}

/// Load `path` and run the pipeline configured for `split`.
pub fn preprocess<P: AsRef<Path>>(path: P, split: DatasetSplit) -> Result<Table> {
    let structure = split.structure();
    let names: Vec<&str> = structure.iter().map(|s| s.name.as_str()).collect();
    let table = read_raw_tsv(&path, &names)?;
    let table = run_pipeline(table, &structure)
        .with_context(|| format!("Failed to preprocess {}", path.as_ref().display()))?;
    info!(
        "Preprocessed {:?} split: {} rows x {} columns",
        split,
        table.nrows(),
        table.ncols()
    );
    Ok(table)
}

/// Apply each transform in order; later transforms only see surviving rows.
pub fn run_pipeline(mut table: Table, structure: &[ColumnSpec]) -> Result<Table> {
    for spec in structure {
        let before = table.nrows();
        table = spec.transform.apply(table, &spec.name)?;
        debug!(
            "{:?} on '{}': {} -> {} rows",
            spec.transform,
            spec.name,
            before,
            table.nrows()
        );
    }
    Ok(table)
}

/// Replace a categorical column with `<name>_<value>` indicator columns
/// (sorted by value) appended at the end of the table.
pub fn dummy_encode(mut table: Table, name: &str) -> Result<Table> {
    let values = table.text(name)?.to_vec();
    let categories: BTreeSet<&str> = values.iter().map(String::as_str).collect();

    table.remove_column(name);
    for category in categories {
        let indicator = values.iter().map(|v| (v == category) as i64).collect();
        table.insert_column(format!("{}_{}", name, category), Column::Int(indicator));
    }
    Ok(table)
}

/// Normalize one tweet into word tokens.
///
/// Negated contractions are split before the verb (`don't` gives `do`, `n`, `t`).
pub fn normalize_text(text: &str, word: &Regex) -> Vec<String> {
    let lowered = text.to_lowercase();
    let collapsed = lowered.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .split_word_bounds()
        .flat_map(split_negation)
        .flat_map(|token| word.find_iter(token).map(|m| m.as_str().to_string()))
        .collect()
}

fn split_negation(token: &str) -> Vec<&str> {
    for suffix in ["n't", "n\u{2019}t"] {
        if let Some(stem) = token.strip_suffix(suffix) {
            if !stem.is_empty() {
                return vec![stem, &token[stem.len()..]];
            }
        }
    }
    vec![token]
}

fn word_regex() -> Result<Regex> {
    Ok(Regex::new(r"\w+")?)
}

pub fn text_preprocess(mut table: Table, name: &str) -> Result<Table> {
    let word = word_regex()?;
    let tokens = table
        .text(name)?
        .iter()
        .map(|text| normalize_text(text, &word))
        .collect();
    table.insert_column(name, Column::Tokens(tokens));
    Ok(table)
}

pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, ClassifierError> {
    let value = value.trim();
    TIMESTAMP_INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| ClassifierError::UnsupportedTimestamp(value.to_string()))
}

/// Calendar features in [`TIMESTAMP_FEATURES`] order. Monday is day 0.
pub fn timestamp_features(ts: &NaiveDateTime) -> [i64; 6] {
    [
        ts.weekday().num_days_from_monday() as i64,
        ts.day() as i64,
        ts.month() as i64,
        ts.hour() as i64,
        ts.minute() as i64,
        ts.year() as i64,
    ]
}

pub fn timestamp_preprocess(mut table: Table, name: &str) -> Result<Table> {
    let parsed = table
        .text(name)?
        .iter()
        .map(|v| parse_timestamp(v))
        .collect::<Result<Vec<_>, _>>()?;

    let features: Vec<[i64; 6]> = parsed.iter().map(timestamp_features).collect();
    table.insert_column(name, Column::Timestamp(parsed));
    for (i, feature) in TIMESTAMP_FEATURES.iter().enumerate() {
        table.insert_column(*feature, Column::Int(features.iter().map(|f| f[i]).collect()));
    }
    Ok(table)
}

/// Drop rows whose label is not in `allowed`, then encode the rest by the
/// alphabetical rank of the allowed values.
pub fn label_encode(table: Table, name: &str, allowed: &[String]) -> Result<Table> {
    let mut classes: Vec<&str> = allowed.iter().map(String::as_str).collect();
    classes.sort_unstable();
    classes.dedup();

    let values = table.text(name)?;
    let keep: Vec<bool> = values.iter().map(|v| classes.contains(&v.as_str())).collect();
    let dropped = keep.iter().filter(|&&k| !k).count();
    if dropped > 0 {
        debug!("Dropping {} rows with a '{}' outside {:?}", dropped, name, classes);
    }

    let mut table = table.filter_rows(&keep);
    let encoded = table
        .text(name)?
        .iter()
        .map(|v| classes.iter().position(|c| *c == v.as_str()).unwrap_or_default() as i64)
        .collect();
    table.insert_column(name, Column::Int(encoded));
    Ok(table)
}

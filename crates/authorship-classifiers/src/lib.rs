//! authorship-classifiers: telling tweet authors apart.
//!
//! This crate provides the preprocessing pipeline that turns raw tweet TSV
//! dumps into typed tables, a TF-IDF vectorizer, a uniform `Classifier`
//! interface over classical (`linfa`) and neural (`candle`) models,
//! evaluation metrics, and plotly comparison charts.
pub mod building_blocks;
pub mod config;
pub mod data_handling;
pub mod error;
pub mod io;
pub mod metrics;
pub mod models;
pub mod preprocessing;
pub mod report;
pub mod vectorize;

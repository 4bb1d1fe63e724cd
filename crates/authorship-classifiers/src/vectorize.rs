//! Turning preprocessed tables into feature matrices.
//!
//! Rows are laid out as `[meta features..., text vector...]`, which is the
//! layout `LstmTextClassifier` expects (meta prefix of fixed width).
use std::collections::HashMap;

use anyhow::Result;
use log::info;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::config::VectorizerConfig;
use crate::data_handling::{Column, Table};

/// Maps token lists to fixed-width numeric vectors.
pub trait Vectorizer {
    fn fit(&mut self, docs: &[Vec<String>]);

    fn transform(&self, docs: &[Vec<String>]) -> Array2<f32>;

    /// Short identifier used in report keys.
    fn name(&self) -> &str {
        "vectorizer"
    }

    fn dim(&self) -> usize;
}

/// TF-IDF with smoothed IDF (`ln((1 + n) / (1 + df)) + 1`) and L2-normalised rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TfIdfVectorizer {
    config: VectorizerConfig,
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
}

impl TfIdfVectorizer {
    pub fn new(config: VectorizerConfig) -> Self {
        Self {
            config,
            vocabulary: HashMap::new(),
            idf: Vec::new(),
        }
    }

    pub fn vocabulary(&self) -> &HashMap<String, usize> {
        &self.vocabulary
    }
}

impl Vectorizer for TfIdfVectorizer {
    fn fit(&mut self, docs: &[Vec<String>]) {
        let mut df: HashMap<&str, usize> = HashMap::new();
        for doc in docs {
            let mut seen: Vec<&str> = doc.iter().map(String::as_str).collect();
            seen.sort_unstable();
            seen.dedup();
            for term in seen {
                *df.entry(term).or_insert(0) += 1;
            }
        }

        let mut terms: Vec<(&str, usize)> = df
            .into_iter()
            .filter(|&(_, count)| count >= self.config.min_df)
            .collect();
        // Most frequent first, ties broken alphabetically so fits are reproducible
        terms.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        terms.truncate(self.config.max_features);
        terms.sort_by(|a, b| a.0.cmp(b.0));

        let n_docs = docs.len() as f32;
        self.vocabulary = terms
            .iter()
            .enumerate()
            .map(|(i, (term, _))| (term.to_string(), i))
            .collect();
        self.idf = terms
            .iter()
            .map(|&(_, count)| ((1.0 + n_docs) / (1.0 + count as f32)).ln() + 1.0)
            .collect();

        info!(
            "Fitted TF-IDF vocabulary of {} terms on {} documents",
            self.idf.len(),
            docs.len()
        );
    }

    fn transform(&self, docs: &[Vec<String>]) -> Array2<f32> {
        let mut out = Array2::<f32>::zeros((docs.len(), self.idf.len()));
        for (row, doc) in docs.iter().enumerate() {
            for token in doc {
                if let Some(&col) = self.vocabulary.get(token) {
                    out[[row, col]] += 1.0;
                }
            }
            let mut values = out.row_mut(row);
            values.zip_mut_with(&ndarray::aview1(&self.idf), |v, &idf| *v *= idf);
            let norm = values.iter().map(|v| v * v).sum::<f32>().sqrt();
            if norm > 0.0 {
                values.mapv_inplace(|v| v / norm);
            }
        }
        out
    }

    fn name(&self) -> &str {
        "TFIDF"
    }

    fn dim(&self) -> usize {
        self.idf.len()
    }
}

/// Resolves meta-feature columns on the training table and stacks them in
/// front of the text vectors.
///
/// A selector matches an integer column with the same name or any
/// `<selector>_...` column (the dummy columns of a categorical source).
/// Columns resolved on the training table but absent later (an unseen
/// handle, for instance) are filled with zeros.
pub struct FeatureAssembler {
    text_column: String,
    meta_columns: Vec<String>,
    vectorizer: Box<dyn Vectorizer>,
}

impl FeatureAssembler {
    pub fn fit(
        table: &Table,
        text_column: &str,
        meta_selectors: &[String],
        mut vectorizer: Box<dyn Vectorizer>,
    ) -> Result<Self> {
        let docs = table.tokens(text_column)?;
        vectorizer.fit(docs);

        let meta_columns: Vec<String> = table
            .columns()
            .filter(|(_, column)| matches!(column, Column::Int(_)))
            .map(|(name, _)| name)
            .filter(|name| {
                meta_selectors
                    .iter()
                    .any(|s| *name == s.as_str() || name.starts_with(&format!("{}_", s)))
            })
            .map(str::to_string)
            .collect();

        info!(
            "Feature layout: {} meta columns + {} text dimensions",
            meta_columns.len(),
            vectorizer.dim()
        );

        Ok(Self {
            text_column: text_column.to_string(),
            meta_columns,
            vectorizer,
        })
    }

    pub fn meta_columns(&self) -> &[String] {
        &self.meta_columns
    }

    pub fn n_features(&self) -> usize {
        self.meta_columns.len() + self.vectorizer.dim()
    }

    pub fn vectorizer_name(&self) -> &str {
        self.vectorizer.name()
    }

    pub fn transform(&self, table: &Table) -> Result<Array2<f32>> {
        let text = self.vectorizer.transform(table.tokens(&self.text_column)?);
        let n_meta = self.meta_columns.len();
        let mut out = Array2::<f32>::zeros((table.nrows(), n_meta + text.ncols()));

        for (j, name) in self.meta_columns.iter().enumerate() {
            if let Some(Column::Int(values)) = table.column(name) {
                for (i, &v) in values.iter().enumerate() {
                    out[[i, j]] = v as f32;
                }
            }
        }
        out.slice_mut(ndarray::s![.., n_meta..]).assign(&text);
        Ok(out)
    }
}

/// Integer label column as a 0/1 label vector.
pub fn labels(table: &Table, column: &str) -> Result<Vec<u32>> {
    Ok(table.int(column)?.iter().map(|&v| v as u32).collect())
}

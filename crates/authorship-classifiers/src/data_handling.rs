//! Column-oriented table used by the preprocessing pipeline.
//!
//! A `Table` is an ordered list of named columns of equal length. Columns are
//! typed (`Text`, `Tokens`, `Int`, `Timestamp`) so each transform can
//! check what it receives. Assigning to an existing name replaces the
//! column in place, assigning a new name appends it at the end.
use chrono::NaiveDateTime;

use crate::error::ClassifierError;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Text(Vec<String>),
    Tokens(Vec<Vec<String>>),
    Int(Vec<i64>),
    Timestamp(Vec<NaiveDateTime>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Text(v) => v.len(),
            Column::Tokens(v) => v.len(),
            Column::Int(v) => v.len(),
            Column::Timestamp(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Column::Text(_) => "text",
            Column::Tokens(_) => "tokens",
            Column::Int(_) => "integer",
            Column::Timestamp(_) => "timestamp",
        }
    }

    /// Gather the given rows, in the given order.
    pub fn select(&self, indices: &[usize]) -> Column {
        fn pick<T: Clone>(values: &[T], indices: &[usize]) -> Vec<T> {
            indices.iter().map(|&i| values[i].clone()).collect()
        }
        match self {
            Column::Text(v) => Column::Text(pick(v, indices)),
            Column::Tokens(v) => Column::Tokens(pick(v, indices)),
            Column::Int(v) => Column::Int(pick(v, indices)),
            Column::Timestamp(v) => Column::Timestamp(pick(v, indices)),
        }
    }

    /// Render one cell the way it is written to a TSV file.
    pub fn cell(&self, row: usize) -> String {
        match self {
            Column::Text(v) => v[row].clone(),
            Column::Tokens(v) => v[row].join(" "),
            Column::Int(v) => v[row].to_string(),
            Column::Timestamp(v) => v[row].format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    names: Vec<String>,
    columns: Vec<Column>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nrows(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    pub fn ncols(&self) -> usize {
        self.columns.len()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.names.iter().map(String::as_str).zip(self.columns.iter())
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.position(name).map(|idx| &self.columns[idx])
    }

    /// Like [`Table::column`] but a missing column is an error.
    pub fn require(&self, name: &str) -> Result<&Column, ClassifierError> {
        self.column(name)
            .ok_or_else(|| ClassifierError::MissingColumn(name.to_string()))
    }

    pub fn text(&self, name: &str) -> Result<&[String], ClassifierError> {
        match self.require(name)? {
            Column::Text(values) => Ok(values),
            other => Err(ClassifierError::ColumnType {
                column: name.to_string(),
                expected: "text",
                found: other.kind(),
            }),
        }
    }

    pub fn tokens(&self, name: &str) -> Result<&[Vec<String>], ClassifierError> {
        match self.require(name)? {
            Column::Tokens(values) => Ok(values),
            other => Err(ClassifierError::ColumnType {
                column: name.to_string(),
                expected: "tokens",
                found: other.kind(),
            }),
        }
    }

    pub fn int(&self, name: &str) -> Result<&[i64], ClassifierError> {
        match self.require(name)? {
            Column::Int(values) => Ok(values),
            other => Err(ClassifierError::ColumnType {
                column: name.to_string(),
                expected: "integer",
                found: other.kind(),
            }),
        }
    }

    /// Assign a column: replaces in place when `name` exists, appends otherwise.
    pub fn insert_column(&mut self, name: impl Into<String>, column: Column) {
        let name = name.into();
        debug_assert!(
            self.columns.is_empty() || column.len() == self.nrows(),
            "column '{}' has {} rows, table has {}",
            name,
            column.len(),
            self.nrows()
        );
        match self.position(&name) {
            Some(idx) => self.columns[idx] = column,
            None => {
                self.names.push(name);
                self.columns.push(column);
            }
        }
    }

    pub fn remove_column(&mut self, name: &str) -> Option<Column> {
        let idx = self.position(name)?;
        self.names.remove(idx);
        Some(self.columns.remove(idx))
    }

    /// New table holding only the given rows, in the given order.
    pub fn select_rows(&self, indices: &[usize]) -> Table {
        Table {
            names: self.names.clone(),
            columns: self.columns.iter().map(|c| c.select(indices)).collect(),
        }
    }

    /// Keep the rows for which `keep` is true.
    pub fn filter_rows(&self, keep: &[bool]) -> Table {
        let indices: Vec<usize> = keep
            .iter()
            .enumerate()
            .filter_map(|(i, &k)| if k { Some(i) } else { None })
            .collect();
        self.select_rows(&indices)
    }
}

use std::error::Error;
use std::fmt;

/// Failures raised by this crate itself. Errors coming out of `linfa`,
/// `candle`, `csv` or `chrono` are passed through untouched.
#[derive(Debug)]
pub enum ClassifierError {
    NotTrained(String), // Name of the model that was used before `train`
    UnknownKernel(String),
    UnsupportedTimestamp(String),
    MissingColumn(String),
    ColumnType {
        column: String,
        expected: &'static str,
        found: &'static str,
    },
}

impl fmt::Display for ClassifierError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ClassifierError::NotTrained(name) => {
                write!(f, "{} has not been trained or loaded yet", name)
            }
            ClassifierError::UnknownKernel(kernel) => write!(
                f,
                "Unsupported kernel type: {}. Valid options are: linear, rbf, poly",
                kernel
            ),
            ClassifierError::UnsupportedTimestamp(value) => {
                write!(f, "Could not parse timestamp '{}'", value)
            }
            ClassifierError::MissingColumn(name) => write!(f, "Missing column '{}'", name),
            ClassifierError::ColumnType {
                column,
                expected,
                found,
            } => write!(
                f,
                "Column '{}' is a {} column, expected {}",
                column, found, expected
            ),
        }
    }
}

impl Error for ClassifierError {}

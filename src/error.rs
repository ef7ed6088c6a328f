use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Required column '{0}' not found")]
    MissingColumn(String),

    #[error("Column '{column}' holds non-integer value '{value}'")]
    InvalidCategory { column: String, value: String },

    #[error("Category {value} was not seen when fitting column '{column}'")]
    UnknownCategory { column: String, value: i64 },

    #[error("Invalid parameter: {name} = {value}, {reason}")]
    InvalidParameter {
        name: String,
        value: String,
        reason: String,
    },

    #[error("Invalid shape: expected {expected}, got {actual}")]
    Shape { expected: String, actual: String },

    #[error("Model not fitted. Call fit() first.")]
    NotFitted,

    #[error("Gradient descent diverged after {iterations} iterations")]
    Diverged { iterations: usize },

    #[error("Dataset is empty: {0}")]
    EmptyDataset(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to write report: {0}")]
    Output(std::io::Error),
}

impl Error {
    /// Failures that happen before any row is in memory: the file itself is
    /// missing, unreadable, malformed or lacks a required column.
    pub fn is_load_error(&self) -> bool {
        matches!(self, Error::Io(_) | Error::Csv(_) | Error::MissingColumn(_))
    }

    pub(crate) fn shape(expected: impl ToString, actual: impl ToString) -> Self {
        Error::Shape {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}

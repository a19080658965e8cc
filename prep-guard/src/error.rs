//! Error types for prep-guard.
//!
//! All fallible operations outside the analyzer core return [`PrepError`].
//! Analyzer failures are reported as [`AnalyzerError`](crate::analyzers::AnalyzerError)
//! and convert into `PrepError` through `?`.

use std::path::PathBuf;

use thiserror::Error;

use crate::analyzers::AnalyzerError;

/// The main error type for prep-guard.
#[derive(Error, Debug)]
pub enum PrepError {
    /// Error from an analyzer (type inference, fuzzy scan, MECE check).
    #[error(transparent)]
    Analyzer(#[from] AnalyzerError),

    /// Error from DataFusion operations.
    #[error("DataFusion error: {0}")]
    DataFusion(#[from] datafusion::error::DataFusionError),

    /// Error from Arrow operations.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Error from Parquet writing.
    #[cfg(feature = "parquet")]
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// Error from spreadsheet reading.
    #[cfg(feature = "excel")]
    #[error("Excel error: {0}")]
    Excel(String),

    /// Error from I/O operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The requested file does not exist.
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// The file extension is not one of the supported formats.
    #[error("Unsupported file format '{extension}'. Use one of: {supported}")]
    UnsupportedFormat {
        extension: String,
        supported: String,
    },

    /// Error when a required column is not found in the dataset.
    #[error("Column '{column}' not found in dataset")]
    ColumnNotFound { column: String },

    /// An argument was outside its accepted domain.
    #[error("Invalid argument '{name}': {message}")]
    InvalidArgument { name: String, message: String },

    /// Error related to configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Error from serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A stored checksum does not match the file on disk.
    #[error("Checksum mismatch for {}: expected {expected}, found {actual}", path.display())]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    /// Generic internal error for unexpected conditions.
    #[error("Internal error: {0}")]
    Internal(String),

    /// Security-related error.
    #[error("Security error: {0}")]
    SecurityError(String),
}

/// A type alias for `Result<T, PrepError>`.
pub type Result<T> = std::result::Result<T, PrepError>;

impl PrepError {
    /// Creates a new invalid argument error.
    pub fn invalid_argument(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates a new unsupported format error.
    pub fn unsupported_format(extension: impl Into<String>, supported: &[&str]) -> Self {
        Self::UnsupportedFormat {
            extension: extension.into(),
            supported: supported.join(", "),
        }
    }

    /// Creates a new column not found error.
    pub fn column_not_found(column: impl Into<String>) -> Self {
        Self::ColumnNotFound {
            column: column.into(),
        }
    }
}

impl From<serde_json::Error> for PrepError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Extension trait for adding context to errors.
pub trait ErrorContext<T> {
    /// Adds context to an error.
    fn context(self, msg: &str) -> Result<T>;

    /// Adds context with a lazy message.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<PrepError>,
{
    fn context(self, msg: &str) -> Result<T> {
        self.map_err(|e| match e.into() {
            PrepError::Internal(inner) => PrepError::Internal(format!("{msg}: {inner}")),
            other => PrepError::Internal(format!("{msg}: {other}")),
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let msg = f();
            match e.into() {
                PrepError::Internal(inner) => PrepError::Internal(format!("{msg}: {inner}")),
                other => PrepError::Internal(format!("{msg}: {other}")),
            }
        })
    }
}

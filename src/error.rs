//! Error types shared by the query engine, the dataset loader and the CLI.

use thiserror::Error;

/// Errors produced while loading trip data or answering a query.
#[derive(Debug, Error)]
pub enum TaxiError {
    /// Wraps underlying I/O errors (opening or reading the dataset).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Wraps errors from Arrow compute kernels.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Wraps errors from the Parquet reader.
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// Wraps JSON encoding errors when printing results.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A required trip column is not present in the dataset.
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// A column exists but cannot be read as the expected type.
    #[error("Column {column} has unsupported type {found}")]
    ColumnType { column: String, found: String },

    /// A value type was constructed from malformed input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type TaxiResult<T> = std::result::Result<T, TaxiError>;

//! Error types for CSV ingestion.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while ingesting tabular product data.
#[derive(Debug, Error)]
pub enum IngestError {
    /// CSV directory or file could not be accessed.
    #[error("ingest io failure")]
    Io {
        /// Operation that triggered the IO failure.
        operation: &'static str,
        /// Path involved in the IO failure.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// CSV file could not be opened or its header row read.
    #[error("csv file invalid")]
    Csv {
        /// Path of the offending CSV file.
        path: PathBuf,
        /// Underlying CSV error.
        source: csv::Error,
    },
    /// A required column is missing from the header row.
    #[error("required column missing")]
    MissingColumn {
        /// Path of the offending CSV file.
        path: PathBuf,
        /// Name of the missing column.
        column: String,
    },
}

/// Convenience alias for ingest results.
pub type IngestResult<T> = Result<T, IngestError>;

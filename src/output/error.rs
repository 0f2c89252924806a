//! Output error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors writing a single per-page file
///
/// Fatal to that page's task only.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to encode records for {path}: {source}")]
    Encode {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Errors combining per-page files into the dataset
///
/// Any of these aborts the run, since a partial dataset is not valid output.
#[derive(Debug, Error)]
pub enum AggregationError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to decode {path} (line {line}): {source}")]
    Decode {
        path: PathBuf,
        /// 1-based; 0 for a whole-file JSON array
        line: usize,
        source: serde_json::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to encode combined dataset {path}: {source}")]
    Encode {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Result type for page writes
pub type WriteResult<T> = Result<T, WriteError>;

/// Result type for aggregation
pub type AggregationResult<T> = Result<T, AggregationError>;

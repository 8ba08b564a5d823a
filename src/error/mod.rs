//! Error handling for MRIO construction.
//!
//! Alignment and dimension failures are detected eagerly where a matrix is
//! built. None of them are retried: the derivation is deterministic, so a
//! failure aborts the whole build.

use std::io;

use arrow::error::ArrowError;
use parquet::errors::ParquetError;

/// Errors raised while building or exporting an MRIO table
#[derive(Debug, thiserror::Error)]
pub enum MrioError {
    /// The label registry could not be built because a dimension is empty
    #[error("Missing dimension data: {0}")]
    MissingDimensionData(String),

    /// A table's keys cannot be aligned with the canonical region/sector order
    #[error("Dimension mismatch in {context}: {detail}")]
    DimensionMismatch {
        /// What was being aligned or combined
        context: String,
        /// Which label or shape failed
        detail: String,
    },

    /// A named dimension does not exist in a long-format table
    #[error("Unknown dimension '{dimension}' (available: {available})")]
    UnknownDimension {
        /// The dimension that was requested
        dimension: String,
        /// Comma-separated list of the table's dimensions
        available: String,
    },

    /// A record batch does not have the columns an adapter expects
    #[error("Schema error: {0}")]
    Schema(String),

    /// Arrow error
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// Parquet error
    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Arrow (de)serialization error
    #[error("Serde arrow error: {0}")]
    SerdeArrow(#[from] serde_arrow::Error),
}

impl MrioError {
    /// Shorthand for a [`MrioError::DimensionMismatch`]
    pub fn mismatch(context: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::DimensionMismatch {
            context: context.into(),
            detail: detail.into(),
        }
    }
}

/// Result type for MRIO operations
pub type Result<T> = std::result::Result<T, MrioError>;

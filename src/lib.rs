//! A Rust library for building multi-regional input-output (MRIO) tables
//! from GTAP variables, following Peters, Andrew & Lennox (2011).

pub mod adapters;
pub mod algorithm;
pub mod config;
pub mod dataset;
pub mod error;
pub mod export;
pub mod extension;
pub mod labels;
pub mod loader;
pub mod matrix;
pub mod mrio;
pub mod reshape;
pub mod utils;

// Re-export the most common types for easier use
// Core types
pub use config::MrioConfig;
pub use dataset::GtapDataSet;
pub use error::{MrioError, Result};
pub use mrio::Mrio;

// Aligned data
pub use extension::{Extension, StressorMatrix};
pub use labels::{AxisLayout, LabelOrder};
pub use matrix::{DenseMatrix, FlowVector};
pub use reshape::{LabeledMatrix, LongTable, long_to_wide, wide_to_long};

// Input and output
pub use export::MrioSnapshot;
pub use loader::{load_dataset, read_parquet};

// Arrow types
pub use arrow::record_batch::RecordBatch;

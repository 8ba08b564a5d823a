//! Snapshot export
//!
//! A [`MrioSnapshot`] is the set of coefficient matrices handed to the
//! outside world once a derivation is complete: A, S and y with their labels.
//! It serializes to JSON as is, and to Arrow/Parquet as a long table of
//! non-zero cells.

use std::fs::File;
use std::path::Path;
use std::time::Instant;

use anyhow::Context;
use arrow::datatypes::FieldRef;
use arrow::record_batch::RecordBatch;
use chrono::{DateTime, Utc};
use ndarray::{Array1, Array2};
use parquet::arrow::ArrowWriter;
use serde::{Deserialize, Serialize};
use serde_arrow::schema::{SchemaLike, TracingOptions};

use crate::error::Result;
use crate::utils::logging::{log_operation_complete, log_operation_start};

/// Column label used for the final demand vector in long records
pub const FINAL_DEMAND_COLUMN: &str = "final demand";

/// Coefficient matrices of a completed MRIO
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MrioSnapshot {
    pub generated_at: DateTime<Utc>,
    /// Joined (region, sector) labels, the rows and columns of A
    #[serde(rename = "PRO")]
    pub products: Vec<String>,
    /// Stressor labels, the rows of S
    #[serde(rename = "STR")]
    pub stressors: Vec<String>,
    #[serde(rename = "A")]
    pub a: Array2<f64>,
    #[serde(rename = "S")]
    pub s: Option<Array2<f64>>,
    pub y: Array1<f64>,
}

/// One non-zero cell of a snapshot matrix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoefficientRecord {
    pub matrix: String,
    pub row: String,
    pub column: String,
    pub value: f64,
}

impl MrioSnapshot {
    #[must_use]
    pub fn new(
        products: Vec<String>,
        stressors: Vec<String>,
        a: Array2<f64>,
        s: Option<Array2<f64>>,
        y: Array1<f64>,
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            products,
            stressors,
            a,
            s,
            y,
        }
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn write_json(&self, path: &Path) -> anyhow::Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create snapshot file: {}", path.display()))?;
        serde_json::to_writer(file, self)
            .with_context(|| format!("Failed to write snapshot to {}", path.display()))
    }

    /// Non-zero cells of A, S and y as long records
    #[must_use]
    pub fn coefficient_records(&self) -> Vec<CoefficientRecord> {
        let mut records = Vec::new();
        push_matrix(&mut records, "A", &self.products, &self.products, &self.a);
        if let Some(s) = &self.s {
            push_matrix(&mut records, "S", &self.stressors, &self.products, s);
        }
        for (label, &value) in self.products.iter().zip(&self.y) {
            if value != 0.0 {
                records.push(CoefficientRecord {
                    matrix: "y".to_string(),
                    row: label.clone(),
                    column: FINAL_DEMAND_COLUMN.to_string(),
                    value,
                });
            }
        }
        records
    }

    /// Long records as a single Arrow batch
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        let records = self.coefficient_records();
        let fields = Vec::<FieldRef>::from_type::<CoefficientRecord>(TracingOptions::default())?;
        Ok(serde_arrow::to_record_batch(&fields, &records)?)
    }

    /// Write the long records to a parquet file
    pub fn write_parquet(&self, path: &Path) -> anyhow::Result<()> {
        let start = Instant::now();
        log_operation_start("Writing MRIO snapshot to", path);

        let batch = self.to_record_batch()?;
        let file = File::create(path)
            .with_context(|| format!("Failed to create parquet file: {}", path.display()))?;
        let mut writer = ArrowWriter::try_new(file, batch.schema(), None)
            .with_context(|| format!("Failed to create parquet writer for {}", path.display()))?;
        writer
            .write(&batch)
            .with_context(|| format!("Failed to write record batch to {}", path.display()))?;
        writer
            .close()
            .with_context(|| format!("Failed to finish parquet file {}", path.display()))?;

        log_operation_complete("wrote", path, batch.num_rows(), Some(start.elapsed()));
        Ok(())
    }
}

fn push_matrix(
    records: &mut Vec<CoefficientRecord>,
    matrix: &str,
    rows: &[String],
    cols: &[String],
    values: &Array2<f64>,
) {
    for ((i, j), &value) in values.indexed_iter() {
        if value != 0.0 {
            records.push(CoefficientRecord {
                matrix: matrix.to_string(),
                row: rows[i].clone(),
                column: cols[j].clone(),
                value,
            });
        }
    }
}

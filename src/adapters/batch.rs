//! Record batch to table conversion
//!
//! Long tables come from batches with one string column per dimension and
//! one numeric value column. Wide tables come from batches with a string
//! label column and one numeric column per column label, the layout of the
//! GTAP two-dimensional variables.

use arrow::array::{Array, ArrayRef, Float64Array, StringArray};
use arrow::compute::concat_batches;
use arrow::compute::kernels::cast;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use log::warn;
use ndarray::Array2;

use super::labels::{clean_label, is_total_label};
use crate::error::{MrioError, Result};
use crate::reshape::{LabeledMatrix, LongTable};

/// Build a long table from batches sharing one schema
///
/// `dimensions` name the key columns, in key order. Labels are cleaned;
/// rows with a null key or value are skipped.
pub fn long_table_from_batches(
    batches: &[RecordBatch],
    dimensions: &[&str],
    value_column: &str,
) -> Result<LongTable> {
    let mut table = LongTable::new(dimensions.iter().copied(), value_column);
    let mut skipped = 0;

    for batch in batches {
        let keys = dimensions
            .iter()
            .map(|d| string_column(batch, d))
            .collect::<Result<Vec<_>>>()?;
        let values = float_column(batch, value_column)?;

        for row in 0..batch.num_rows() {
            if values.is_null(row) || keys.iter().any(|k| k.is_null(row)) {
                skipped += 1;
                continue;
            }
            table.push(
                keys.iter().map(|k| clean_label(k.value(row))),
                values.value(row),
            )?;
        }
    }

    if skipped > 0 {
        warn!("Skipped {skipped} records with null keys or values in '{value_column}' table");
    }
    Ok(table)
}

/// Build a wide table from batches sharing one schema
///
/// `label_column` holds the row labels; every other column must be numeric
/// and becomes one labelled column. Labels are cleaned and `Total` rows and
/// columns removed.
///
/// Columns that are entirely null are dropped, then rows with any remaining
/// null. A column with only some nulls is kept and loses those rows instead,
/// so a gap in one region's column never removes that region from the table.
pub fn wide_table_from_batches(
    batches: &[RecordBatch],
    label_column: &str,
    row_name: &str,
    col_name: &str,
) -> Result<LabeledMatrix> {
    let Some(first) = batches.first() else {
        return Err(MrioError::Schema(format!(
            "no record batches for table keyed by '{label_column}'"
        )));
    };
    let batch = concat_batches(&first.schema(), batches)?;

    let labels = string_column(&batch, label_column)?;
    let schema = batch.schema();
    let mut columns = Vec::new();
    for field in schema.fields().iter().filter(|f| f.name() != label_column) {
        let values = float_column(&batch, field.name())?;
        if values.null_count() == values.len() {
            continue;
        }
        columns.push((field.name().clone(), values));
    }

    let rows: Vec<usize> = (0..batch.num_rows())
        .filter(|&r| !labels.is_null(r) && columns.iter().all(|(_, c)| !c.is_null(r)))
        .collect();
    if rows.len() < batch.num_rows() {
        warn!(
            "Dropped {} incomplete rows from table keyed by '{label_column}'",
            batch.num_rows() - rows.len()
        );
    }

    let values = Array2::from_shape_fn((rows.len(), columns.len()), |(i, j)| {
        columns[j].1.value(rows[i])
    });
    let table = LabeledMatrix::from_labels(
        row_name,
        col_name,
        rows.iter().map(|&r| labels.value(r).to_string()),
        columns.iter().map(|(name, _)| name.clone()),
        values,
    )?;

    Ok(table.map_labels(clean_label).drop_labels(is_total_label))
}

fn column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef> {
    batch.column_by_name(name).ok_or_else(|| {
        let available: Vec<String> = batch
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect();
        MrioError::Schema(format!(
            "column '{name}' not found (available: {})",
            available.join(", ")
        ))
    })
}

fn string_column(batch: &RecordBatch, name: &str) -> Result<StringArray> {
    let array = cast::cast(column(batch, name)?, &DataType::Utf8)?;
    array
        .as_any()
        .downcast_ref::<StringArray>()
        .cloned()
        .ok_or_else(|| MrioError::Schema(format!("column '{name}' is not a string column")))
}

fn float_column(batch: &RecordBatch, name: &str) -> Result<Float64Array> {
    let source = column(batch, name)?;
    if !source.data_type().is_numeric() {
        return Err(MrioError::Schema(format!(
            "column '{name}' has type {}, expected a numeric type",
            source.data_type()
        )));
    }
    let array = cast::cast(source, &DataType::Float64)?;
    array
        .as_any()
        .downcast_ref::<Float64Array>()
        .cloned()
        .ok_or_else(|| MrioError::Schema(format!("column '{name}' could not be read as f64")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::Int64Array;
    use arrow::datatypes::{Field, Schema};
    use std::sync::Arc;

    fn vipm_batch() -> RecordBatch {
        let schema = Arc::new(Schema::new(vec![
            Field::new("sector", DataType::Utf8, true),
            Field::new("1 EU", DataType::Float64, true),
            Field::new("2 NorthAmer", DataType::Float64, true),
            Field::new("Total", DataType::Float64, true),
            Field::new("empty", DataType::Float64, true),
        ]));
        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(vec!["1 PDR", "2 WHT", "Total"])),
                Arc::new(Float64Array::from(vec![0.25, 2956.0, 2956.25])),
                Arc::new(Float64Array::from(vec![Some(0.051), Some(0.495), None])),
                Arc::new(Float64Array::from(vec![0.301, 2956.495, 2956.796])),
                Arc::new(Float64Array::from(vec![None::<f64>, None, None])),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_wide_table_cleanup() {
        let table = wide_table_from_batches(&[vipm_batch()], "sector", "sector", "region").unwrap();
        assert_eq!(table.shape(), (2, 2));
        assert_eq!(table.get(&["pdr"], &["northamer"]), Some(0.051));
        assert_eq!(table.get(&["wht"], &["eu"]), Some(2956.0));
        assert_eq!(table.get(&["total"], &["eu"]), None);
    }

    #[test]
    fn test_partially_null_column_is_kept() {
        // the Total row is the only null in the northamer column
        let table = wide_table_from_batches(&[vipm_batch()], "sector", "sector", "region").unwrap();
        assert_eq!(table.get(&["pdr"], &["northamer"]), Some(0.051));
        assert_eq!(table.get(&["wht"], &["northamer"]), Some(0.495));
        assert_eq!(table.get(&["total"], &["northamer"]), None);
    }

    #[test]
    fn test_long_table_casts_and_skips_nulls() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("origin", DataType::Utf8, false),
            Field::new("destination", DataType::Utf8, false),
            Field::new("commodity", DataType::Utf8, false),
            Field::new("amount", DataType::Int64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(vec!["EU", "EU"])),
                Arc::new(StringArray::from(vec!["NorthAmer", "EU"])),
                Arc::new(StringArray::from(vec!["1 PDR", "2 WHT"])),
                Arc::new(Int64Array::from(vec![Some(24), None])),
            ],
        )
        .unwrap();

        let table =
            long_table_from_batches(&[batch], &["origin", "destination", "commodity"], "amount")
                .unwrap();
        assert_eq!(table.len(), 1);
        let (key, value) = table.iter().next().unwrap();
        assert_eq!(key, ["eu", "northamer", "pdr"]);
        assert_eq!(value, 24.0);
    }

    #[test]
    fn test_missing_column_is_schema_error() {
        let err = long_table_from_batches(&[vipm_batch()], &["origin"], "amount").unwrap_err();
        assert!(matches!(err, MrioError::Schema(_)));
    }
}

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use gtap_mrio::{LabeledMatrix, LongTable, RecordBatch};
use parquet::arrow::ArrowWriter;

/// Initialise logging once per test binary
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Assert two floats agree to a relative tolerance
pub fn assert_close(actual: f64, expected: f64) {
    let scale = expected.abs().max(1.0);
    assert!(
        (actual - expected).abs() <= 1e-9 * scale,
        "expected {expected}, got {actual}"
    );
}

/// Record batch with one string column per dimension and an `amount` column
pub fn long_batch(table: &LongTable, column_order: &[&str]) -> RecordBatch {
    let positions: Vec<usize> = column_order
        .iter()
        .map(|name| table.dims().iter().position(|d| d == name).unwrap())
        .collect();

    let mut fields: Vec<Field> = column_order
        .iter()
        .map(|name| Field::new(*name, DataType::Utf8, false))
        .collect();
    fields.push(Field::new(table.value_name(), DataType::Float64, false));

    let mut columns: Vec<ArrayRef> = positions
        .iter()
        .map(|&p| {
            let labels: Vec<&str> = table.iter().map(|(key, _)| key[p].as_str()).collect();
            Arc::new(StringArray::from(labels)) as ArrayRef
        })
        .collect();
    let values: Vec<f64> = table.iter().map(|(_, v)| v).collect();
    columns.push(Arc::new(Float64Array::from(values)));

    RecordBatch::try_new(Arc::new(Schema::new(fields)), columns).unwrap()
}

/// Record batch with a `sector` label column and one column per region
pub fn wide_batch(table: &LabeledMatrix) -> RecordBatch {
    let mut fields = vec![Field::new("sector", DataType::Utf8, false)];
    let labels: Vec<&str> = table.row_keys().iter().map(|k| k[0].as_str()).collect();
    let mut columns: Vec<ArrayRef> = vec![Arc::new(StringArray::from(labels))];

    for (j, key) in table.col_keys().iter().enumerate() {
        fields.push(Field::new(key[0].as_str(), DataType::Float64, false));
        let values: Vec<f64> = table.values().column(j).to_vec();
        columns.push(Arc::new(Float64Array::from(values)));
    }
    RecordBatch::try_new(Arc::new(Schema::new(fields)), columns).unwrap()
}

/// Write a single batch to a parquet file
pub fn write_parquet(path: &Path, batch: &RecordBatch) {
    let file = File::create(path).unwrap();
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None).unwrap();
    writer.write(batch).unwrap();
    writer.close().unwrap();
}

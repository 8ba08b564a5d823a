//! Parquet file loading
//!
//! A GTAP dataset directory holds one parquet file per variable:
//!
//! - `vxmd.parquet`: columns `origin`, `destination`, `commodity`, `amount`
//! - `vdfm.parquet`, `vifm.parquet`: columns `region`, `input`, `output`, `amount`
//! - `vdpm`, `vipm`, `vdgm`, `vigm`, `vom`: a sector label column followed by
//!   one numeric column per region

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, ensure};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use rayon::prelude::*;
use rustc_hash::FxHashMap;

use crate::adapters::{long_table_from_batches, wide_table_from_batches};
use crate::dataset::{GtapDataSet, dims};
use crate::reshape::{LabeledMatrix, LongTable};
use crate::utils::logging::{log_operation_complete, log_operation_start, log_warning};

const LONG_VARIABLES: [(&str, [&str; 3]); 3] = [
    ("vxmd", [dims::ORIGIN, dims::DESTINATION, dims::COMMODITY]),
    ("vdfm", [dims::REGION, dims::INPUT, dims::OUTPUT]),
    ("vifm", [dims::REGION, dims::INPUT, dims::OUTPUT]),
];

const WIDE_VARIABLES: [&str; 5] = ["vdpm", "vipm", "vdgm", "vigm", "vom"];

/// Read a parquet file into Arrow record batches
pub fn read_parquet(path: &Path) -> anyhow::Result<Vec<RecordBatch>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open parquet file: {}", path.display()))?;

    let reader = ParquetRecordBatchReaderBuilder::try_new(file)
        .with_context(|| format!("Failed to read parquet file: {}", path.display()))?
        .build()
        .with_context(|| format!("Failed to build parquet reader for {}", path.display()))?;

    let mut batches = Vec::new();
    for batch_result in reader {
        let batch = batch_result
            .with_context(|| format!("Failed to read record batch from {}", path.display()))?;
        batches.push(batch);
    }
    Ok(batches)
}

/// Load every GTAP variable from a directory, reading files in parallel
pub fn load_dataset(dir: &Path) -> anyhow::Result<GtapDataSet> {
    let start = Instant::now();
    log_operation_start("Loading GTAP dataset from", dir);
    ensure!(dir.is_dir(), "Directory does not exist: {}", dir.display());

    let names: Vec<&str> = LONG_VARIABLES
        .iter()
        .map(|(name, _)| *name)
        .chain(WIDE_VARIABLES)
        .collect();
    let batches: FxHashMap<&str, Vec<RecordBatch>> = names
        .par_iter()
        .map(|&name| {
            let path = dir.join(format!("{name}.parquet"));
            read_parquet(&path).map(|b| (name, b))
        })
        .collect::<anyhow::Result<_>>()?;

    let [exports, domestic, imports] = LONG_VARIABLES.map(|(name, dimensions)| {
        long_variable(&batches, name, &dimensions, dir)
    });
    let [vdpm, vipm, vdgm, vigm, vom] = WIDE_VARIABLES.map(|name| wide_variable(&batches, name));

    let data = GtapDataSet {
        domestic_flows: domestic?,
        import_flows: imports?,
        bilateral_exports: exports?,
        household_domestic: vdpm?,
        household_imports: vipm?,
        government_domestic: vdgm?,
        government_imports: vigm?,
        total_output: vom?,
    };

    let records =
        data.domestic_flows.len() + data.import_flows.len() + data.bilateral_exports.len();
    log_operation_complete("loaded", dir, records, Some(start.elapsed()));
    Ok(data)
}

fn long_variable(
    batches: &FxHashMap<&str, Vec<RecordBatch>>,
    name: &str,
    dimensions: &[&str],
    dir: &Path,
) -> anyhow::Result<LongTable> {
    let table = long_table_from_batches(variable_batches(batches, name)?, dimensions, dims::AMOUNT)
        .with_context(|| format!("Failed to convert {name}"))?;
    if table.is_empty() {
        log_warning(&format!("No records in {name}"), Some(dir));
    }
    Ok(table)
}

fn wide_variable(
    batches: &FxHashMap<&str, Vec<RecordBatch>>,
    name: &str,
) -> anyhow::Result<LabeledMatrix> {
    let batches = variable_batches(batches, name)?;
    let label_column = batches
        .first()
        .and_then(|b| b.schema().fields().first().map(|f| f.name().clone()))
        .with_context(|| format!("{name} has no columns"))?;
    wide_table_from_batches(batches, &label_column, dims::SECTOR, dims::REGION)
        .with_context(|| format!("Failed to convert {name}"))
}

fn variable_batches<'a>(
    batches: &'a FxHashMap<&str, Vec<RecordBatch>>,
    name: &str,
) -> anyhow::Result<&'a [RecordBatch]> {
    batches
        .get(name)
        .map(Vec::as_slice)
        .with_context(|| format!("{name} was not read"))
}

use tempfile::TempDir;

use crate::utils::{assert_close, init_logging, long_batch, wide_batch, write_parquet};
use gtap_mrio::utils::test::sample_dataset;
use gtap_mrio::{Mrio, MrioConfig, MrioSnapshot, load_dataset, read_parquet};

/// Write the sample dataset in the on-disk layout the loader expects
fn write_sample_dataset(dir: &std::path::Path) {
    let data = sample_dataset();
    write_parquet(
        &dir.join("vxmd.parquet"),
        &long_batch(&data.bilateral_exports, &["origin", "destination", "commodity"]),
    );
    write_parquet(
        &dir.join("vdfm.parquet"),
        &long_batch(&data.domestic_flows, &["region", "input", "output"]),
    );
    write_parquet(
        &dir.join("vifm.parquet"),
        &long_batch(&data.import_flows, &["region", "input", "output"]),
    );
    for (name, table) in [
        ("vdpm", &data.household_domestic),
        ("vipm", &data.household_imports),
        ("vdgm", &data.government_domestic),
        ("vigm", &data.government_imports),
        ("vom", &data.total_output),
    ] {
        write_parquet(&dir.join(format!("{name}.parquet")), &wide_batch(table));
    }
}

#[test]
fn test_loaded_dataset_matches_in_memory() -> anyhow::Result<()> {
    init_logging();
    let dir = TempDir::new()?;
    write_sample_dataset(dir.path());

    let loaded = Mrio::new(load_dataset(dir.path())?, MrioConfig::default())?;
    let expected = Mrio::new(sample_dataset(), MrioConfig::default())?;

    assert_eq!(loaded.labels(), expected.labels());
    assert_eq!(loaded.x()?, expected.x()?);
    assert_eq!(loaded.y_rr()?, expected.y_rr()?);
    for (a, b) in loaded.a()?.values().iter().zip(expected.a()?.values()) {
        assert_close(*a, *b);
    }
    Ok(())
}

#[test]
fn test_missing_variable_file() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    write_sample_dataset(dir.path());
    std::fs::remove_file(dir.path().join("vigm.parquet"))?;

    let err = load_dataset(dir.path()).unwrap_err();
    assert!(format!("{err:#}").contains("vigm.parquet"));
    Ok(())
}

#[test]
fn test_snapshot_round_trips() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let mrio = Mrio::new(sample_dataset(), MrioConfig::default())?;
    let snapshot = mrio.snapshot()?;

    let json_path = dir.path().join("mrio.json");
    snapshot.write_json(&json_path)?;
    let restored: MrioSnapshot = serde_json::from_reader(std::fs::File::open(&json_path)?)?;
    assert_eq!(restored.products, snapshot.products);
    assert_eq!(restored.generated_at, snapshot.generated_at);
    for (a, b) in restored.a.iter().zip(&snapshot.a) {
        assert_close(*a, *b);
    }

    let parquet_path = dir.path().join("mrio.parquet");
    snapshot.write_parquet(&parquet_path)?;
    let rows: usize = read_parquet(&parquet_path)?
        .iter()
        .map(gtap_mrio::RecordBatch::num_rows)
        .sum();
    assert_eq!(rows, snapshot.coefficient_records().len());
    Ok(())
}

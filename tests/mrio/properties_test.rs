use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use gtap_mrio::utils::test::sample_dataset;
use gtap_mrio::{LabeledMatrix, LongTable, Mrio, MrioConfig, long_to_wide, wide_to_long};

#[test]
fn test_totals_are_sums_of_blocks() -> gtap_mrio::Result<()> {
    for parallel in [false, true] {
        let mut config = MrioConfig::default();
        config.parallel = parallel;
        let mrio = Mrio::new(sample_dataset(), config)?;

        let z = mrio.z()?.values();
        let z_rr = mrio.z_rr()?.values();
        let z_rs = mrio.z_rs()?.values();
        assert_eq!(z, &(z_rr + z_rs));

        let y = mrio.y()?.values();
        assert_eq!(y, &(mrio.y_rr()?.values() + mrio.y_rs()?.values()));

        // y_rs is the destination breakdown summed over destinations
        let by_destination = mrio.y_rs_by_destination()?.row_sums();
        assert_eq!(mrio.y_rs()?.values(), &by_destination);
    }
    Ok(())
}

#[test]
fn test_zero_output_gives_zero_coefficients() -> gtap_mrio::Result<()> {
    let mut data = sample_dataset();
    // northamer produces no pdr
    data.total_output = LabeledMatrix::from_row_slice(
        "sector",
        "region",
        &["pdr", "wht"],
        &["eu", "northamer"],
        &[250.0, 0.0, 12000.0, 2500.0],
    )?;
    let mrio = Mrio::new(data, MrioConfig::default())?;

    let x = mrio.x()?.values().clone();
    let z = mrio.z()?.values().clone();
    let a = mrio.a()?.values().clone();
    for ((i, j), &coefficient) in a.indexed_iter() {
        if x[j] == 0.0 {
            assert_eq!(coefficient, 0.0, "A[{i}, {j}] with zero output");
        } else {
            assert_eq!(coefficient, z[[i, j]] / x[j]);
        }
    }
    Ok(())
}

#[test]
fn test_missing_combination_reindexes_to_zero() -> gtap_mrio::Result<()> {
    let mut data = sample_dataset();
    // government table without any northamer column
    data.government_domestic =
        LabeledMatrix::from_row_slice("sector", "region", &["wht"], &["eu"], &[50.0])?;
    let mrio = Mrio::new(data, MrioConfig::default())?;

    let y_rr = mrio.y_rr()?;
    assert_eq!(y_rr.values().len(), 4);
    assert_eq!(y_rr.get("northamer", "wht"), Some(612.0));
    assert_eq!(y_rr.get("northamer", "pdr"), Some(10.0));
    Ok(())
}

/// Random sparse (region, sector, partner) records
fn random_table(rng: &mut StdRng) -> LongTable {
    let regions = ["r0", "r1", "r2", "r3"];
    let sectors = ["s0", "s1", "s2", "s3", "s4"];
    let mut table = LongTable::new(["region", "sector", "partner"], "amount");
    for region in regions {
        for sector in sectors {
            for partner in regions {
                if rng.random_bool(0.4) {
                    let value = rng.random_range(0.5..1000.0);
                    table.push([region, sector, partner], value).unwrap();
                }
            }
        }
    }
    table
}

fn non_zero_records(table: &LongTable) -> HashMap<Vec<String>, f64> {
    table
        .iter()
        .filter(|(_, v)| *v != 0.0)
        .map(|(k, v)| (k.to_vec(), v))
        .collect()
}

#[test]
fn test_long_wide_round_trip() -> gtap_mrio::Result<()> {
    let mut rng = StdRng::seed_from_u64(2011);
    for _ in 0..20 {
        let table = random_table(&mut rng);
        let wide = long_to_wide(&table, &["region", "sector"], &["partner"])?;
        let long = wide_to_long(&wide, &["region", "sector", "partner"], "amount", None)?;

        // zero-filled cells come back as explicit zeros
        assert!(long.len() >= table.len());
        assert_eq!(non_zero_records(&long), non_zero_records(&table));
    }
    Ok(())
}

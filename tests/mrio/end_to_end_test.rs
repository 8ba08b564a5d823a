use crate::utils::{assert_close, init_logging};
use gtap_mrio::utils::test::sample_dataset;
use gtap_mrio::{Mrio, MrioConfig, MrioError};

fn sample_mrio() -> Mrio {
    Mrio::new(sample_dataset(), MrioConfig::default()).unwrap()
}

/// Two regions, two sectors; northamer records no pdr imports
#[test]
fn test_two_region_scenario() -> gtap_mrio::Result<()> {
    init_logging();
    let mrio = sample_mrio();

    let labels = mrio.labels();
    assert_eq!(labels.regions(), ["eu", "northamer"]);
    assert_eq!(labels.sectors(), ["pdr", "wht"]);

    let shares = mrio.import_shares()?;
    assert_eq!(shares.get(&["northamer", "pdr"], &["northamer"]), Some(0.0));
    assert_eq!(shares.get(&["eu", "pdr"], &["northamer"]), Some(0.0));
    assert_close(
        shares.get(&["northamer", "pdr"], &["eu"]).unwrap(),
        24.4 / 3.25,
    );

    // Nothing is allocated into northamer for pdr, whatever the using sector
    let z_rs = mrio.z_rs()?;
    for origin in ["eu", "northamer"] {
        for using in ["pdr", "wht"] {
            assert_eq!(z_rs.get(&[origin, "pdr"], &["northamer", using]), Some(0.0));
        }
    }
    assert_close(
        z_rs.get(&["northamer", "pdr"], &["eu", "pdr"]).unwrap(),
        24.4 / 3.25 * 2.0,
    );
    assert_close(
        z_rs.get(&["eu", "wht"], &["northamer", "wht"]).unwrap(),
        6.61 / 5.5 * 4.0,
    );

    let y_rs = mrio.y_rs_by_destination()?;
    assert_eq!(y_rs.get(&["northamer", "pdr"], &["northamer"]), Some(0.0));
    assert_close(
        y_rs.get(&["northamer", "wht"], &["eu"]).unwrap(),
        5.61 / 3040.1 * 2980.1,
    );

    assert!(mrio.z()?.is_finite());
    assert!(mrio.a()?.is_finite());
    assert!(mrio.y()?.is_finite());
    Ok(())
}

#[test]
fn test_snapshot_labels() -> gtap_mrio::Result<()> {
    let mut config = MrioConfig::default();
    config.parallel = false;
    let mrio = Mrio::new(sample_dataset(), config)?;

    let snapshot = mrio.snapshot()?;
    assert_eq!(
        snapshot.products,
        ["eu/ pdr", "eu/ wht", "northamer/ pdr", "northamer/ wht"]
    );
    assert!(snapshot.stressors.is_empty());
    assert!(snapshot.s.is_none());
    assert_eq!(&snapshot.a, mrio.a()?.values());
    assert_eq!(&snapshot.y, mrio.y()?.values());
    Ok(())
}

#[test]
fn test_diagnostics_do_not_change_results() -> gtap_mrio::Result<()> {
    let mrio = sample_mrio();
    let before = mrio.a()?.clone();

    let balances = mrio.trade_balance()?;
    assert_eq!(balances.len(), 2);
    assert_close(balances[0].exports, 172.0 + 0.778 + 481.0 + 24.4);
    assert_close(balances[0].imports, 3.25);

    let residuals = mrio.output_residual()?;
    assert_eq!(residuals.len(), 4);
    assert_eq!(residuals[3].region, "northamer");
    assert_eq!(residuals[3].sector, "wht");
    assert!(residuals.iter().all(|r| r.residual.is_finite()));

    assert_eq!(mrio.a()?, &before);
    Ok(())
}

#[test]
fn test_empty_exports_fail() {
    let mut data = sample_dataset();
    data.bilateral_exports = gtap_mrio::LongTable::new(
        ["origin", "destination", "commodity"],
        "amount",
    );
    let err = Mrio::new(data, MrioConfig::default()).unwrap_err();
    assert!(matches!(err, MrioError::MissingDimensionData(_)));
}

#[test]
fn test_unknown_region_is_dimension_mismatch() {
    let mut data = sample_dataset();
    data.household_imports = gtap_mrio::LabeledMatrix::from_row_slice(
        "sector",
        "region",
        &["pdr"],
        &["asia"],
        &[1.0],
    )
    .unwrap();
    let mrio = Mrio::new(data, MrioConfig::default()).unwrap();
    let err = mrio.imported_final_demand().unwrap_err();
    assert!(matches!(err, MrioError::DimensionMismatch { .. }));
    // the failure is not cached
    assert!(mrio.imported_final_demand().is_err());
}

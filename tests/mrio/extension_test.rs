use ndarray::Array2;

use crate::utils::assert_close;
use gtap_mrio::utils::test::sample_dataset;
use std::sync::Arc;

use gtap_mrio::{LabelOrder, Mrio, MrioConfig, MrioError, StressorMatrix};

fn emissions(mrio: &Mrio, values: [f64; 8]) -> StressorMatrix {
    StressorMatrix::new(
        vec!["co2".to_string(), "ch4".to_string()],
        mrio.labels(),
        Array2::from_shape_vec((2, 4), values.to_vec()).unwrap(),
    )
    .unwrap()
}

#[test]
fn test_f_then_s() -> gtap_mrio::Result<()> {
    let mut mrio = Mrio::new(sample_dataset(), MrioConfig::default())?;
    assert!(mrio.s()?.is_none());

    mrio.set_f(Some(emissions(&mrio, [50.0, 1200.0, 60.0, 0.0, 5.0, 0.0, 0.0, 25.0])))?;
    let s = mrio.s()?.unwrap();
    // x = [250, 12000, 600, 2500]
    assert_close(s.get("co2", "eu", "pdr").unwrap(), 0.2);
    assert_close(s.get("co2", "eu", "wht").unwrap(), 0.1);
    assert_close(s.get("ch4", "northamer", "wht").unwrap(), 0.01);
    assert!(mrio.extension().assigned_intensities().is_none());

    mrio.set_s(Some(emissions(&mrio, [1.0; 8])))?;
    assert!(mrio.extension().assigned_flows().is_none());
    let f = mrio.f()?.unwrap();
    assert_close(f.get("ch4", "northamer", "pdr").unwrap(), 600.0);

    let snapshot = mrio.snapshot()?;
    assert_eq!(snapshot.stressors, ["co2", "ch4"]);
    assert!(snapshot.s.is_some());
    Ok(())
}

#[test]
fn test_wrong_column_count() {
    let mrio = Mrio::new(sample_dataset(), MrioConfig::default()).unwrap();
    let err = StressorMatrix::new(vec!["co2".to_string()], mrio.labels(), Array2::zeros((1, 2)))
        .unwrap_err();
    assert!(matches!(err, MrioError::DimensionMismatch { .. }));
}

#[test]
fn test_flows_from_another_order_are_rejected() -> gtap_mrio::Result<()> {
    let mut mrio = Mrio::new(sample_dataset(), MrioConfig::default())?;
    let reversed = Arc::new(LabelOrder::new(
        vec!["northamer".to_string(), "eu".to_string()],
        vec!["pdr".to_string(), "wht".to_string()],
    )?);
    // 600 units for northamer/pdr, which is column 0 of the reversed order
    let mut values = Array2::zeros((1, 4));
    values[[0, 0]] = 600.0;
    let foreign = StressorMatrix::new(vec!["co2".to_string()], &reversed, values)?;

    let err = mrio.set_f(Some(foreign.clone())).unwrap_err();
    assert!(matches!(err, MrioError::DimensionMismatch { .. }));
    assert!(mrio.set_s(Some(foreign)).is_err());
    assert!(mrio.s()?.is_none());
    assert!(mrio.snapshot()?.s.is_none());

    // the same flows aligned to the MRIO's own order give 600 / 600
    let mut values = Array2::zeros((1, 4));
    values[[0, 2]] = 600.0;
    let aligned = StressorMatrix::new(vec!["co2".to_string()], mrio.labels(), values)?;
    mrio.set_f(Some(aligned))?;
    assert_close(mrio.s()?.unwrap().get("co2", "northamer", "pdr").unwrap(), 1.0);
    Ok(())
}

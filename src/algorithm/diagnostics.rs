//! Read-only balance checks
//!
//! GTAP data are not guaranteed to balance: world exports of a commodity
//! need not equal world imports, and output need not equal intermediate plus
//! final use. These checks report the gaps without correcting anything.

use log::{debug, warn};

use crate::algorithm::ratio::safe_divide;
use crate::error::{MrioError, Result};
use crate::labels::AxisLayout;
use crate::matrix::{DenseMatrix, FlowVector, same_order};

/// World exports versus world imports of one commodity
#[derive(Debug, Clone, PartialEq)]
pub struct TradeBalance {
    pub sector: String,
    pub exports: f64,
    pub imports: f64,
    /// `(exports - imports) / imports`, 0.0 when imports are zero
    pub relative_difference: f64,
}

/// Gap between total output and total use of one (region, sector)
#[derive(Debug, Clone, PartialEq)]
pub struct OutputResidual {
    pub region: String,
    pub sector: String,
    pub output: f64,
    /// `x - (row sum of Z + y)`
    pub residual: f64,
    /// `residual / x`, 0.0 when output is zero
    pub relative: f64,
}

/// Compare bilateral exports with recorded imports, commodity by commodity
pub fn trade_balance(
    exports: &DenseMatrix,
    total_imports: &FlowVector,
    tolerance: f64,
) -> Result<Vec<TradeBalance>> {
    if exports.row_axis() != AxisLayout::RegionSector || exports.col_axis() != AxisLayout::Region {
        return Err(MrioError::mismatch(
            "trade balance",
            "exports must be (region, sector) x region",
        ));
    }
    let order = exports.order();
    same_order(order, total_imports.order(), "trade balance")?;
    let n_sectors = order.n_sectors();
    let shipped = exports.row_sums();
    let received = total_imports.values();

    let mut sector_exports = vec![0.0; n_sectors];
    let mut sector_imports = vec![0.0; n_sectors];
    for p in 0..order.len() {
        sector_exports[p % n_sectors] += shipped[p];
        sector_imports[p % n_sectors] += received[p];
    }

    let balances: Vec<TradeBalance> = order
        .sectors()
        .iter()
        .zip(sector_exports.into_iter().zip(sector_imports))
        .map(|(sector, (exports, imports))| TradeBalance {
            sector: sector.clone(),
            exports,
            imports,
            relative_difference: safe_divide(exports - imports, imports),
        })
        .collect();

    let unbalanced = balances
        .iter()
        .filter(|b| b.relative_difference.abs() > tolerance)
        .inspect(|b| {
            debug!(
                "Trade imbalance for {}: exports {} vs imports {}",
                b.sector, b.exports, b.imports
            );
        })
        .count();
    if unbalanced > 0 {
        warn!(
            "{unbalanced} of {} commodities have exports and imports differing by more than {:.1}%",
            balances.len(),
            tolerance * 100.0
        );
    }
    Ok(balances)
}

/// Compare total output with intermediate plus final use
pub fn output_residual(
    x: &FlowVector,
    z: &DenseMatrix,
    y: &FlowVector,
    tolerance: f64,
) -> Result<Vec<OutputResidual>> {
    let order = x.order();
    if z.row_axis() != AxisLayout::RegionSector {
        return Err(MrioError::mismatch("output residual", "Z rows must be (region, sector)"));
    }
    same_order(order, z.order(), "output residual")?;
    same_order(order, y.order(), "output residual")?;
    let use_total = z.row_sums();

    let residuals: Vec<OutputResidual> = order
        .keys()
        .enumerate()
        .map(|(p, (region, sector))| {
            let output = x.values()[p];
            let residual = output - (use_total[p] + y.values()[p]);
            OutputResidual {
                region: region.to_string(),
                sector: sector.to_string(),
                output,
                residual,
                relative: safe_divide(residual, output),
            }
        })
        .collect();

    let worst = residuals
        .iter()
        .filter(|r| r.relative.abs() > tolerance)
        .max_by(|a, b| a.relative.abs().total_cmp(&b.relative.abs()));
    if let Some(worst) = worst {
        let count = residuals
            .iter()
            .filter(|r| r.relative.abs() > tolerance)
            .count();
        warn!(
            "{count} (region, sector) pairs do not balance within {:.1}%; worst is {}/{} at {:.1}%",
            tolerance * 100.0,
            worst.region,
            worst.sector,
            worst.relative * 100.0
        );
    }
    Ok(residuals)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::labels::LabelOrder;
    use crate::utils::test::fixtures::sample_order;
    use ndarray::{Array2, array};

    #[test]
    fn test_trade_balance_per_commodity() {
        let order = sample_order();
        let exports = DenseMatrix::from_array(
            &order,
            AxisLayout::RegionSector,
            AxisLayout::Region,
            array![[1.0, 1.0], [2.0, 2.0], [2.0, 0.0], [0.0, 0.0]],
        )
        .unwrap();
        let imports = FlowVector::from_array(&order, array![2.0, 0.0, 2.0, 0.0]).unwrap();

        let balances = trade_balance(&exports, &imports, 0.05).unwrap();
        assert_eq!(balances.len(), 2);
        assert_eq!(balances[0].sector, "pdr");
        assert_eq!(balances[0].exports, 4.0);
        assert_eq!(balances[0].imports, 4.0);
        assert_eq!(balances[0].relative_difference, 0.0);
        // no recorded wht imports at all
        assert_eq!(balances[1].relative_difference, 0.0);
    }

    #[test]
    fn test_output_residual() {
        let order = sample_order();
        let z = DenseMatrix::from_array(
            &order,
            AxisLayout::RegionSector,
            AxisLayout::RegionSector,
            Array2::from_elem((4, 4), 1.0),
        )
        .unwrap();
        let y = FlowVector::from_array(&order, array![6.0, 0.0, 0.0, 1.0]).unwrap();
        let x = FlowVector::from_array(&order, array![10.0, 4.0, 0.0, 10.0]).unwrap();

        let residuals = output_residual(&x, &z, &y, 0.05).unwrap();
        assert_eq!(residuals[0].residual, 0.0);
        assert_eq!(residuals[2].residual, -4.0);
        assert_eq!(residuals[2].relative, 0.0);
        assert_eq!(residuals[3].region, "northamer");
        assert_eq!(residuals[3].relative, 0.5);
    }

    #[test]
    fn test_output_residual_needs_one_order() {
        let order = sample_order();
        let reversed = Arc::new(
            LabelOrder::new(
                vec!["northamer".to_string(), "eu".to_string()],
                vec!["pdr".to_string(), "wht".to_string()],
            )
            .unwrap(),
        );
        let z = DenseMatrix::zeros(&order, AxisLayout::RegionSector, AxisLayout::RegionSector);
        let x = FlowVector::zeros(&order);
        let err = output_residual(&x, &z, &FlowVector::zeros(&reversed), 0.05).unwrap_err();
        assert!(matches!(err, MrioError::DimensionMismatch { .. }));
    }
}

//! Technical coefficients and extension intensities
//!
//! Both divide a flow by the total output of the purchasing or emitting
//! (region, sector), column by column. Columns with zero output are zero.

use crate::algorithm::ratio::{divide_columns, multiply_columns};
use crate::error::{MrioError, Result};
use crate::extension::StressorMatrix;
use crate::labels::AxisLayout;
use crate::matrix::{DenseMatrix, FlowVector, same_order};

/// A = Z / x, column `(S,j)` divided by x[(S,j)]
pub fn technical_coefficients(z: &DenseMatrix, x: &FlowVector) -> Result<DenseMatrix> {
    if z.row_axis() != AxisLayout::RegionSector || z.col_axis() != AxisLayout::RegionSector {
        return Err(MrioError::mismatch(
            "technical coefficients",
            "Z must be (region, sector) on both axes",
        ));
    }
    same_order(z.order(), x.order(), "technical coefficients")?;
    DenseMatrix::from_array(
        z.order(),
        AxisLayout::RegionSector,
        AxisLayout::RegionSector,
        divide_columns(z.values(), x.values()),
    )
}

/// S = F / x
pub fn intensities_from_flows(f: &StressorMatrix, x: &FlowVector) -> Result<StressorMatrix> {
    same_order(f.order(), x.order(), "extension intensities")?;
    Ok(f.with_values(divide_columns(f.values(), x.values())))
}

/// F = S * x
pub fn flows_from_intensities(s: &StressorMatrix, x: &FlowVector) -> Result<StressorMatrix> {
    same_order(s.order(), x.order(), "extension flows")?;
    Ok(s.with_values(multiply_columns(s.values(), x.values())))
}

//! Matrices and vectors aligned to a [`LabelOrder`]
//!
//! Every quantity the builder derives is stored densely in canonical order,
//! so elementwise arithmetic between two aligned values is always valid once
//! their layouts agree.

use std::sync::Arc;

use ndarray::{Array1, Array2, Axis};

use crate::error::{MrioError, Result};
use crate::labels::{AxisLayout, LabelOrder};
use crate::reshape::LongTable;

/// Dense matrix whose axes are indexed by a shared label order
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix {
    order: Arc<LabelOrder>,
    row_axis: AxisLayout,
    col_axis: AxisLayout,
    values: Array2<f64>,
}

impl DenseMatrix {
    /// All-zero matrix with the given layout
    #[must_use]
    pub fn zeros(order: &Arc<LabelOrder>, row_axis: AxisLayout, col_axis: AxisLayout) -> Self {
        let shape = (row_axis.len(order), col_axis.len(order));
        Self {
            order: Arc::clone(order),
            row_axis,
            col_axis,
            values: Array2::zeros(shape),
        }
    }

    /// Wrap an array that is already in canonical order
    pub fn from_array(
        order: &Arc<LabelOrder>,
        row_axis: AxisLayout,
        col_axis: AxisLayout,
        values: Array2<f64>,
    ) -> Result<Self> {
        let expected = (row_axis.len(order), col_axis.len(order));
        if values.dim() != expected {
            return Err(MrioError::mismatch(
                "dense matrix",
                format!("shape {:?} does not match layout {expected:?}", values.dim()),
            ));
        }
        Ok(Self {
            order: Arc::clone(order),
            row_axis,
            col_axis,
            values,
        })
    }

    pub fn order(&self) -> &Arc<LabelOrder> {
        &self.order
    }

    #[must_use]
    pub fn row_axis(&self) -> AxisLayout {
        self.row_axis
    }

    #[must_use]
    pub fn col_axis(&self) -> AxisLayout {
        self.col_axis
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut Array2<f64> {
        &mut self.values
    }

    /// Cell addressed by labels, e.g. `get(&["eu", "pdr"], &["northamer"])`
    pub fn get<S: AsRef<str>, T: AsRef<str>>(&self, row: &[S], col: &[T]) -> Option<f64> {
        let r = self.row_axis.locate(&self.order, row).ok()?;
        let c = self.col_axis.locate(&self.order, col).ok()?;
        Some(self.values[[r, c]])
    }

    /// Elementwise sum of two matrices with the same layout
    pub fn add(&self, other: &Self) -> Result<Self> {
        self.check_compatible(other, "matrix addition")?;
        Ok(Self {
            order: Arc::clone(&self.order),
            row_axis: self.row_axis,
            col_axis: self.col_axis,
            values: &self.values + &other.values,
        })
    }

    #[must_use]
    pub fn row_sums(&self) -> Array1<f64> {
        self.values.sum_axis(Axis(1))
    }

    #[must_use]
    pub fn col_sums(&self) -> Array1<f64> {
        self.values.sum_axis(Axis(0))
    }

    /// True when no cell is NaN or infinite
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.values.iter().all(|v| v.is_finite())
    }

    /// Row labels, compound keys joined by `separator`
    #[must_use]
    pub fn row_labels(&self, separator: &str) -> Vec<String> {
        self.row_axis.labels(&self.order, separator)
    }

    fn check_compatible(&self, other: &Self, context: &str) -> Result<()> {
        if self.row_axis != other.row_axis || self.col_axis != other.col_axis {
            return Err(MrioError::mismatch(
                context,
                format!(
                    "layout {:?}x{:?} vs {:?}x{:?}",
                    self.row_axis, self.col_axis, other.row_axis, other.col_axis
                ),
            ));
        }
        same_order(&self.order, &other.order, context)
    }
}

/// Vector indexed by (region, sector) in canonical order
#[derive(Debug, Clone, PartialEq)]
pub struct FlowVector {
    order: Arc<LabelOrder>,
    values: Array1<f64>,
}

impl FlowVector {
    #[must_use]
    pub fn zeros(order: &Arc<LabelOrder>) -> Self {
        Self {
            order: Arc::clone(order),
            values: Array1::zeros(order.len()),
        }
    }

    /// Wrap an array that is already in canonical order
    pub fn from_array(order: &Arc<LabelOrder>, values: Array1<f64>) -> Result<Self> {
        if values.len() != order.len() {
            return Err(MrioError::mismatch(
                "flow vector",
                format!(
                    "length {} does not match {} (region, sector) pairs",
                    values.len(),
                    order.len()
                ),
            ));
        }
        Ok(Self {
            order: Arc::clone(order),
            values,
        })
    }

    /// Group long records by (region, sector) and sum them
    ///
    /// # Errors
    /// `DimensionMismatch` if a record names a region or sector outside the order
    pub fn from_long(
        long: &LongTable,
        order: &Arc<LabelOrder>,
        region_dim: &str,
        sector_dim: &str,
    ) -> Result<Self> {
        let r = long.dim_index(region_dim)?;
        let s = long.dim_index(sector_dim)?;
        let mut values = Array1::zeros(order.len());
        for (key, value) in long.iter() {
            let position = AxisLayout::RegionSector
                .locate(order, &[key[r].as_str(), key[s].as_str()])
                .map_err(|detail| {
                    MrioError::mismatch(format!("{region_dim}/{sector_dim} vector"), detail)
                })?;
            values[position] += value;
        }
        Ok(Self {
            order: Arc::clone(order),
            values,
        })
    }

    pub fn order(&self) -> &Arc<LabelOrder> {
        &self.order
    }

    pub fn values(&self) -> &Array1<f64> {
        &self.values
    }

    pub fn get(&self, region: &str, sector: &str) -> Option<f64> {
        self.order.position(region, sector).map(|p| self.values[p])
    }

    /// Elementwise sum of two vectors over the same order
    pub fn add(&self, other: &Self) -> Result<Self> {
        same_order(&self.order, &other.order, "vector addition")?;
        Ok(Self {
            order: Arc::clone(&self.order),
            values: &self.values + &other.values,
        })
    }

    #[must_use]
    pub fn sum(&self) -> f64 {
        self.values.sum()
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.values.iter().all(|v| v.is_finite())
    }
}

/// Fail unless both operands are aligned to the same label order
pub(crate) fn same_order(a: &Arc<LabelOrder>, b: &Arc<LabelOrder>, context: &str) -> Result<()> {
    if Arc::ptr_eq(a, b) || a == b {
        Ok(())
    } else {
        Err(MrioError::mismatch(
            context,
            "operands are aligned to different label orders",
        ))
    }
}

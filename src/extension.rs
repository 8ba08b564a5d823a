//! Environmental satellite accounts
//!
//! An account is held either as absolute flows F (units per flow) or as
//! intensities S (units per unit of output). Only one of them is ever stored
//! as the source of truth; the other is computed on demand from total output
//! and never cached back.

use std::sync::Arc;

use ndarray::Array2;

use crate::algorithm::coefficients::{flows_from_intensities, intensities_from_flows};
use crate::error::{MrioError, Result};
use crate::labels::LabelOrder;
use crate::matrix::FlowVector;

/// Stressor x (region, sector) matrix
#[derive(Debug, Clone, PartialEq)]
pub struct StressorMatrix {
    stressors: Vec<String>,
    order: Arc<LabelOrder>,
    values: Array2<f64>,
}

impl StressorMatrix {
    /// Create a stressor matrix whose columns follow `order`
    ///
    /// # Errors
    /// `DimensionMismatch` if the shape does not match the stressor count and
    /// the number of (region, sector) pairs
    pub fn new(
        stressors: Vec<String>,
        order: &Arc<LabelOrder>,
        values: Array2<f64>,
    ) -> Result<Self> {
        if values.dim() != (stressors.len(), order.len()) {
            return Err(MrioError::mismatch(
                "stressor matrix",
                format!(
                    "shape {:?} for {} stressors and {} (region, sector) pairs",
                    values.dim(),
                    stressors.len(),
                    order.len()
                ),
            ));
        }
        Ok(Self {
            stressors,
            order: Arc::clone(order),
            values,
        })
    }

    pub fn stressors(&self) -> &[String] {
        &self.stressors
    }

    pub fn order(&self) -> &Arc<LabelOrder> {
        &self.order
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Value for a stressor at a (region, sector) pair
    pub fn get(&self, stressor: &str, region: &str, sector: &str) -> Option<f64> {
        let row = self.stressors.iter().position(|s| s == stressor)?;
        let col = self.order.position(region, sector)?;
        Some(self.values[[row, col]])
    }

    /// Same stressors and order, new values
    pub(crate) fn with_values(&self, values: Array2<f64>) -> Self {
        Self {
            stressors: self.stressors.clone(),
            order: Arc::clone(&self.order),
            values,
        }
    }
}

/// F/S pair with mutual exclusivity
///
/// Assigning one view clears the other, so a stale value can never be read.
#[derive(Debug, Clone, Default)]
pub struct Extension {
    flows: Option<StressorMatrix>,
    intensities: Option<StressorMatrix>,
}

impl Extension {
    /// Assign F; a `Some` value clears any assigned S
    pub fn set_flows(&mut self, flows: Option<StressorMatrix>) {
        if flows.is_some() {
            self.intensities = None;
        }
        self.flows = flows;
    }

    /// Assign S; a `Some` value clears any assigned F
    pub fn set_intensities(&mut self, intensities: Option<StressorMatrix>) {
        if intensities.is_some() {
            self.flows = None;
        }
        self.intensities = intensities;
    }

    /// F exactly as assigned, if it is the current source of truth
    pub fn assigned_flows(&self) -> Option<&StressorMatrix> {
        self.flows.as_ref()
    }

    /// S exactly as assigned, if it is the current source of truth
    pub fn assigned_intensities(&self) -> Option<&StressorMatrix> {
        self.intensities.as_ref()
    }

    /// F, derived from S and total output when only S is assigned
    pub fn flows(&self, x: &FlowVector) -> Result<Option<StressorMatrix>> {
        match (&self.flows, &self.intensities) {
            (Some(f), _) => Ok(Some(f.clone())),
            (None, Some(s)) => flows_from_intensities(s, x).map(Some),
            (None, None) => Ok(None),
        }
    }

    /// S, derived from F and total output when only F is assigned
    pub fn intensities(&self, x: &FlowVector) -> Result<Option<StressorMatrix>> {
        match (&self.intensities, &self.flows) {
            (Some(s), _) => Ok(Some(s.clone())),
            (None, Some(f)) => intensities_from_flows(f, x).map(Some),
            (None, None) => Ok(None),
        }
    }
}

//! Flow aggregation
//!
//! Final-demand-like tables arrive as sector x region wide tables. They are
//! unstacked into (region, sector) records, aligned to the label order and
//! summed into a single vector.

use std::sync::Arc;

use log::debug;

use crate::dataset::dims;
use crate::error::Result;
use crate::labels::LabelOrder;
use crate::matrix::FlowVector;
use crate::reshape::{LabeledMatrix, wide_to_long};

/// Elementwise sum of vectors aligned to the same order
///
/// An empty list gives the zero vector.
pub fn aggregate_final_demand(
    order: &Arc<LabelOrder>,
    vectors: &[FlowVector],
) -> Result<FlowVector> {
    vectors
        .iter()
        .try_fold(FlowVector::zeros(order), |acc, v| acc.add(v))
}

/// Unstack a sector x region table into a (region, sector) vector
pub fn vector_from_table(order: &Arc<LabelOrder>, table: &LabeledMatrix) -> Result<FlowVector> {
    let table = table
        .clone()
        .with_axis_names(vec![dims::SECTOR.to_string()], vec![dims::REGION.to_string()])?;
    let long = wide_to_long(&table, &[dims::REGION, dims::SECTOR], dims::AMOUNT, None)?;
    FlowVector::from_long(&long, order, dims::REGION, dims::SECTOR)
}

/// Unstack and sum several sector x region tables
pub fn aggregate_tables(order: &Arc<LabelOrder>, tables: &[&LabeledMatrix]) -> Result<FlowVector> {
    let vectors = tables
        .iter()
        .map(|t| vector_from_table(order, t))
        .collect::<Result<Vec<_>>>()?;
    let total = aggregate_final_demand(order, &vectors)?;
    debug!("Aggregated {} final demand tables, total {}", tables.len(), total.sum());
    Ok(total)
}

//! Derivation algorithms
//!
//! Each step of the MRIO construction is a pure function of already aligned
//! inputs: aggregation of final demand, allocation of imports to source
//! regions, coefficient calculation and the balance diagnostics.

pub mod aggregate;
pub mod allocation;
pub mod coefficients;
pub mod diagnostics;
pub mod ratio;

pub use aggregate::{aggregate_final_demand, aggregate_tables, vector_from_table};
pub use allocation::{allocate_final_demand, allocate_intermediate, import_shares};
pub use coefficients::{flows_from_intensities, intensities_from_flows, technical_coefficients};
pub use diagnostics::{OutputResidual, TradeBalance, output_residual, trade_balance};
pub use ratio::{divide_columns, multiply_columns, reciprocal, safe_divide};

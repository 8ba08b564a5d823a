//! Raw GTAP variables
//!
//! A [`GtapDataSet`] holds the cleaned tables handed over by the input
//! adapters. It is immutable once built and owned by the [`Mrio`](crate::Mrio)
//! derived from it.
//!
//! | GTAP name | field                | shape                                 |
//! |-----------|----------------------|---------------------------------------|
//! | vdfm      | `domestic_flows`     | long (region, input, output)          |
//! | vifm      | `import_flows`       | long (region, input, output)          |
//! | vxmd      | `bilateral_exports`  | long (origin, destination, commodity) |
//! | vdpm      | `household_domestic` | sector x region                       |
//! | vipm      | `household_imports`  | sector x region                       |
//! | vdgm      | `government_domestic`| sector x region                       |
//! | vigm      | `government_imports` | sector x region                       |
//! | vom       | `total_output`       | sector x region                       |

use log::debug;

use crate::error::Result;
use crate::reshape::{LabeledMatrix, LongTable, long_to_wide};

/// Dimension names used by the long-format tables
pub mod dims {
    pub const REGION: &str = "region";
    /// Commodity consumed by a using sector
    pub const INPUT: &str = "input";
    /// Using sector, or the capital-formation label
    pub const OUTPUT: &str = "output";
    pub const ORIGIN: &str = "origin";
    pub const DESTINATION: &str = "destination";
    pub const COMMODITY: &str = "commodity";
    pub const SECTOR: &str = "sector";
    pub const AMOUNT: &str = "amount";
}

/// The cleaned GTAP variables one MRIO is built from
#[derive(Debug, Clone)]
pub struct GtapDataSet {
    /// Intra-region intermediate flows, including capital formation (vdfm)
    pub domestic_flows: LongTable,
    /// Imported intermediate flows, including capital formation (vifm)
    pub import_flows: LongTable,
    /// Bilateral exports by origin, destination and commodity (vxmd)
    pub bilateral_exports: LongTable,
    /// Household purchases of domestic goods (vdpm)
    pub household_domestic: LabeledMatrix,
    /// Household purchases of imported goods (vipm)
    pub household_imports: LabeledMatrix,
    /// Government purchases of domestic goods (vdgm)
    pub government_domestic: LabeledMatrix,
    /// Government purchases of imported goods (vigm)
    pub government_imports: LabeledMatrix,
    /// Total output by sector and region (vom)
    pub total_output: LabeledMatrix,
}

/// Split capital formation out of a (region, input, output) flow table
///
/// Records whose `output` is `capital_label` become a commodity x region
/// table conformed to `like` (a final-demand table of the same origin);
/// all other records are returned unchanged. A table without capital records
/// gives an all-zero capital table.
pub fn separate_capital(
    flows: &LongTable,
    capital_label: &str,
    like: &LabeledMatrix,
) -> Result<(LongTable, LabeledMatrix)> {
    let (capital, remaining) = flows.partition(dims::OUTPUT, capital_label)?;
    debug!(
        "Separated {} '{capital_label}' records from {} flow records",
        capital.len(),
        flows.len()
    );

    let capital = long_to_wide(&capital, &[dims::INPUT], &[dims::REGION])?.reindex_like(like);
    Ok((remaining, capital))
}

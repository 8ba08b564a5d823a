//! The MRIO builder
//!
//! [`Mrio`] owns a [`GtapDataSet`] and derives every quantity of the
//! multi-regional table from it on first access:
//!
//! ```text
//! Z = Z_rr + Z_rs        y = y_rr + y_rs        A = Z / x
//! ```
//!
//! Derived matrices are memoised for the lifetime of the builder. The only
//! mutable state afterwards is the environmental extension (F or S).

use std::cell::OnceCell;
use std::sync::Arc;

use log::{debug, info};

use crate::algorithm::aggregate::aggregate_tables;
use crate::algorithm::allocation::{allocate_final_demand, allocate_intermediate, import_shares};
use crate::algorithm::coefficients::technical_coefficients;
use crate::algorithm::diagnostics::{OutputResidual, TradeBalance, output_residual, trade_balance};
use crate::algorithm::vector_from_table;
use crate::config::MrioConfig;
use crate::dataset::{GtapDataSet, dims, separate_capital};
use crate::error::Result;
use crate::export::MrioSnapshot;
use crate::extension::{Extension, StressorMatrix};
use crate::labels::{AxisLayout, LabelOrder};
use crate::matrix::{DenseMatrix, FlowVector, same_order};
use crate::reshape::{LabeledMatrix, LongTable, long_to_wide};

/// Multi-regional input-output table derived from GTAP variables
#[derive(Debug)]
pub struct Mrio {
    config: MrioConfig,
    data: GtapDataSet,
    order: Arc<LabelOrder>,

    // Flow tables with capital formation split out
    domestic_flows: LongTable,
    import_flows: LongTable,
    domestic_capital: LabeledMatrix,
    import_capital: LabeledMatrix,

    extension: Extension,

    bilateral_exports: OnceCell<DenseMatrix>,
    sectoral_imports: OnceCell<DenseMatrix>,
    imported_final_demand: OnceCell<FlowVector>,
    total_imports: OnceCell<FlowVector>,
    import_shares: OnceCell<DenseMatrix>,
    z_rr: OnceCell<DenseMatrix>,
    z_rs: OnceCell<DenseMatrix>,
    y_rr: OnceCell<FlowVector>,
    y_rs_by_destination: OnceCell<DenseMatrix>,
    y_rs: OnceCell<FlowVector>,
    z: OnceCell<DenseMatrix>,
    y: OnceCell<FlowVector>,
    x: OnceCell<FlowVector>,
    a: OnceCell<DenseMatrix>,
}

impl Mrio {
    /// Build the label order and separate capital formation
    ///
    /// # Errors
    /// `MissingDimensionData` if the bilateral export table is empty;
    /// `UnknownDimension` if a flow table lacks the expected dimensions
    pub fn new(data: GtapDataSet, config: MrioConfig) -> Result<Self> {
        info!("Building MRIO from GTAP data");
        debug!("{config}");

        let order = Arc::new(LabelOrder::from_bilateral_exports(&data.bilateral_exports)?);
        let (domestic_flows, domestic_capital) = separate_capital(
            &data.domestic_flows,
            &config.capital_label,
            &data.household_domestic,
        )?;
        let (import_flows, import_capital) =
            separate_capital(&data.import_flows, &config.capital_label, &data.household_imports)?;
        info!(
            "Separated capital formation: {} domestic, {} imported",
            domestic_capital.values().sum(),
            import_capital.values().sum()
        );

        Ok(Self {
            config,
            data,
            order,
            domestic_flows,
            import_flows,
            domestic_capital,
            import_capital,
            extension: Extension::default(),
            bilateral_exports: OnceCell::new(),
            sectoral_imports: OnceCell::new(),
            imported_final_demand: OnceCell::new(),
            total_imports: OnceCell::new(),
            import_shares: OnceCell::new(),
            z_rr: OnceCell::new(),
            z_rs: OnceCell::new(),
            y_rr: OnceCell::new(),
            y_rs_by_destination: OnceCell::new(),
            y_rs: OnceCell::new(),
            z: OnceCell::new(),
            y: OnceCell::new(),
            x: OnceCell::new(),
            a: OnceCell::new(),
        })
    }

    pub fn labels(&self) -> &Arc<LabelOrder> {
        &self.order
    }

    pub fn config(&self) -> &MrioConfig {
        &self.config
    }

    pub fn dataset(&self) -> &GtapDataSet {
        &self.data
    }

    /// Domestic capital formation (vdkm), commodity x region
    pub fn domestic_capital(&self) -> &LabeledMatrix {
        &self.domestic_capital
    }

    /// Imported capital formation (vikm), commodity x region
    pub fn import_capital(&self) -> &LabeledMatrix {
        &self.import_capital
    }

    /// Bilateral exports e, rows (origin, commodity), columns destination
    pub fn bilateral_exports(&self) -> Result<&DenseMatrix> {
        cached(&self.bilateral_exports, || {
            long_to_wide(
                &self.data.bilateral_exports,
                &[dims::ORIGIN, dims::COMMODITY],
                &[dims::DESTINATION],
            )?
            .reindex(
                &self.order,
                AxisLayout::RegionSector,
                AxisLayout::Region,
                "bilateral exports",
            )
        })
    }

    /// Imported intermediate use, rows commodity, columns (region, using sector)
    pub fn sectoral_imports(&self) -> Result<&DenseMatrix> {
        cached(&self.sectoral_imports, || {
            long_to_wide(&self.import_flows, &[dims::INPUT], &[dims::REGION, dims::OUTPUT])?
                .reindex(
                    &self.order,
                    AxisLayout::Sector,
                    AxisLayout::RegionSector,
                    "sectoral imports",
                )
        })
    }

    /// Imports by final users y_m: households, government and capital
    pub fn imported_final_demand(&self) -> Result<&FlowVector> {
        cached(&self.imported_final_demand, || {
            aggregate_tables(
                &self.order,
                &[
                    &self.data.household_imports,
                    &self.data.government_imports,
                    &self.import_capital,
                ],
            )
        })
    }

    /// Total imports of each commodity by each region, keyed (region, commodity)
    pub fn total_imports(&self) -> Result<&FlowVector> {
        cached(&self.total_imports, || {
            let by_industries =
                FlowVector::from_long(&self.import_flows, &self.order, dims::REGION, dims::INPUT)?;
            by_industries.add(self.imported_final_demand()?)
        })
    }

    /// Share of each origin in a destination's imports, rows (origin, commodity)
    pub fn import_shares(&self) -> Result<&DenseMatrix> {
        cached(&self.import_shares, || {
            import_shares(self.bilateral_exports()?, self.total_imports()?)
        })
    }

    /// Intra-region intermediate flows
    pub fn z_rr(&self) -> Result<&DenseMatrix> {
        cached(&self.z_rr, || {
            let z_rr = long_to_wide(
                &self.domestic_flows,
                &[dims::REGION, dims::INPUT],
                &[dims::REGION, dims::OUTPUT],
            )?
            .reindex(
                &self.order,
                AxisLayout::RegionSector,
                AxisLayout::RegionSector,
                "domestic flows",
            )?;
            info!("Computed Z_rr, total {}", z_rr.values().sum());
            Ok(z_rr)
        })
    }

    /// Inter-regional intermediate flows
    pub fn z_rs(&self) -> Result<&DenseMatrix> {
        cached(&self.z_rs, || {
            let z_rs = allocate_intermediate(
                self.import_shares()?,
                self.sectoral_imports()?,
                self.config.parallel,
            )?;
            info!("Computed Z_rs, total {}", z_rs.values().sum());
            Ok(z_rs)
        })
    }

    /// Final demand for domestic goods: households, government and capital
    pub fn y_rr(&self) -> Result<&FlowVector> {
        cached(&self.y_rr, || {
            aggregate_tables(
                &self.order,
                &[
                    &self.data.household_domestic,
                    &self.data.government_domestic,
                    &self.domestic_capital,
                ],
            )
        })
    }

    /// Imported final demand allocated to origins, columns destination region
    pub fn y_rs_by_destination(&self) -> Result<&DenseMatrix> {
        cached(&self.y_rs_by_destination, || {
            allocate_final_demand(
                self.import_shares()?,
                self.imported_final_demand()?,
                self.config.parallel,
            )
        })
    }

    /// Final demand met by imports, keyed by origin (region, sector)
    pub fn y_rs(&self) -> Result<&FlowVector> {
        cached(&self.y_rs, || {
            let y_rs = FlowVector::from_array(&self.order, self.y_rs_by_destination()?.row_sums())?;
            info!("Computed y_rs, total {}", y_rs.sum());
            Ok(y_rs)
        })
    }

    pub fn z(&self) -> Result<&DenseMatrix> {
        cached(&self.z, || self.z_rr()?.add(self.z_rs()?))
    }

    pub fn y(&self) -> Result<&FlowVector> {
        cached(&self.y, || self.y_rr()?.add(self.y_rs()?))
    }

    /// Total output; rows of vom outside the sector list are ignored
    pub fn x(&self) -> Result<&FlowVector> {
        cached(&self.x, || {
            let vom = self.data.total_output.select_rows(self.order.sectors())?;
            let x = vector_from_table(&self.order, &vom)?;
            info!("Computed x, total {}", x.sum());
            Ok(x)
        })
    }

    /// Technical coefficients
    pub fn a(&self) -> Result<&DenseMatrix> {
        cached(&self.a, || technical_coefficients(self.z()?, self.x()?))
    }

    pub fn extension(&self) -> &Extension {
        &self.extension
    }

    /// Assign absolute stressor flows, clearing any assigned intensities
    ///
    /// # Errors
    /// `DimensionMismatch` if `f` is aligned to a different label order
    pub fn set_f(&mut self, f: Option<StressorMatrix>) -> Result<()> {
        if let Some(f) = &f {
            same_order(&self.order, f.order(), "stressor flows")?;
        }
        self.extension.set_flows(f);
        Ok(())
    }

    /// Assign stressor intensities, clearing any assigned flows
    ///
    /// # Errors
    /// `DimensionMismatch` if `s` is aligned to a different label order
    pub fn set_s(&mut self, s: Option<StressorMatrix>) -> Result<()> {
        if let Some(s) = &s {
            same_order(&self.order, s.order(), "stressor intensities")?;
        }
        self.extension.set_intensities(s);
        Ok(())
    }

    /// Stressor flows F, derived from S when only S was assigned
    pub fn f(&self) -> Result<Option<StressorMatrix>> {
        match self.extension.assigned_flows() {
            Some(f) => Ok(Some(f.clone())),
            None => self.extension.flows(self.x()?),
        }
    }

    /// Stressor intensities S, derived from F when only F was assigned
    pub fn s(&self) -> Result<Option<StressorMatrix>> {
        match self.extension.assigned_intensities() {
            Some(s) => Ok(Some(s.clone())),
            None => self.extension.intensities(self.x()?),
        }
    }

    /// Exports versus recorded imports, per commodity
    pub fn trade_balance(&self) -> Result<Vec<TradeBalance>> {
        trade_balance(
            self.bilateral_exports()?,
            self.total_imports()?,
            self.config.balance_tolerance,
        )
    }

    /// Output minus intermediate and final use, per (region, sector)
    pub fn output_residual(&self) -> Result<Vec<OutputResidual>> {
        output_residual(
            self.x()?,
            self.z()?,
            self.y()?,
            self.config.balance_tolerance,
        )
    }

    /// A, S and y with their labels, ready for serialization
    pub fn snapshot(&self) -> Result<MrioSnapshot> {
        let a = self.a()?;
        let s = self.s()?;
        let y = self.y()?;
        Ok(MrioSnapshot::new(
            a.row_labels(&self.config.label_separator),
            s.as_ref().map(|s| s.stressors().to_vec()).unwrap_or_default(),
            a.values().clone(),
            s.map(|s| s.values().clone()),
            y.values().clone(),
        ))
    }
}

/// Memoise a fallible derivation
///
/// A failed derivation leaves the cell empty so the error is raised again on
/// the next access.
fn cached<T>(cell: &OnceCell<T>, derive: impl FnOnce() -> Result<T>) -> Result<&T> {
    if let Some(value) = cell.get() {
        return Ok(value);
    }
    let value = derive()?;
    Ok(cell.get_or_init(|| value))
}

//! Proportional allocation of imports across source regions
//!
//! Implements the construction of Peters, Andrew & Lennox (2011),
//! "Constructing an environmentally-extended multi-regional input-output
//! table using the GTAP database", Economic Systems Research 23(2).
//!
//! National accounts record how much of commodity `i` region `S` imports and
//! which using sectors absorb it, but not where it came from. The bilateral
//! trade data say how much of `i` each source region `R` ships to `S`. Each
//! recorded import is split across source regions by
//!
//! ```text
//! share(R, i, S) = exports(R, i, S) / imports(i, S)
//! Z_rs[(R,i), (S,j)] = share(R, i, S) * sectoral_imports[i, (S,j)]
//! y_rs[(R,i), S]     = share(R, i, S) * imported_final_demand[(S,i)]
//! ```
//!
//! A zero `imports(i, S)` gives a zero share for every `R`. Each output cell
//! depends only on shared immutable inputs, so cells are filled in parallel
//! without locking.

use log::debug;
use ndarray::{Array2, Zip};

use crate::algorithm::ratio::safe_divide;
use crate::error::{MrioError, Result};
use crate::labels::AxisLayout;
use crate::matrix::{DenseMatrix, FlowVector, same_order};

/// Share of each source region in a destination's imports of a commodity
///
/// `exports` is laid out (origin region, commodity) x destination region;
/// `total_imports` is keyed (destination region, commodity). The result has
/// the layout of `exports`.
pub fn import_shares(exports: &DenseMatrix, total_imports: &FlowVector) -> Result<DenseMatrix> {
    expect_layout(exports, AxisLayout::RegionSector, AxisLayout::Region, "bilateral exports")?;
    let order = exports.order();
    same_order(order, total_imports.order(), "import shares")?;

    let n_sectors = order.n_sectors();
    let e = exports.values();
    let imports = total_imports.values();

    let unallocated = (0..order.n_regions())
        .flat_map(|s| (0..n_sectors).map(move |i| (s, i)))
        .filter(|&(s, i)| {
            imports[s * n_sectors + i] == 0.0
                && (0..order.n_regions()).any(|r| e[[r * n_sectors + i, s]] != 0.0)
        })
        .count();
    if unallocated > 0 {
        debug!(
            "{unallocated} (commodity, destination) pairs have exports but no recorded imports; their shares are zero"
        );
    }

    let mut shares = Array2::zeros(e.dim());
    fill_cells(&mut shares, false, |p, s| {
        let i = p % n_sectors;
        safe_divide(e[[p, s]], imports[s * n_sectors + i])
    });
    DenseMatrix::from_array(order, AxisLayout::RegionSector, AxisLayout::Region, shares)
}

/// Inter-regional intermediate flows Z_rs
///
/// `sectoral_imports` is laid out commodity x (destination region, using
/// sector). Each destination sector's imported use of commodity `i` is split
/// across source regions by their import share.
pub fn allocate_intermediate(
    shares: &DenseMatrix,
    sectoral_imports: &DenseMatrix,
    parallel: bool,
) -> Result<DenseMatrix> {
    expect_layout(shares, AxisLayout::RegionSector, AxisLayout::Region, "import shares")?;
    expect_layout(
        sectoral_imports,
        AxisLayout::Sector,
        AxisLayout::RegionSector,
        "sectoral imports",
    )?;
    same_order(shares.order(), sectoral_imports.order(), "intermediate allocation")?;

    let order = shares.order();
    let n_sectors = order.n_sectors();
    let share = shares.values();
    let used = sectoral_imports.values();

    let mut z_rs = Array2::zeros((order.len(), order.len()));
    fill_cells(&mut z_rs, parallel, |p, q| {
        let i = p % n_sectors;
        let s = q / n_sectors;
        share[[p, s]] * used[[i, q]]
    });
    DenseMatrix::from_array(order, AxisLayout::RegionSector, AxisLayout::RegionSector, z_rs)
}

/// Inter-regional final demand y_rs, by destination region
///
/// `imported_final_demand` is keyed (destination region, commodity).
pub fn allocate_final_demand(
    shares: &DenseMatrix,
    imported_final_demand: &FlowVector,
    parallel: bool,
) -> Result<DenseMatrix> {
    expect_layout(shares, AxisLayout::RegionSector, AxisLayout::Region, "import shares")?;

    let order = shares.order();
    let n_sectors = order.n_sectors();
    let share = shares.values();
    same_order(order, imported_final_demand.order(), "final demand allocation")?;
    let y_m = imported_final_demand.values();

    let mut y_rs = Array2::zeros(share.dim());
    fill_cells(&mut y_rs, parallel, |p, s| {
        let i = p % n_sectors;
        share[[p, s]] * y_m[s * n_sectors + i]
    });
    DenseMatrix::from_array(order, AxisLayout::RegionSector, AxisLayout::Region, y_rs)
}

/// Write `cell(row, col)` into every position of `out`
fn fill_cells<F>(out: &mut Array2<f64>, parallel: bool, cell: F)
where
    F: Fn(usize, usize) -> f64 + Sync + Send,
{
    let zip = Zip::indexed(out);
    if parallel {
        zip.par_for_each(|(r, c), v| *v = cell(r, c));
    } else {
        zip.for_each(|(r, c), v| *v = cell(r, c));
    }
}

fn expect_layout(
    matrix: &DenseMatrix,
    rows: AxisLayout,
    cols: AxisLayout,
    what: &str,
) -> Result<()> {
    if matrix.row_axis() == rows && matrix.col_axis() == cols {
        Ok(())
    } else {
        Err(MrioError::mismatch(
            what,
            format!(
                "expected {rows:?}x{cols:?}, got {:?}x{:?}",
                matrix.row_axis(),
                matrix.col_axis()
            ),
        ))
    }
}

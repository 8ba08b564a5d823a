//! Pivot (long to wide) and unpivot (wide to long)
//!
//! GTAP flow records name a single `region` column that serves as both the
//! producing and the using region. Pivoting such a table with `region` on
//! both axes first copies the shared dimension under an internal alias,
//! pivots on the alias, and restores the original name on the column axis.
//! The result is the block-diagonal 4D flow tensor
//! (region, input) x (region, output).

use std::borrow::Cow;

use log::debug;
use ndarray::Array2;
use rustc_hash::FxHashMap;

use super::long::{Key, LongTable};
use super::wide::LabeledMatrix;
use crate::error::{MrioError, Result};

/// Suffix of the internal alias given to a dimension shared by both axes
const SHARED_SUFFIX: &str = "#column";

/// Pivot long records into a dense labelled matrix
///
/// Row and column keys appear in first-observed order. Combinations absent
/// from the records are 0.0; duplicate records for one cell are summed.
pub fn long_to_wide(
    table: &LongTable,
    row_dims: &[&str],
    col_dims: &[&str],
) -> Result<LabeledMatrix> {
    // Rename step: give shared dimensions a column-side alias
    let mut working = Cow::Borrowed(table);
    let mut pivot_cols = Vec::with_capacity(col_dims.len());
    for &dim in col_dims {
        if row_dims.contains(&dim) {
            let alias = format!("{dim}{SHARED_SUFFIX}");
            working = Cow::Owned(working.with_dimension_copy(dim, &alias)?);
            pivot_cols.push(alias);
        } else {
            pivot_cols.push(dim.to_string());
        }
    }

    let row_idx = row_dims
        .iter()
        .map(|d| working.dim_index(d))
        .collect::<Result<Vec<_>>>()?;
    let col_idx = pivot_cols
        .iter()
        .map(|d| working.dim_index(d))
        .collect::<Result<Vec<_>>>()?;

    let mut rows = KeyInterner::default();
    let mut cols = KeyInterner::default();
    let mut cells = Vec::with_capacity(working.len());
    for (key, value) in working.iter() {
        let r = rows.intern(row_idx.iter().map(|&i| key[i].clone()).collect());
        let c = cols.intern(col_idx.iter().map(|&i| key[i].clone()).collect());
        cells.push((r, c, value));
    }

    let mut values = Array2::zeros((rows.keys.len(), cols.keys.len()));
    for (r, c, value) in cells {
        values[[r, c]] += value;
    }
    debug!(
        "Pivoted {} records into a {}x{} matrix",
        table.len(),
        rows.keys.len(),
        cols.keys.len()
    );

    // Restore step: the column axis carries the caller's dimension names
    LabeledMatrix::new(
        row_dims.iter().map(|d| (*d).to_string()).collect(),
        col_dims.iter().map(|d| (*d).to_string()).collect(),
        rows.keys,
        cols.keys,
        values,
    )
}

/// Flatten a labelled matrix into long records ("unstack")
///
/// `index_names` orders the key components of the output and must name each
/// row and column dimension exactly once. When `align_to` is given the
/// output holds exactly those keys, in that order, with 0.0 for keys that
/// had no cell; keys outside it are dropped.
pub fn wide_to_long(
    matrix: &LabeledMatrix,
    index_names: &[&str],
    value_name: &str,
    align_to: Option<&[Key]>,
) -> Result<LongTable> {
    let axis_names: Vec<&str> = matrix
        .row_names()
        .iter()
        .chain(matrix.col_names())
        .map(String::as_str)
        .collect();
    if index_names.len() != axis_names.len() {
        return Err(MrioError::mismatch(
            "unstack",
            format!("index names {index_names:?} do not cover axes {axis_names:?}"),
        ));
    }

    // Each output component takes the first unused axis of that name
    let mut used = vec![false; axis_names.len()];
    let mut permutation = Vec::with_capacity(index_names.len());
    for &name in index_names {
        let position = axis_names
            .iter()
            .enumerate()
            .position(|(i, &a)| a == name && !used[i])
            .ok_or_else(|| MrioError::UnknownDimension {
                dimension: name.to_string(),
                available: axis_names.join(", "),
            })?;
        used[position] = true;
        permutation.push(position);
    }

    let mut long = LongTable::new(index_names.iter().copied(), value_name);
    let values = matrix.values();
    for (i, row_key) in matrix.row_keys().iter().enumerate() {
        for (j, col_key) in matrix.col_keys().iter().enumerate() {
            let full: Vec<&String> = row_key.iter().chain(col_key.iter()).collect();
            let key = permutation.iter().map(|&p| full[p].clone());
            long.push(key, values[[i, j]])?;
        }
    }

    match align_to {
        None => Ok(long),
        Some(target) => {
            let mut lookup: FxHashMap<&[String], f64> = FxHashMap::default();
            for (key, value) in long.iter() {
                *lookup.entry(key).or_insert(0.0) += value;
            }
            let mut aligned = LongTable::new(index_names.iter().copied(), value_name);
            for key in target {
                let value = lookup.get(key.as_slice()).copied().unwrap_or(0.0);
                aligned.push(key.iter().cloned(), value)?;
            }
            Ok(aligned)
        }
    }
}

/// First-seen ordering of compound keys
#[derive(Default)]
struct KeyInterner {
    keys: Vec<Key>,
    lookup: FxHashMap<Key, usize>,
}

impl KeyInterner {
    fn intern(&mut self, key: Key) -> usize {
        if let Some(&i) = self.lookup.get(&key) {
            return i;
        }
        let i = self.keys.len();
        self.lookup.insert(key.clone(), i);
        self.keys.push(key);
        i
    }
}

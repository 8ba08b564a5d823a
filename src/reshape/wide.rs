//! Labelled two-dimensional tables
//!
//! A [`LabeledMatrix`] is the wide form of a [`LongTable`](super::LongTable):
//! a dense matrix whose rows and columns carry compound keys. It is the shape
//! adapters hand to the core, and the intermediate form of every pivot before
//! alignment to a [`LabelOrder`].

use std::sync::Arc;

use ndarray::Array2;
use rustc_hash::FxHashMap;

use super::long::Key;
use crate::error::{MrioError, Result};
use crate::labels::{AxisLayout, LabelOrder};
use crate::matrix::DenseMatrix;

/// Dense matrix with compound row and column keys
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledMatrix {
    row_names: Vec<String>,
    col_names: Vec<String>,
    row_keys: Vec<Key>,
    col_keys: Vec<Key>,
    values: Array2<f64>,
}

impl LabeledMatrix {
    /// Create a labelled matrix, checking keys against names and shape
    pub fn new(
        row_names: Vec<String>,
        col_names: Vec<String>,
        row_keys: Vec<Key>,
        col_keys: Vec<Key>,
        values: Array2<f64>,
    ) -> Result<Self> {
        if values.nrows() != row_keys.len() || values.ncols() != col_keys.len() {
            return Err(MrioError::mismatch(
                "labelled matrix",
                format!(
                    "{} row keys and {} column keys for a {}x{} matrix",
                    row_keys.len(),
                    col_keys.len(),
                    values.nrows(),
                    values.ncols()
                ),
            ));
        }
        check_arity(&row_keys, row_names.len(), "row")?;
        check_arity(&col_keys, col_names.len(), "column")?;

        Ok(Self {
            row_names,
            col_names,
            row_keys,
            col_keys,
            values,
        })
    }

    /// Create a plain 2D table with single-label rows and columns
    pub fn from_labels<R, C, S, T>(
        row_name: &str,
        col_name: &str,
        rows: R,
        cols: C,
        values: Array2<f64>,
    ) -> Result<Self>
    where
        R: IntoIterator<Item = S>,
        C: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        let row_keys = rows.into_iter().map(|r| Key::from_elem(r.into(), 1)).collect();
        let col_keys = cols.into_iter().map(|c| Key::from_elem(c.into(), 1)).collect();
        Self::new(
            vec![row_name.to_string()],
            vec![col_name.to_string()],
            row_keys,
            col_keys,
            values,
        )
    }

    /// Create a plain 2D table from row-major data
    pub fn from_row_slice(
        row_name: &str,
        col_name: &str,
        rows: &[&str],
        cols: &[&str],
        data: &[f64],
    ) -> Result<Self> {
        let values = Array2::from_shape_vec((rows.len(), cols.len()), data.to_vec())
            .map_err(|e| MrioError::mismatch("labelled matrix", e.to_string()))?;
        Self::from_labels(
            row_name,
            col_name,
            rows.iter().copied(),
            cols.iter().copied(),
            values,
        )
    }

    pub fn row_names(&self) -> &[String] {
        &self.row_names
    }

    pub fn col_names(&self) -> &[String] {
        &self.col_names
    }

    pub fn row_keys(&self) -> &[Key] {
        &self.row_keys
    }

    pub fn col_keys(&self) -> &[Key] {
        &self.col_keys
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        self.values.dim()
    }

    /// Value at a (row key, column key) cell, if both keys exist
    pub fn get<S: AsRef<str>, T: AsRef<str>>(&self, row: &[S], col: &[T]) -> Option<f64> {
        let i = self.row_keys.iter().position(|k| key_eq(k, row))?;
        let j = self.col_keys.iter().position(|k| key_eq(k, col))?;
        Some(self.values[[i, j]])
    }

    /// Replace the axis names, keeping keys and values
    pub fn with_axis_names(
        mut self,
        row_names: Vec<String>,
        col_names: Vec<String>,
    ) -> Result<Self> {
        check_arity(&self.row_keys, row_names.len(), "row")?;
        check_arity(&self.col_keys, col_names.len(), "column")?;
        self.row_names = row_names;
        self.col_names = col_names;
        Ok(self)
    }

    /// Conform to another matrix's keys and axis names
    ///
    /// Cells present in `other` but absent here are zero; keys absent from
    /// `other` are dropped.
    #[must_use]
    pub fn reindex_like(&self, other: &Self) -> Self {
        let values = self.lookup_grid(&other.row_keys, &other.col_keys);
        Self {
            row_names: other.row_names.clone(),
            col_names: other.col_names.clone(),
            row_keys: other.row_keys.clone(),
            col_keys: other.col_keys.clone(),
            values,
        }
    }

    /// Keep only the listed single-label rows, in the listed order
    ///
    /// Listed rows with no data come back as zero rows.
    pub fn select_rows<S: AsRef<str>>(&self, labels: &[S]) -> Result<Self> {
        if self.row_names.len() != 1 {
            return Err(MrioError::mismatch(
                "row selection",
                format!("rows are keyed by {:?}, expected one dimension", self.row_names),
            ));
        }
        let row_keys: Vec<Key> = labels
            .iter()
            .map(|l| Key::from_elem(l.as_ref().to_string(), 1))
            .collect();
        let values = self.lookup_grid(&row_keys, &self.col_keys);
        Ok(Self {
            row_names: self.row_names.clone(),
            col_names: self.col_names.clone(),
            row_keys,
            col_keys: self.col_keys.clone(),
            values,
        })
    }

    /// Drop every row and column with a key component matching `predicate`
    #[must_use]
    pub fn drop_labels(&self, predicate: impl Fn(&str) -> bool) -> Self {
        let keep = |k: &Key| !k.iter().any(|c| predicate(c.as_str()));
        let rows: Vec<usize> = (0..self.row_keys.len())
            .filter(|&i| keep(&self.row_keys[i]))
            .collect();
        let cols: Vec<usize> = (0..self.col_keys.len())
            .filter(|&j| keep(&self.col_keys[j]))
            .collect();

        let values = Array2::from_shape_fn((rows.len(), cols.len()), |(i, j)| {
            self.values[[rows[i], cols[j]]]
        });
        Self {
            row_names: self.row_names.clone(),
            col_names: self.col_names.clone(),
            row_keys: rows.iter().map(|&i| self.row_keys[i].clone()).collect(),
            col_keys: cols.iter().map(|&j| self.col_keys[j].clone()).collect(),
            values,
        }
    }

    /// Rewrite every key component with `f`
    #[must_use]
    pub fn map_labels(&self, f: impl Fn(&str) -> String) -> Self {
        let map = |keys: &[Key]| -> Vec<Key> {
            keys.iter()
                .map(|k| k.iter().map(|c| f(c.as_str())).collect())
                .collect()
        };
        Self {
            row_names: self.row_names.clone(),
            col_names: self.col_names.clone(),
            row_keys: map(&self.row_keys),
            col_keys: map(&self.col_keys),
            values: self.values.clone(),
        }
    }

    /// Align rows and columns to a label order
    ///
    /// Cells whose keys collapse onto the same aligned position are summed;
    /// positions without data are zero.
    ///
    /// # Errors
    /// `DimensionMismatch` naming `context` if any key references a label
    /// outside the order or has the wrong number of components
    pub fn reindex(
        &self,
        order: &Arc<LabelOrder>,
        row_axis: AxisLayout,
        col_axis: AxisLayout,
        context: &str,
    ) -> Result<DenseMatrix> {
        let locate = |axis: AxisLayout, keys: &[Key]| -> Result<Vec<usize>> {
            keys.iter()
                .map(|k| {
                    axis.locate(order, k.as_slice())
                        .map_err(|detail| MrioError::mismatch(context, detail))
                })
                .collect()
        };
        let rows = locate(row_axis, &self.row_keys)?;
        let cols = locate(col_axis, &self.col_keys)?;

        let mut aligned = DenseMatrix::zeros(order, row_axis, col_axis);
        {
            let out = aligned.values_mut();
            for (i, &r) in rows.iter().enumerate() {
                for (j, &c) in cols.iter().enumerate() {
                    out[[r, c]] += self.values[[i, j]];
                }
            }
        }
        Ok(aligned)
    }

    fn lookup_grid(&self, row_keys: &[Key], col_keys: &[Key]) -> Array2<f64> {
        let row_index: FxHashMap<&Key, usize> =
            self.row_keys.iter().enumerate().map(|(i, k)| (k, i)).collect();
        let col_index: FxHashMap<&Key, usize> =
            self.col_keys.iter().enumerate().map(|(j, k)| (k, j)).collect();

        Array2::from_shape_fn((row_keys.len(), col_keys.len()), |(i, j)| {
            match (row_index.get(&row_keys[i]), col_index.get(&col_keys[j])) {
                (Some(&r), Some(&c)) => self.values[[r, c]],
                _ => 0.0,
            }
        })
    }
}

fn key_eq<S: AsRef<str>>(key: &Key, other: &[S]) -> bool {
    key.len() == other.len() && key.iter().zip(other).all(|(a, b)| a == b.as_ref())
}

fn check_arity(keys: &[Key], arity: usize, axis: &str) -> Result<()> {
    match keys.iter().find(|k| k.len() != arity) {
        Some(bad) => Err(MrioError::mismatch(
            "labelled matrix",
            format!(
                "{axis} key {:?} does not match {arity} axis name(s)",
                bad.as_slice()
            ),
        )),
        None => Ok(()),
    }
}

//! Long-format flow records
//!
//! Each record is a compound key with one component per named dimension,
//! plus a single value.

use smallvec::SmallVec;

use crate::error::{MrioError, Result};

/// Compound key, one label per dimension
pub type Key = SmallVec<[String; 3]>;

/// A table of (key, value) records with named key dimensions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LongTable {
    dims: Vec<String>,
    value_name: String,
    keys: Vec<Key>,
    values: Vec<f64>,
}

impl LongTable {
    /// Create an empty table with the given dimension names
    pub fn new<I, S>(dims: I, value_name: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            dims: dims.into_iter().map(Into::into).collect(),
            value_name: value_name.into(),
            keys: Vec::new(),
            values: Vec::new(),
        }
    }

    pub fn dims(&self) -> &[String] {
        &self.dims
    }

    pub fn value_name(&self) -> &str {
        &self.value_name
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Append a record
    ///
    /// # Errors
    /// `DimensionMismatch` if the key does not have one label per dimension
    pub fn push<I, S>(&mut self, key: I, value: f64) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let key: Key = key.into_iter().map(Into::into).collect();
        if key.len() != self.dims.len() {
            return Err(MrioError::mismatch(
                "long table record",
                format!(
                    "key {:?} has {} components, table has dimensions {:?}",
                    key.as_slice(),
                    key.len(),
                    self.dims
                ),
            ));
        }
        self.keys.push(key);
        self.values.push(value);
        Ok(())
    }

    /// Index of a named dimension
    pub fn dim_index(&self, name: &str) -> Result<usize> {
        self.dims
            .iter()
            .position(|d| d == name)
            .ok_or_else(|| MrioError::UnknownDimension {
                dimension: name.to_string(),
                available: self.dims.join(", "),
            })
    }

    /// Labels of one dimension, record by record
    pub fn labels(&self, name: &str) -> Result<Vec<&str>> {
        let idx = self.dim_index(name)?;
        Ok(self.keys.iter().map(|k| k[idx].as_str()).collect())
    }

    /// Iterate over (key, value) records in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&[String], f64)> + '_ {
        self.keys
            .iter()
            .map(|k| k.as_slice())
            .zip(self.values.iter().copied())
    }

    /// Copy of this table with an extra dimension `alias` that duplicates
    /// the labels of `source`
    pub fn with_dimension_copy(&self, source: &str, alias: &str) -> Result<Self> {
        let idx = self.dim_index(source)?;
        if self.dim_index(alias).is_ok() {
            return Err(MrioError::mismatch(
                "dimension copy",
                format!("dimension '{alias}' already exists"),
            ));
        }

        let mut dims = self.dims.clone();
        dims.push(alias.to_string());
        let keys = self
            .keys
            .iter()
            .map(|k| {
                let mut key = k.clone();
                key.push(k[idx].clone());
                key
            })
            .collect();

        Ok(Self {
            dims,
            value_name: self.value_name.clone(),
            keys,
            values: self.values.clone(),
        })
    }

    /// Split the table on whether `dim` equals `label`
    ///
    /// Returns `(matching, remaining)`; the matching half no longer carries
    /// the `dim` dimension.
    pub fn partition(&self, dim: &str, label: &str) -> Result<(Self, Self)> {
        let idx = self.dim_index(dim)?;
        let mut matching_dims = self.dims.clone();
        matching_dims.remove(idx);

        let mut matching = Self::new(matching_dims, self.value_name.clone());
        let mut remaining = Self::new(self.dims.clone(), self.value_name.clone());
        for (key, value) in self.keys.iter().zip(&self.values) {
            if key[idx] == label {
                let mut reduced = key.clone();
                reduced.remove(idx);
                matching.keys.push(reduced);
                matching.values.push(*value);
            } else {
                remaining.keys.push(key.clone());
                remaining.values.push(*value);
            }
        }
        Ok((matching, remaining))
    }

    /// Sum of all values
    #[must_use]
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }
}

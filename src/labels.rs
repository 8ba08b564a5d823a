//! Canonical region and sector ordering
//!
//! A [`LabelOrder`] is derived once from the bilateral export table and then
//! used to align every other matrix. Rows and columns keyed by
//! (region, sector) are laid out region-major: position = region * sectors + sector.

use itertools::Itertools;
use log::info;
use rustc_hash::FxHashMap;

use crate::dataset::dims;
use crate::error::{MrioError, Result};
use crate::reshape::LongTable;

/// Ordered, duplicate-free lists of regions and sectors
#[derive(Debug, Clone, PartialEq)]
pub struct LabelOrder {
    regions: Vec<String>,
    sectors: Vec<String>,
    region_index: FxHashMap<String, usize>,
    sector_index: FxHashMap<String, usize>,
}

impl LabelOrder {
    /// Create a label order from explicit region and sector lists
    ///
    /// # Errors
    /// `MissingDimensionData` if either list is empty, `DimensionMismatch`
    /// if a list contains the same label twice
    pub fn new(regions: Vec<String>, sectors: Vec<String>) -> Result<Self> {
        if regions.is_empty() {
            return Err(MrioError::MissingDimensionData(
                "no regions observed".to_string(),
            ));
        }
        if sectors.is_empty() {
            return Err(MrioError::MissingDimensionData(
                "no sectors observed".to_string(),
            ));
        }

        let region_index = index_labels(&regions, "regions")?;
        let sector_index = index_labels(&sectors, "sectors")?;

        Ok(Self {
            regions,
            sectors,
            region_index,
            sector_index,
        })
    }

    /// Derive the label order from a bilateral export table
    ///
    /// Regions are the origin labels in first-seen order, followed by any
    /// region that only ever appears as a destination. Sectors are the
    /// commodity labels in first-seen order.
    pub fn from_bilateral_exports(exports: &LongTable) -> Result<Self> {
        if exports.is_empty() {
            return Err(MrioError::MissingDimensionData(
                "bilateral export table is empty".to_string(),
            ));
        }

        let origins = exports.labels(dims::ORIGIN)?;
        let destinations = exports.labels(dims::DESTINATION)?;
        let regions = origins
            .into_iter()
            .chain(destinations)
            .unique()
            .map(str::to_string)
            .collect_vec();
        let sectors = exports
            .labels(dims::COMMODITY)?
            .into_iter()
            .unique()
            .map(str::to_string)
            .collect_vec();

        let order = Self::new(regions, sectors)?;
        info!(
            "Label order built from {} export records: {} regions, {} sectors",
            exports.len(),
            order.n_regions(),
            order.n_sectors()
        );
        Ok(order)
    }

    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    pub fn sectors(&self) -> &[String] {
        &self.sectors
    }

    #[must_use]
    pub fn n_regions(&self) -> usize {
        self.regions.len()
    }

    #[must_use]
    pub fn n_sectors(&self) -> usize {
        self.sectors.len()
    }

    /// Number of (region, sector) pairs
    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len() * self.sectors.len()
    }

    /// Always false: construction rejects empty dimensions
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn region_position(&self, region: &str) -> Option<usize> {
        self.region_index.get(region).copied()
    }

    pub fn sector_position(&self, sector: &str) -> Option<usize> {
        self.sector_index.get(sector).copied()
    }

    /// Position of a (region, sector) pair in the region-major layout
    pub fn position(&self, region: &str, sector: &str) -> Option<usize> {
        let r = self.region_position(region)?;
        let s = self.sector_position(sector)?;
        Some(r * self.n_sectors() + s)
    }

    /// (region, sector) pair at a region-major position
    #[must_use]
    pub fn key_at(&self, position: usize) -> (&str, &str) {
        let n = self.n_sectors();
        (&self.regions[position / n], &self.sectors[position % n])
    }

    /// All (region, sector) pairs in canonical order
    pub fn keys(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.regions.iter().flat_map(move |region| {
            self.sectors
                .iter()
                .map(move |sector| (region.as_str(), sector.as_str()))
        })
    }

    /// Compound keys joined into single strings, e.g. `"eu/ pdr"`
    #[must_use]
    pub fn joined_labels(&self, separator: &str) -> Vec<String> {
        self.keys()
            .map(|(region, sector)| format!("{region}{separator}{sector}").trim().to_string())
            .collect()
    }
}

fn index_labels(labels: &[String], what: &str) -> Result<FxHashMap<String, usize>> {
    let mut index = FxHashMap::default();
    for (i, label) in labels.iter().enumerate() {
        if index.insert(label.clone(), i).is_some() {
            return Err(MrioError::mismatch(
                format!("label order ({what})"),
                format!("duplicate label '{label}'"),
            ));
        }
    }
    Ok(index)
}

/// How one axis of an aligned matrix is indexed against a [`LabelOrder`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisLayout {
    /// Compound (region, sector) keys, region-major
    RegionSector,
    /// Region keys only
    Region,
    /// Sector keys only
    Sector,
}

impl AxisLayout {
    /// Length of the axis under the given order
    #[must_use]
    pub fn len(self, order: &LabelOrder) -> usize {
        match self {
            Self::RegionSector => order.len(),
            Self::Region => order.n_regions(),
            Self::Sector => order.n_sectors(),
        }
    }

    /// Number of key components expected on this axis
    #[must_use]
    pub fn arity(self) -> usize {
        match self {
            Self::RegionSector => 2,
            Self::Region | Self::Sector => 1,
        }
    }

    /// Locate a key on this axis, or describe why it cannot be aligned
    pub fn locate<S: AsRef<str>>(
        self,
        order: &LabelOrder,
        key: &[S],
    ) -> std::result::Result<usize, String> {
        if key.len() != self.arity() {
            return Err(format!(
                "expected {} key component(s), got {}",
                self.arity(),
                key.len()
            ));
        }
        let region = |label: &str| {
            order
                .region_position(label)
                .ok_or_else(|| format!("region '{label}' is not in the label order"))
        };
        let sector = |label: &str| {
            order
                .sector_position(label)
                .ok_or_else(|| format!("sector '{label}' is not in the label order"))
        };
        match self {
            Self::RegionSector => {
                let r = region(key[0].as_ref())?;
                let s = sector(key[1].as_ref())?;
                Ok(r * order.n_sectors() + s)
            }
            Self::Region => region(key[0].as_ref()),
            Self::Sector => sector(key[0].as_ref()),
        }
    }

    /// Labels of this axis, compound keys joined with `separator`
    #[must_use]
    pub fn labels(self, order: &LabelOrder, separator: &str) -> Vec<String> {
        match self {
            Self::RegionSector => order.joined_labels(separator),
            Self::Region => order.regions().to_vec(),
            Self::Sector => order.sectors().to_vec(),
        }
    }
}

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregation result types for the school-map pipeline.
//!
//! [`BinnedCounts`] is the sparse 2-D density grid behind the school
//! heatmap; [`AreaReport`] summarizes the beat area computation,
//! including which beats were skipped.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Equal-width bin edges over one observed coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinEdges {
    min: f64,
    width: f64,
    bins: usize,
}

impl BinEdges {
    /// Partitions `[min, max]` into at most `max_bins` equal-width
    /// intervals. A degenerate (zero-width or inverted) range
    /// collapses into a single bin holding everything.
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // bin counts stay far below 2^52
    pub fn from_range(min: f64, max: f64, max_bins: usize) -> Self {
        let bins = max_bins.max(1);
        let span = max - min;
        if span > 0.0 {
            Self {
                min,
                width: span / bins as f64,
                bins,
            }
        } else {
            Self {
                min,
                width: 0.0,
                bins: 1,
            }
        }
    }

    /// The bin a value falls into. Values at the maximum edge land in
    /// the last bin, so every observed value has exactly one cell.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // quotient is clamped to [0, bins)
    pub fn index_of(&self, value: f64) -> usize {
        if self.width <= 0.0 {
            return 0;
        }
        let raw = ((value - self.min) / self.width) as usize;
        raw.min(self.bins - 1)
    }

    /// Number of bins on this axis.
    #[must_use]
    pub const fn bins(&self) -> usize {
        self.bins
    }

    /// The `[start, end)` interval covered by a bin.
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // bin indices stay far below 2^52
    pub fn interval(&self, bin: usize) -> (f64, f64) {
        let start = self.width.mul_add(bin as f64, self.min);
        (start, start + self.width)
    }
}

/// Sparse 2-D histogram of school locations.
///
/// Cells map `(longitude-bin, latitude-bin)` to the number of schools
/// in that cell; zero cells are omitted. The chart collaborator
/// materializes empty cells if it needs them for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct BinnedCounts {
    lng_edges: BinEdges,
    lat_edges: BinEdges,
    cells: BTreeMap<(usize, usize), u64>,
}

impl BinnedCounts {
    /// Creates a grid from its edges and populated cells.
    #[must_use]
    pub const fn new(
        lng_edges: BinEdges,
        lat_edges: BinEdges,
        cells: BTreeMap<(usize, usize), u64>,
    ) -> Self {
        Self {
            lng_edges,
            lat_edges,
            cells,
        }
    }

    /// A grid with no observations.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            lng_edges: BinEdges::from_range(0.0, 0.0, 1),
            lat_edges: BinEdges::from_range(0.0, 0.0, 1),
            cells: BTreeMap::new(),
        }
    }

    /// The populated cells, keyed `(longitude-bin, latitude-bin)`.
    #[must_use]
    pub const fn cells(&self) -> &BTreeMap<(usize, usize), u64> {
        &self.cells
    }

    /// Longitude-axis bin edges.
    #[must_use]
    pub const fn lng_edges(&self) -> &BinEdges {
        &self.lng_edges
    }

    /// Latitude-axis bin edges.
    #[must_use]
    pub const fn lat_edges(&self) -> &BinEdges {
        &self.lat_edges
    }

    /// Sum of all cell counts.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.cells.values().sum()
    }
}

/// Outcome summary of the beat area computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaReport {
    /// Number of beats whose area was computed.
    pub computed: usize,
    /// Beat identifiers whose geometry failed to reproject. Their
    /// records keep `area_sq_km = None` rather than a silent zero.
    pub skipped: Vec<String>,
    /// Number of beats with no geometry at all (the validator's
    /// concern, counted here for the log line).
    pub missing_geometry: usize,
}

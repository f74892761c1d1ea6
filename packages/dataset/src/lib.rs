#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dataset loading and geometry validation.
//!
//! The loader reads the two raw tables (CPS school locations, police
//! beat boundaries) from CSV, parses the fixed `the_geom` WKT column
//! into geometry, and tags the result EPSG:4326. The validator drops
//! records with missing or empty geometry before the map seam.
//!
//! Load failures abort the whole one-shot pipeline; the shell reports
//! the structured error rather than guessing a skip-and-continue
//! intent.

pub mod loader;
pub mod validate;

use school_map_geometry::GeometryError;

/// Errors that can occur while loading a dataset from disk.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// I/O error (file missing or unreadable).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The file lacks a required column.
    #[error("missing required column '{column}' in {path}")]
    MissingColumn {
        /// Name of the expected column.
        column: String,
        /// Path of the offending file.
        path: String,
    },

    /// A row's geometry text could not be parsed.
    #[error("malformed geometry at data row {row}: {source}")]
    Geometry {
        /// 1-based data row number (header excluded).
        row: usize,
        /// The underlying parse failure.
        source: GeometryError,
    },
}

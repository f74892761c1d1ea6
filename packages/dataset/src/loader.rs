//! CSV loaders for the two raw tables.
//!
//! Column names are a fixed contract with the published datasets:
//! `the_geom` carries WKT geometry in both files, `SCH_TYPE` the
//! school category, `BEAT` the beat identifier. Every other column is
//! kept verbatim as a record attribute.

use std::collections::BTreeMap;
use std::path::Path;

use school_map_dataset_models::{Dataset, PoliceBeatRecord, SchoolRecord};
use school_map_geometry::{Crs, Geom};

use crate::LoadError;

/// WKT geometry column shared by both files.
pub const GEOMETRY_COLUMN: &str = "the_geom";
/// School category column in the CPS locations file.
pub const SCHOOL_TYPE_COLUMN: &str = "SCH_TYPE";
/// School name column in the CPS locations file (optional).
pub const SCHOOL_NAME_COLUMN: &str = "SCHOOL_NM";
/// Beat identifier column in the police beats file.
pub const BEAT_COLUMN: &str = "BEAT";

/// Loads the CPS school locations table.
///
/// # Errors
///
/// Returns [`LoadError`] if the file is missing or unreadable, lacks
/// the `the_geom` or `SCH_TYPE` column, or any row's geometry text is
/// malformed (the whole load aborts on the first bad row).
pub fn load_schools(path: &Path) -> Result<Dataset<SchoolRecord>, LoadError> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let geom_idx = column_index(&headers, GEOMETRY_COLUMN, path)?;
    let type_idx = column_index(&headers, SCHOOL_TYPE_COLUMN, path)?;
    let name_idx = headers.iter().position(|h| h == SCHOOL_NAME_COLUMN);

    let mut records = Vec::new();
    for (i, row) in reader.records().enumerate() {
        let row = row?;
        let geometry = parse_geometry_cell(row.get(geom_idx).unwrap_or(""), i + 1)?;
        let school_type = row.get(type_idx).unwrap_or("").trim().to_string();
        let name = name_idx
            .and_then(|idx| row.get(idx))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string);

        records.push(SchoolRecord {
            name,
            school_type,
            geometry,
            attributes: remaining_attributes(&headers, &row, &[geom_idx, type_idx]),
        });
    }

    log::info!(
        "Loaded {} school records from {}",
        records.len(),
        path.display()
    );

    Ok(Dataset::new(Crs::Epsg4326, records))
}

/// Loads the police beat boundaries table.
///
/// Area is left uncomputed (`area_sq_km = None`); the area calculator
/// derives it once from the Web-Mercator reprojection.
///
/// # Errors
///
/// Returns [`LoadError`] if the file is missing or unreadable, lacks
/// the `the_geom` or `BEAT` column, or any row's geometry text is
/// malformed.
pub fn load_beats(path: &Path) -> Result<Dataset<PoliceBeatRecord>, LoadError> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let geom_idx = column_index(&headers, GEOMETRY_COLUMN, path)?;
    let beat_idx = column_index(&headers, BEAT_COLUMN, path)?;

    let mut records = Vec::new();
    for (i, row) in reader.records().enumerate() {
        let row = row?;
        let geometry = parse_geometry_cell(row.get(geom_idx).unwrap_or(""), i + 1)?;
        let beat = row.get(beat_idx).unwrap_or("").trim().to_string();

        records.push(PoliceBeatRecord {
            beat,
            geometry,
            area_sq_km: None,
            attributes: remaining_attributes(&headers, &row, &[geom_idx, beat_idx]),
        });
    }

    log::info!(
        "Loaded {} beat records from {}",
        records.len(),
        path.display()
    );

    Ok(Dataset::new(Crs::Epsg4326, records))
}

/// Finds a required column in the header row.
fn column_index(
    headers: &csv::StringRecord,
    column: &str,
    path: &Path,
) -> Result<usize, LoadError> {
    headers
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| LoadError::MissingColumn {
            column: column.to_string(),
            path: path.display().to_string(),
        })
}

/// Parses one `the_geom` cell. An empty cell is a record without
/// geometry, not an error; malformed WKT aborts the load.
fn parse_geometry_cell(cell: &str, row: usize) -> Result<Option<Geom>, LoadError> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    Geom::from_wkt(trimmed)
        .map(Some)
        .map_err(|source| LoadError::Geometry { row, source })
}

/// Collects every non-contract column into the record's attribute map.
fn remaining_attributes(
    headers: &csv::StringRecord,
    row: &csv::StringRecord,
    consumed: &[usize],
) -> BTreeMap<String, String> {
    headers
        .iter()
        .zip(row.iter())
        .enumerate()
        .filter(|(idx, _)| !consumed.contains(idx))
        .map(|(_, (header, value))| (header.to_string(), value.to_string()))
        .collect()
}

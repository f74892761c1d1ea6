#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Record and collection types for the school-map pipeline.
//!
//! Two independent datasets flow through the pipeline: CPS school
//! locations (point geometry) and police beat boundaries (polygon
//! geometry). They share no foreign key; they only co-locate on a map
//! by virtue of sharing the same geographic CRS.

use std::collections::BTreeMap;

use school_map_geometry::{Crs, Geom};

/// Seam trait for record types that carry an optional geometry.
///
/// Lets the validator and reprojection helpers operate on any dataset
/// without knowing the record shape.
pub trait HasGeometry {
    /// The record's geometry, if the source row had one.
    fn geometry(&self) -> Option<&Geom>;
}

/// One row of the CPS school locations table.
///
/// Immutable after parsing; derived values (flattened coordinates) are
/// copies, never mutations of the original.
#[derive(Debug, Clone, PartialEq)]
pub struct SchoolRecord {
    /// School name from the `SCHOOL_NM` column, if present.
    pub name: Option<String>,
    /// School type category from the `SCH_TYPE` column (e.g.
    /// "Charter", "Magnet", "Neighborhood").
    pub school_type: String,
    /// Point geometry parsed from the `the_geom` column. `None` when
    /// the source cell was empty.
    pub geometry: Option<Geom>,
    /// All remaining source columns, verbatim.
    pub attributes: BTreeMap<String, String>,
}

impl HasGeometry for SchoolRecord {
    fn geometry(&self) -> Option<&Geom> {
        self.geometry.as_ref()
    }
}

/// One row of the police beat boundaries table.
#[derive(Debug, Clone, PartialEq)]
pub struct PoliceBeatRecord {
    /// Beat identifier from the `BEAT` column.
    pub beat: String,
    /// Polygon or multi-polygon geometry parsed from the `the_geom`
    /// column. `None` when the source cell was empty.
    pub geometry: Option<Geom>,
    /// Derived area in square kilometers, computed once from the
    /// Web-Mercator reprojection. `None` until computed, or when the
    /// geometry was missing or failed to reproject.
    pub area_sq_km: Option<f64>,
    /// All remaining source columns, verbatim.
    pub attributes: BTreeMap<String, String>,
}

impl HasGeometry for PoliceBeatRecord {
    fn geometry(&self) -> Option<&Geom> {
        self.geometry.as_ref()
    }
}

/// An ordered collection of records tagged with the CRS all of them
/// share.
///
/// Reprojection never mutates in place; it produces a new `Dataset`
/// carrying the new tag.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset<R> {
    crs: Crs,
    records: Vec<R>,
}

impl<R> Dataset<R> {
    /// Creates a dataset from records that all share `crs`.
    #[must_use]
    pub const fn new(crs: Crs, records: Vec<R>) -> Self {
        Self { crs, records }
    }

    /// The CRS shared by every record.
    #[must_use]
    pub const fn crs(&self) -> Crs {
        self.crs
    }

    /// The records, in source order.
    #[must_use]
    pub fn records(&self) -> &[R] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates over the records in source order.
    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.records.iter()
    }
}

impl<'a, R> IntoIterator for &'a Dataset<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn school(name: &str) -> SchoolRecord {
        SchoolRecord {
            name: Some(name.to_string()),
            school_type: "Charter".to_string(),
            geometry: Some(Geom::from_wkt("POINT (-87.6 41.9)").unwrap()),
            attributes: BTreeMap::new(),
        }
    }

    #[test]
    fn dataset_preserves_record_order() {
        let dataset = Dataset::new(Crs::Epsg4326, vec![school("a"), school("b"), school("c")]);
        let names: Vec<&str> = dataset
            .iter()
            .filter_map(|r| r.name.as_deref())
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn dataset_carries_crs_tag() {
        let dataset: Dataset<SchoolRecord> = Dataset::new(Crs::Epsg4326, Vec::new());
        assert_eq!(dataset.crs(), Crs::Epsg4326);
        assert!(dataset.is_empty());
    }

    #[test]
    fn has_geometry_exposes_the_point() {
        let record = school("a");
        assert!(record.geometry().is_some());
        assert!(record.geometry().unwrap().as_point().is_some());
    }
}

//! School type filtering, coordinate flattening, and density binning.

use std::collections::{BTreeMap, BTreeSet};

use school_map_analytics_models::{BinEdges, BinnedCounts};
use school_map_dataset_models::{Dataset, SchoolRecord};

/// Maximum bins per axis for the density grid, matching the heatmap
/// collaborator's count-aggregation encoding.
pub const MAX_BINS: usize = 30;

/// Distinct `SCH_TYPE` categories observed in the dataset, in sorted
/// order. Drives the type multi-selection default (all categories).
#[must_use]
pub fn observed_types(schools: &Dataset<SchoolRecord>) -> BTreeSet<String> {
    schools
        .iter()
        .map(|record| record.school_type.clone())
        .collect()
}

/// Returns a new dataset containing only schools whose type is in the
/// selection.
///
/// An empty selection yields an empty dataset; that is a valid result,
/// not an error, and downstream charts render with zero marks.
#[must_use]
pub fn filter_by_type(
    schools: &Dataset<SchoolRecord>,
    selected: &BTreeSet<String>,
) -> Dataset<SchoolRecord> {
    let kept: Vec<SchoolRecord> = schools
        .iter()
        .filter(|record| selected.contains(&record.school_type))
        .cloned()
        .collect();

    log::debug!(
        "Type filter kept {}/{} schools ({} types selected)",
        kept.len(),
        schools.len(),
        selected.len()
    );

    Dataset::new(schools.crs(), kept)
}

/// Flattens each school with a point geometry into a `(longitude,
/// latitude)` pair, in record order.
///
/// Records without a point are omitted; the originals are never
/// touched.
#[must_use]
pub fn flatten_coordinates(schools: &Dataset<SchoolRecord>) -> Vec<(f64, f64)> {
    schools
        .iter()
        .filter_map(|record| record.geometry.as_ref())
        .filter_map(school_map_geometry::Geom::as_point)
        .collect()
}

/// Buckets flattened coordinates into a sparse 2-D density grid.
///
/// Longitude and latitude ranges are partitioned independently into at
/// most `max_bins` equal-width intervals; each point lands in exactly
/// one cell, so the cell counts always sum to `points.len()`.
#[must_use]
pub fn bin_counts(points: &[(f64, f64)], max_bins: usize) -> BinnedCounts {
    let Some(&(first_lng, first_lat)) = points.first() else {
        return BinnedCounts::empty();
    };

    let mut lng_min = first_lng;
    let mut lng_max = first_lng;
    let mut lat_min = first_lat;
    let mut lat_max = first_lat;
    for &(lng, lat) in points {
        lng_min = lng_min.min(lng);
        lng_max = lng_max.max(lng);
        lat_min = lat_min.min(lat);
        lat_max = lat_max.max(lat);
    }

    let lng_edges = BinEdges::from_range(lng_min, lng_max, max_bins);
    let lat_edges = BinEdges::from_range(lat_min, lat_max, max_bins);

    let mut cells: BTreeMap<(usize, usize), u64> = BTreeMap::new();
    for &(lng, lat) in points {
        let cell = (lng_edges.index_of(lng), lat_edges.index_of(lat));
        *cells.entry(cell).or_insert(0) += 1;
    }

    BinnedCounts::new(lng_edges, lat_edges, cells)
}

#[cfg(test)]
mod tests {
    use school_map_geometry::{Crs, Geom};

    use super::*;

    fn school(school_type: &str, wkt: Option<&str>) -> SchoolRecord {
        SchoolRecord {
            name: None,
            school_type: school_type.to_string(),
            geometry: wkt.map(|w| Geom::from_wkt(w).unwrap()),
            attributes: BTreeMap::new(),
        }
    }

    fn sample() -> Dataset<SchoolRecord> {
        Dataset::new(
            Crs::Epsg4326,
            vec![
                school("Charter", Some("POINT (-87.61 41.88)")),
                school("Charter", Some("POINT (-87.62 41.89)")),
                school("Charter", Some("POINT (-87.63 41.90)")),
                school("Magnet", Some("POINT (-87.70 41.95)")),
                school("Magnet", Some("POINT (-87.71 41.96)")),
            ],
        )
    }

    fn selection(types: &[&str]) -> BTreeSet<String> {
        types.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn observed_types_are_distinct_and_sorted() {
        let types = observed_types(&sample());
        let listed: Vec<&str> = types.iter().map(String::as_str).collect();
        assert_eq!(listed, vec!["Charter", "Magnet"]);
    }

    #[test]
    fn filter_keeps_only_selected_types() {
        let filtered = filter_by_type(&sample(), &selection(&["Charter"]));
        assert_eq!(filtered.len(), 3);
        assert!(filtered.iter().all(|r| r.school_type == "Charter"));
    }

    #[test]
    fn empty_selection_yields_empty_dataset() {
        let filtered = filter_by_type(&sample(), &BTreeSet::new());
        assert!(filtered.is_empty());
        let binned = bin_counts(&flatten_coordinates(&filtered), MAX_BINS);
        assert!(binned.cells().is_empty());
        assert_eq!(binned.total(), 0);
    }

    #[test]
    fn bucket_counts_sum_to_filtered_record_count() {
        // 3 charter + 2 magnet schools; selecting only Charter must
        // leave buckets summing to 3.
        let filtered = filter_by_type(&sample(), &selection(&["Charter"]));
        let binned = bin_counts(&flatten_coordinates(&filtered), MAX_BINS);
        assert_eq!(binned.total(), 3);
    }

    #[test]
    fn flattening_skips_records_without_points() {
        let dataset = Dataset::new(
            Crs::Epsg4326,
            vec![
                school("Charter", Some("POINT (-87.61 41.88)")),
                school("Charter", None),
            ],
        );
        assert_eq!(flatten_coordinates(&dataset).len(), 1);
    }

    #[test]
    fn single_point_collapses_to_one_cell() {
        let binned = bin_counts(&[(-87.6, 41.9)], MAX_BINS);
        assert_eq!(binned.cells().len(), 1);
        assert_eq!(binned.total(), 1);
        assert_eq!(binned.cells().get(&(0, 0)), Some(&1));
    }

    #[test]
    fn points_spread_across_cells() {
        let points: Vec<(f64, f64)> = (0..10).map(|i| (f64::from(i), f64::from(i))).collect();
        let binned = bin_counts(&points, MAX_BINS);
        assert_eq!(binned.total(), 10);
        // Distinct coordinates over a real range occupy distinct cells.
        assert!(binned.cells().len() > 1);
    }

    #[test]
    fn zero_count_cells_are_omitted() {
        let binned = bin_counts(&[(0.0, 0.0), (10.0, 10.0)], 30);
        assert_eq!(binned.cells().len(), 2);
        assert!(binned.cells().values().all(|&count| count > 0));
    }
}

//! Beat area derivation.
//!
//! Geographic degrees are not area-comparable, so each beat polygon is
//! reprojected to Web Mercator (EPSG:3857) and its planar area taken in
//! square meters, then converted to square kilometers. The area is a
//! pure function of the geometry: recomputing it yields the same value.

use school_map_analytics_models::AreaReport;
use school_map_dataset_models::{Dataset, PoliceBeatRecord};
use school_map_geometry::{Crs, reproject};

/// Square meters per square kilometer.
const SQ_M_PER_SQ_KM: f64 = 1_000_000.0;

/// Returns a new dataset where every beat with reprojectable geometry
/// carries its derived area in square kilometers.
///
/// Beats whose geometry fails to reproject are skipped and reported,
/// keeping `area_sq_km = None` — never a silent zero. Beats without
/// geometry are left for the validator and only counted.
#[must_use]
pub fn compute_areas(
    beats: &Dataset<PoliceBeatRecord>,
) -> (Dataset<PoliceBeatRecord>, AreaReport) {
    let mut records = Vec::with_capacity(beats.len());
    let mut report = AreaReport {
        computed: 0,
        skipped: Vec::new(),
        missing_geometry: 0,
    };

    for record in beats {
        let mut record = record.clone();

        match &record.geometry {
            None => report.missing_geometry += 1,
            Some(geometry) => match reproject(geometry, beats.crs(), Crs::Epsg3857) {
                Ok(projected) => {
                    record.area_sq_km = Some(projected.area() / SQ_M_PER_SQ_KM);
                    report.computed += 1;
                }
                Err(e) => {
                    log::warn!("Skipping beat {}: {e}", record.beat);
                    report.skipped.push(record.beat.clone());
                }
            },
        }

        records.push(record);
    }

    log::info!(
        "Computed areas for {} beats ({} skipped, {} without geometry)",
        report.computed,
        report.skipped.len(),
        report.missing_geometry
    );

    (Dataset::new(beats.crs(), records), report)
}

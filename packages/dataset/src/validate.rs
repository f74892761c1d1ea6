//! Geometry validation.
//!
//! Drops records whose geometry is missing or empty before they reach
//! the map seam. Never fails; it only narrows toward empty output.

use school_map_dataset_models::{Dataset, HasGeometry};

/// Returns a new dataset containing only records with non-null,
/// non-empty geometry.
///
/// Never increases the record count, never reorders survivors, and
/// never mutates retained records.
#[must_use]
pub fn retain_valid<R: HasGeometry + Clone>(dataset: &Dataset<R>) -> Dataset<R> {
    let kept: Vec<R> = dataset
        .iter()
        .filter(|record| record.geometry().is_some_and(|g| !g.is_empty()))
        .cloned()
        .collect();

    let dropped = dataset.len() - kept.len();
    if dropped > 0 {
        log::debug!("Dropped {dropped} records with missing or empty geometry");
    }

    Dataset::new(dataset.crs(), kept)
}

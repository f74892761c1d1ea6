//! The full dashboard data pipeline, run once per invocation.
//!
//! Load → {type filter + density binning, beat area} → validate →
//! adapt. Every stage is a pure transform over immutable datasets;
//! load and projection failures abort with a structured error, while
//! empty selections flow through as valid empty output.

use std::collections::BTreeSet;
use std::path::Path;

use school_map_analytics::{beats, schools};
use school_map_analytics_models::AreaReport;
use school_map_dataset::{LoadError, loader, validate};
use school_map_presentation::{BeatAreaRow, HeatmapRow, LayerSelection, MapPayload};
use serde::Serialize;

/// Source link for the police beat boundaries dataset.
pub const POLICE_BEATS_CITATION: &str =
    "https://data.cityofchicago.org/Public-Safety/Boundaries-Police-Beats-current-/aerh-rz74";

/// Source link for the CPS school locations dataset.
pub const SCHOOL_LOCATIONS_CITATION: &str =
    "https://data.cityofchicago.org/Education/Chicago-Public-Schools-School-Locations-SY1415/3fhj-xtn5";

/// Citation links included with every payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Citations {
    /// School locations dataset source.
    pub schools: &'static str,
    /// Police beats dataset source.
    pub police_beats: &'static str,
}

/// Everything the dashboard's renderers consume for one render pass.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardPayload {
    /// Rows for the school density heatmap.
    pub heatmap: Vec<HeatmapRow>,
    /// Rows for the beat-size bar chart, descending by area.
    pub beat_areas: Vec<BeatAreaRow>,
    /// Markers and boundary shapes for the interactive map.
    pub map: MapPayload,
    /// Outcome of the beat area computation, including skipped beats.
    pub area_report: AreaReport,
    /// Dataset source links.
    pub citations: Citations,
}

/// Runs the whole pipeline against the two raw tables.
///
/// `selected_types = None` means the default selection: every school
/// type observed in the data. `Some` with an empty set is a valid
/// empty selection and produces empty chart input.
///
/// # Errors
///
/// Returns [`LoadError`] if either table cannot be loaded.
pub fn run(
    schools_path: &Path,
    beats_path: &Path,
    selected_types: Option<BTreeSet<String>>,
    layer: LayerSelection,
) -> Result<DashboardPayload, LoadError> {
    let raw_schools = loader::load_schools(schools_path)?;
    let raw_beats = loader::load_beats(beats_path)?;

    let selected = selected_types.unwrap_or_else(|| schools::observed_types(&raw_schools));
    let filtered = schools::filter_by_type(&raw_schools, &selected);
    let flattened = schools::flatten_coordinates(&filtered);
    let binned = schools::bin_counts(&flattened, schools::MAX_BINS);

    let (beats_with_areas, area_report) = beats::compute_areas(&raw_beats);

    let valid_schools = validate::retain_valid(&filtered);
    let valid_beats = validate::retain_valid(&beats_with_areas);

    log::info!(
        "Pipeline: {} schools in heatmap, {} beats in chart, layer '{layer}'",
        binned.total(),
        valid_beats.len()
    );

    Ok(DashboardPayload {
        heatmap: school_map_presentation::heatmap_rows(&binned),
        beat_areas: school_map_presentation::beat_area_rows(&valid_beats),
        map: school_map_presentation::map_payload(&valid_schools, &valid_beats, layer),
        area_report,
        citations: Citations {
            schools: SCHOOL_LOCATIONS_CITATION,
            police_beats: POLICE_BEATS_CITATION,
        },
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;
    use std::path::PathBuf;

    use super::*;

    fn temp_csv(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("school_map_cli_{}_{name}", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    fn sample_inputs(tag: &str) -> (PathBuf, PathBuf) {
        let schools = temp_csv(
            &format!("{tag}_schools.csv"),
            "the_geom,SCHOOL_NM,SCH_TYPE\n\
             POINT (-87.61 41.88),A,Charter\n\
             POINT (-87.62 41.89),B,Charter\n\
             POINT (-87.63 41.90),C,Charter\n\
             POINT (-87.70 41.95),D,Magnet\n\
             POINT (-87.71 41.96),E,Magnet\n",
        );
        let beats = temp_csv(
            &format!("{tag}_beats.csv"),
            "the_geom,BEAT\n\
             \"POLYGON ((-87.7 41.8, -87.6 41.8, -87.6 41.9, -87.7 41.9, -87.7 41.8))\",0111\n\
             \"POLYGON ((-87.8 41.8, -87.7 41.8, -87.7 41.85, -87.8 41.85, -87.8 41.8))\",0112\n",
        );
        (schools, beats)
    }

    fn cleanup(paths: &(PathBuf, PathBuf)) {
        std::fs::remove_file(&paths.0).ok();
        std::fs::remove_file(&paths.1).ok();
    }

    #[test]
    fn default_selection_covers_all_schools() {
        let paths = sample_inputs("default");
        let payload = run(&paths.0, &paths.1, None, LayerSelection::default()).unwrap();
        cleanup(&paths);

        let total: u64 = payload.heatmap.iter().map(|r| r.count).sum();
        assert_eq!(total, 5);
        assert_eq!(payload.map.markers.len(), 5);
        assert!(payload.map.shapes.is_empty());
    }

    #[test]
    fn type_filter_narrows_the_heatmap() {
        let paths = sample_inputs("filtered");
        let selected: BTreeSet<String> = ["Charter".to_string()].into_iter().collect();
        let payload = run(&paths.0, &paths.1, Some(selected), LayerSelection::default()).unwrap();
        cleanup(&paths);

        let total: u64 = payload.heatmap.iter().map(|r| r.count).sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn empty_selection_is_a_successful_empty_result() {
        let paths = sample_inputs("empty_sel");
        let payload = run(&paths.0, &paths.1, Some(BTreeSet::new()), LayerSelection::default())
            .unwrap();
        cleanup(&paths);

        assert!(payload.heatmap.is_empty());
        assert!(payload.map.markers.is_empty());
        // The beat side of the pipeline is unaffected.
        assert_eq!(payload.beat_areas.len(), 2);
    }

    #[test]
    fn both_layer_emits_markers_and_shapes() {
        let paths = sample_inputs("both");
        let payload = run(&paths.0, &paths.1, None, LayerSelection::Both).unwrap();
        cleanup(&paths);

        assert_eq!(payload.map.markers.len(), 5);
        assert_eq!(payload.map.shapes.len(), 2);
    }

    #[test]
    fn beats_only_layer_emits_no_markers() {
        let paths = sample_inputs("beats_only");
        let payload = run(&paths.0, &paths.1, None, LayerSelection::PoliceBeats).unwrap();
        cleanup(&paths);

        assert!(payload.map.markers.is_empty());
        assert_eq!(payload.map.shapes.len(), 2);
    }

    #[test]
    fn beat_areas_arrive_sorted_descending() {
        let paths = sample_inputs("sorted");
        let payload = run(&paths.0, &paths.1, None, LayerSelection::default()).unwrap();
        cleanup(&paths);

        assert_eq!(payload.beat_areas.len(), 2);
        assert!(payload.beat_areas[0].area_sq_km >= payload.beat_areas[1].area_sq_km);
        // The 0.1 x 0.1 degree beat is the larger one.
        assert_eq!(payload.beat_areas[0].beat, "0111");
        assert_eq!(payload.area_report.computed, 2);
    }

    #[test]
    fn missing_input_file_aborts_the_pipeline() {
        let paths = sample_inputs("missing");
        let bogus = PathBuf::from("/nonexistent/beats.csv");
        let result = run(&paths.0, &bogus, None, LayerSelection::default());
        cleanup(&paths);

        assert!(result.is_err());
    }
}

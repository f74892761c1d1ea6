#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Presentation adapter: the seam between the data model and the
//! external chart/map renderers.
//!
//! Performs no computation beyond selection and shape adaptation. The
//! heatmap consumer gets `(longitude-bin, latitude-bin, count)` rows,
//! the bar-chart consumer gets `(beat, area)` rows sorted descending
//! (a rendering hint, not a data-model invariant), and the map
//! consumer gets point markers and `GeoJSON` boundary shapes gated by
//! the layer selection. Never fails; it only narrows toward empty
//! output.

use school_map_analytics_models::BinnedCounts;
use school_map_dataset_models::{Dataset, PoliceBeatRecord, SchoolRecord};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Which map layers to adapt, driven by the UI shell's selection.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum LayerSelection {
    /// School point markers only.
    #[default]
    SchoolLocations,
    /// Police beat boundary shapes only.
    PoliceBeats,
    /// Both layers.
    Both,
}

impl LayerSelection {
    /// Whether school markers are emitted.
    #[must_use]
    pub const fn includes_schools(self) -> bool {
        matches!(self, Self::SchoolLocations | Self::Both)
    }

    /// Whether beat boundary shapes are emitted.
    #[must_use]
    pub const fn includes_beats(self) -> bool {
        matches!(self, Self::PoliceBeats | Self::Both)
    }
}

/// One populated cell of the school density grid, with the coordinate
/// intervals the cell covers. No geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapRow {
    /// Longitude bin index.
    pub lng_bin: usize,
    /// Latitude bin index.
    pub lat_bin: usize,
    /// Start of the longitude interval.
    pub lng_start: f64,
    /// End of the longitude interval.
    pub lng_end: f64,
    /// Start of the latitude interval.
    pub lat_start: f64,
    /// End of the latitude interval.
    pub lat_end: f64,
    /// Number of schools in the cell.
    pub count: u64,
}

/// One bar of the beat-size chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeatAreaRow {
    /// Beat identifier.
    pub beat: String,
    /// Derived area in square kilometers.
    pub area_sq_km: f64,
}

/// A school point marker for the map consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolMarker {
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Popup label: the school name, or "Unknown".
    pub label: String,
}

/// A beat boundary shape for the map consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeatShape {
    /// Boundary geometry as `GeoJSON`.
    pub geometry: geojson::Geometry,
    /// Tooltip field: the beat identifier.
    pub tooltip: String,
}

/// Everything the map consumer needs for one render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapPayload {
    /// School markers; empty unless the selection includes schools.
    pub markers: Vec<SchoolMarker>,
    /// Beat boundary shapes; empty unless the selection includes beats.
    pub shapes: Vec<BeatShape>,
}

/// Adapts the density grid into heatmap rows, one per populated cell.
#[must_use]
pub fn heatmap_rows(binned: &BinnedCounts) -> Vec<HeatmapRow> {
    binned
        .cells()
        .iter()
        .map(|(&(lng_bin, lat_bin), &count)| {
            let (lng_start, lng_end) = binned.lng_edges().interval(lng_bin);
            let (lat_start, lat_end) = binned.lat_edges().interval(lat_bin);
            HeatmapRow {
                lng_bin,
                lat_bin,
                lng_start,
                lng_end,
                lat_start,
                lat_end,
                count,
            }
        })
        .collect()
}

/// Adapts beats with computed areas into bar-chart rows, sorted by
/// descending area for display.
///
/// Beats whose area was never computed (missing or unprojectable
/// geometry) are omitted rather than shown as zero-size bars.
#[must_use]
pub fn beat_area_rows(beats: &Dataset<PoliceBeatRecord>) -> Vec<BeatAreaRow> {
    let mut rows: Vec<BeatAreaRow> = beats
        .iter()
        .filter_map(|record| {
            record.area_sq_km.map(|area_sq_km| BeatAreaRow {
                beat: record.beat.clone(),
                area_sq_km,
            })
        })
        .collect();

    rows.sort_by(|a, b| b.area_sq_km.total_cmp(&a.area_sq_km));
    rows
}

/// Adapts the validated datasets into the map payload, gated by the
/// layer selection.
#[must_use]
pub fn map_payload(
    schools: &Dataset<SchoolRecord>,
    beats: &Dataset<PoliceBeatRecord>,
    layer: LayerSelection,
) -> MapPayload {
    let markers = if layer.includes_schools() {
        schools
            .iter()
            .filter_map(|record| {
                let (longitude, latitude) = record.geometry.as_ref()?.as_point()?;
                Some(SchoolMarker {
                    longitude,
                    latitude,
                    label: record.name.clone().unwrap_or_else(|| "Unknown".to_string()),
                })
            })
            .collect()
    } else {
        Vec::new()
    };

    let shapes = if layer.includes_beats() {
        beats
            .iter()
            .filter_map(|record| {
                let geometry = record.geometry.as_ref()?;
                Some(BeatShape {
                    geometry: geojson::Geometry::new(geojson::Value::from(geometry.as_geo())),
                    tooltip: record.beat.clone(),
                })
            })
            .collect()
    } else {
        Vec::new()
    };

    MapPayload { markers, shapes }
}

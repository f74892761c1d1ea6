#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Opaque geometry capability for the school-map pipeline.
//!
//! Wraps `geo` geometry behind a small surface: WKT parsing, emptiness
//! and bounding-box queries, point coordinate access, Web-Mercator
//! reprojection, and planar area. Downstream crates never touch raw
//! coordinate math; everything spatial goes through [`Geom`].

use geo::{Area, BoundingRect, HasDimensions, MapCoords};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use wkt::{ToWkt as _, TryFromWkt as _};

/// Errors that can occur during geometry operations.
#[derive(Debug, thiserror::Error)]
pub enum GeometryError {
    /// Well-known-text could not be parsed into a geometry.
    #[error("WKT parse error: {message}")]
    Parse {
        /// Description of what went wrong.
        message: String,
    },

    /// Geometry could not be reprojected into the target CRS.
    #[error("Projection error: {message}")]
    Projection {
        /// Description of what went wrong.
        message: String,
    },
}

/// Coordinate reference system tag.
///
/// Both raw datasets are geographic WGS84 (EPSG:4326). Beat polygons
/// are additionally reprojected to Web Mercator (EPSG:3857) solely for
/// area computation, since geographic degrees are not area-comparable.
#[derive(
    Debug,
    Clone,
    Copy,
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
pub enum Crs {
    /// Geographic WGS84, coordinates in degrees.
    #[strum(serialize = "EPSG:4326")]
    #[serde(rename = "EPSG:4326")]
    Epsg4326,
    /// Spherical Web Mercator, coordinates in meters.
    #[strum(serialize = "EPSG:3857")]
    #[serde(rename = "EPSG:3857")]
    Epsg3857,
}

/// A parsed geometry (point, polygon, or multi-polygon).
///
/// Immutable after construction; every transforming operation returns
/// a new value.
#[derive(Debug, Clone, PartialEq)]
pub struct Geom(geo::Geometry<f64>);

impl Geom {
    /// Parses a well-known-text string into a geometry.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Parse`] if the text is not valid WKT.
    pub fn from_wkt(text: &str) -> Result<Self, GeometryError> {
        geo::Geometry::try_from_wkt_str(text)
            .map(Self)
            .map_err(|e| GeometryError::Parse {
                message: e.to_string(),
            })
    }

    /// Serializes this geometry back to well-known-text.
    #[must_use]
    pub fn to_wkt(&self) -> String {
        self.0.wkt_string()
    }

    /// Whether this geometry contains no coordinates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `(longitude, latitude)` if this geometry is a single point.
    #[must_use]
    pub fn as_point(&self) -> Option<(f64, f64)> {
        match &self.0 {
            geo::Geometry::Point(p) => Some((p.x(), p.y())),
            _ => None,
        }
    }

    /// Axis-aligned bounding box as `(min_x, min_y, max_x, max_y)`, or
    /// `None` for an empty geometry.
    #[must_use]
    pub fn bounding_box(&self) -> Option<(f64, f64, f64, f64)> {
        self.0
            .bounding_rect()
            .map(|rect| (rect.min().x, rect.min().y, rect.max().x, rect.max().y))
    }

    /// Unsigned planar area in the square units of this geometry's CRS.
    ///
    /// Only meaningful for planar coordinates; callers reproject to
    /// [`Crs::Epsg3857`] first.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.0.unsigned_area()
    }

    /// Access to the underlying `geo` geometry for boundary conversions
    /// (e.g. `GeoJSON` shaping at the renderer seam).
    #[must_use]
    pub const fn as_geo(&self) -> &geo::Geometry<f64> {
        &self.0
    }
}

/// Earth radius used by the spherical Web Mercator projection, meters.
const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Reprojects a geometry from `from` to `to`, returning a new geometry.
///
/// Supports the identity transform and geographic → Web Mercator
/// (EPSG:4326 → EPSG:3857), which is all the pipeline needs.
///
/// # Errors
///
/// Returns [`GeometryError::Projection`] if the transform is
/// unsupported or any coordinate cannot be projected (latitude at or
/// beyond the poles, non-finite values).
pub fn reproject(geom: &Geom, from: Crs, to: Crs) -> Result<Geom, GeometryError> {
    match (from, to) {
        (Crs::Epsg4326, Crs::Epsg3857) => geom
            .0
            .try_map_coords(project_web_mercator)
            .map(Geom),
        (a, b) if a == b => Ok(geom.clone()),
        (a, b) => Err(GeometryError::Projection {
            message: format!("unsupported transform {a} -> {b}"),
        }),
    }
}

/// Spherical Web Mercator forward transform for one coordinate.
fn project_web_mercator(coord: geo::Coord<f64>) -> Result<geo::Coord<f64>, GeometryError> {
    if !coord.x.is_finite() || !coord.y.is_finite() || coord.y.abs() >= 90.0 {
        return Err(GeometryError::Projection {
            message: format!("coordinate ({}, {}) is outside the Mercator domain", coord.x, coord.y),
        });
    }

    let x = EARTH_RADIUS_M * coord.x.to_radians();
    let y = EARTH_RADIUS_M
        * (std::f64::consts::FRAC_PI_4 + coord.y.to_radians() / 2.0)
            .tan()
            .ln();

    if !x.is_finite() || !y.is_finite() {
        return Err(GeometryError::Projection {
            message: format!("coordinate ({}, {}) projected to a non-finite value", coord.x, coord.y),
        });
    }

    Ok(geo::Coord { x, y })
}

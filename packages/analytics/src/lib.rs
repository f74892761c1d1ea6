#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregation stages of the school-map pipeline.
//!
//! [`schools`] filters by school type, flattens point coordinates, and
//! buckets them into the density grid. [`beats`] derives each beat's
//! area from a Web-Mercator reprojection. Both stages are pure,
//! synchronous transforms re-run in full on every selection change.

pub mod beats;
pub mod schools;

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Scoring engine for area comparison.
//!
//! Pure, synchronous calculators over an immutable [`AreaContext`] snapshot:
//! the POI metrics calculator ([`poi`]) and the derived index calculator
//! ([`derived`]). Both degrade gracefully on missing or zero data; "no data"
//! is reported through the confidence grade, never through an error channel.
//! Re-invocation with identical inputs produces identical outputs (only the
//! capture timestamp differs).
//!
//! [`AreaContext`]: area_compare_metrics_models::AreaContext

pub mod derived;
pub mod geometry;
pub mod poi;

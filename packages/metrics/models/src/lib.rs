#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Core data model for the area metrics scoring engine.
//!
//! Defines the layer/area input snapshot consumed by the calculators, the
//! metric output types handed to UI panels and exporters, and the static
//! reference table describing each derived metric. Everything here is plain
//! data with no computation beyond label bucketing.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use geo::MultiPolygon;
use serde::{Deserialize, Serialize};

pub mod definitions;

pub use definitions::{DerivedMetricDefinition, InterpretationThresholds, definition, definitions};

/// Identifier for one fetched-and-clipped map data layer.
///
/// This is the documented closed set of layer ids the engine knows about.
/// Callers hold heterogeneous per-layer data keyed by string id; ids outside
/// this set are ignored at [`LayerId::from_id`] time, never treated as errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayerId {
    /// Restaurants, bars, and other food & drink POIs.
    PoiFoodDrink,
    /// Cafes and coffee shops.
    PoiCafes,
    /// General retail POIs.
    PoiShopping,
    /// Supermarkets and grocery stores.
    PoiGrocery,
    /// Clinics, pharmacies, hospitals.
    PoiHealth,
    /// Schools, kindergartens, universities.
    PoiEducation,
    /// Bicycle parking POIs.
    PoiBikeParking,
    /// Bicycle shops and repair POIs.
    PoiBikeShops,
    /// Bus and tram stops.
    TransitStops,
    /// Rail and metro stations.
    TransitStations,
    /// Park and recreation ground polygons.
    LeisureParks,
    /// Water body polygons.
    NaturalWater,
    /// Residential building footprints.
    BuildingsResidential,
    /// Commercial building footprints.
    BuildingsCommercial,
    /// Industrial building footprints.
    BuildingsIndustrial,
    /// Building footprints with no recognized use tag.
    BuildingsOther,
    /// Road centerlines.
    Roads,
    /// Dedicated cycleway centerlines.
    BikeLanes,
}

impl LayerId {
    /// All known layer ids.
    pub const ALL: &[Self] = &[
        Self::PoiFoodDrink,
        Self::PoiCafes,
        Self::PoiShopping,
        Self::PoiGrocery,
        Self::PoiHealth,
        Self::PoiEducation,
        Self::PoiBikeParking,
        Self::PoiBikeShops,
        Self::TransitStops,
        Self::TransitStations,
        Self::LeisureParks,
        Self::NaturalWater,
        Self::BuildingsResidential,
        Self::BuildingsCommercial,
        Self::BuildingsIndustrial,
        Self::BuildingsOther,
        Self::Roads,
        Self::BikeLanes,
    ];

    /// The wire/string form of this id (e.g. `"poi-food-drink"`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PoiFoodDrink => "poi-food-drink",
            Self::PoiCafes => "poi-cafes",
            Self::PoiShopping => "poi-shopping",
            Self::PoiGrocery => "poi-grocery",
            Self::PoiHealth => "poi-health",
            Self::PoiEducation => "poi-education",
            Self::PoiBikeParking => "poi-bike-parking",
            Self::PoiBikeShops => "poi-bike-shops",
            Self::TransitStops => "transit-stops",
            Self::TransitStations => "transit-stations",
            Self::LeisureParks => "leisure-parks",
            Self::NaturalWater => "natural-water",
            Self::BuildingsResidential => "buildings-residential",
            Self::BuildingsCommercial => "buildings-commercial",
            Self::BuildingsIndustrial => "buildings-industrial",
            Self::BuildingsOther => "buildings-other",
            Self::Roads => "roads",
            Self::BikeLanes => "bike-lanes",
        }
    }

    /// Resolves a string layer id to a known [`LayerId`].
    ///
    /// Returns `None` for ids outside the documented set so that callers can
    /// skip unknown layers without failing.
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|l| l.as_str() == id)
    }
}

impl std::fmt::Display for LayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Precomputed scalar statistics for one layer clipped to the area of
/// interest. Produced by the external fetch/clip stage; read-only here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerStats {
    /// Number of features in the clipped collection.
    pub feature_count: u64,
    /// Sum of polygon feature areas in square meters.
    pub total_area_m2: f64,
    /// Sum of line feature lengths in meters.
    pub total_length_m: f64,
}

impl LayerStats {
    /// `true` if the layer carries any observed data at all.
    #[must_use]
    pub fn has_data(&self) -> bool {
        self.feature_count > 0 || self.total_area_m2 > 0.0 || self.total_length_m > 0.0
    }
}

/// Immutable input snapshot for one drawn area: its size, geometry, and
/// per-layer statistics. Every calculator call receives its own snapshot
/// and never mutates it, so calls for different areas are safe to run in
/// parallel.
#[derive(Debug, Clone)]
pub struct AreaContext {
    /// Area of interest in square kilometers. `0` is tolerated; divisions
    /// by it are guarded in the calculators.
    pub area_km2: f64,
    /// Area geometry (WGS84 lon/lat, closed rings).
    pub polygon: MultiPolygon<f64>,
    /// Per-layer statistics. Absent layer means no data, never an error.
    pub layers: BTreeMap<LayerId, LayerStats>,
}

impl AreaContext {
    /// Creates a snapshot from already-fetched layer statistics.
    #[must_use]
    pub const fn new(
        area_km2: f64,
        polygon: MultiPolygon<f64>,
        layers: BTreeMap<LayerId, LayerStats>,
    ) -> Self {
        Self {
            area_km2,
            polygon,
            layers,
        }
    }

    /// Feature count for a layer, `0` if absent.
    #[must_use]
    pub fn count(&self, id: LayerId) -> u64 {
        self.layers.get(&id).map_or(0, |s| s.feature_count)
    }

    /// Total polygon area in m² for a layer, `0` if absent.
    #[must_use]
    pub fn area_m2(&self, id: LayerId) -> f64 {
        self.layers.get(&id).map_or(0.0, |s| s.total_area_m2)
    }

    /// Total line length in meters for a layer, `0` if absent.
    #[must_use]
    pub fn length_m(&self, id: LayerId) -> f64 {
        self.layers.get(&id).map_or(0.0, |s| s.total_length_m)
    }

    /// `true` if the layer is present and carries any data.
    #[must_use]
    pub fn has_data(&self, id: LayerId) -> bool {
        self.layers.get(&id).is_some_and(LayerStats::has_data)
    }

    /// Summed feature count across several layers.
    #[must_use]
    pub fn count_across(&self, ids: &[LayerId]) -> u64 {
        ids.iter().map(|&id| self.count(id)).sum()
    }

    /// Summed polygon area in m² across several layers.
    #[must_use]
    pub fn area_m2_across(&self, ids: &[LayerId]) -> f64 {
        ids.iter().map(|&id| self.area_m2(id)).sum()
    }
}

/// The fixed semantic categories the POI metrics calculator reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PoiCategory {
    /// Restaurants, bars, cafes.
    Food,
    /// Retail.
    Shopping,
    /// Supermarkets and groceries.
    Grocery,
    /// Healthcare amenities.
    Health,
    /// Schools and universities.
    Education,
    /// Bike parking and bike shops.
    Bike,
    /// Public transport stops and stations.
    Transit,
    /// Parks and green space.
    Green,
}

impl PoiCategory {
    /// All categories, in the order they are reported.
    pub const ALL: &[Self] = &[
        Self::Food,
        Self::Shopping,
        Self::Grocery,
        Self::Health,
        Self::Education,
        Self::Bike,
        Self::Transit,
        Self::Green,
    ];

    /// Human-readable category name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Food => "Food & Drink",
            Self::Shopping => "Shopping",
            Self::Grocery => "Groceries",
            Self::Health => "Healthcare",
            Self::Education => "Education",
            Self::Bike => "Cycling",
            Self::Transit => "Public Transit",
            Self::Green => "Green Space",
        }
    }

    /// Display color (hex) used by chart renderers.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Food => "#e8590c",
            Self::Shopping => "#9c36b5",
            Self::Grocery => "#f08c00",
            Self::Health => "#e03131",
            Self::Education => "#1971c2",
            Self::Bike => "#0c8599",
            Self::Transit => "#5f3dc4",
            Self::Green => "#2f9e44",
        }
    }

    /// The layers whose feature counts roll up into this category.
    #[must_use]
    pub const fn layers(self) -> &'static [LayerId] {
        match self {
            Self::Food => &[LayerId::PoiFoodDrink, LayerId::PoiCafes],
            Self::Shopping => &[LayerId::PoiShopping],
            Self::Grocery => &[LayerId::PoiGrocery],
            Self::Health => &[LayerId::PoiHealth],
            Self::Education => &[LayerId::PoiEducation],
            Self::Bike => &[LayerId::PoiBikeParking, LayerId::PoiBikeShops],
            Self::Transit => &[LayerId::TransitStops, LayerId::TransitStations],
            Self::Green => &[LayerId::LeisureParks],
        }
    }
}

/// Per-category slice of the POI breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryMetric {
    /// Category id.
    pub id: PoiCategory,
    /// Human-readable category name.
    pub name: String,
    /// Feature count in this category.
    pub count: u64,
    /// Features per km² (`0` when the area size is `0`).
    pub density: f64,
    /// Share of the total count, in percent. Shares sum to 100 whenever the
    /// total count is positive, otherwise they are all `0`.
    pub share: f64,
    /// Display color (hex).
    pub color: String,
}

/// Complete POI metrics for one area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoiMetrics {
    /// Total POI count across all categories.
    pub total_count: u64,
    /// POIs per km².
    pub density: f64,
    /// Shannon diversity index over category counts (`≥ 0`).
    pub diversity_index: f64,
    /// Fixed-threshold label for the diversity index.
    pub diversity_label: String,
    /// Per-category breakdown, in [`PoiCategory::ALL`] order.
    pub category_breakdown: Vec<CategoryMetric>,
    /// Percentage of categories with any observed data, `[0, 100]`.
    pub coverage_score: f64,
    /// Fixed-threshold label for the coverage score.
    pub coverage_label: String,
    /// Area size the densities were computed against.
    pub area_km2: f64,
    /// Capture time of this snapshot. Excluded from equality in tests.
    pub computed_at: DateTime<Utc>,
}

/// How much of a metric's required input layers had observed data.
///
/// This is a reproducible function of data completeness, not statistical
/// certainty: "no data" is communicated here rather than via an error.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// Most required layers were empty.
    #[default]
    Low,
    /// Some required layers had data.
    Medium,
    /// Most or all required layers had data.
    High,
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// Identifier for one derived urban metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MetricId {
    /// Normalized Shannon diversity over point-feature layers.
    Diversity,
    /// Parks + water share of the area.
    GreenRatio,
    /// Building footprint share of the area.
    BuildingDensity,
    /// Mode-weighted transit stop density proxy.
    TransitScore,
    /// Residential/commercial balance.
    MixedUse,
    /// Amenity-density walkability proxy.
    Walkability,
    /// Essential-category presence score.
    FifteenMinute,
    /// Bike infrastructure/amenity/connectivity composite.
    BikeScore,
    /// Estimated intersection density.
    StreetConnectivity,
}

impl MetricId {
    /// All derived metrics, in the order they are reported.
    pub const ALL: &[Self] = &[
        Self::Diversity,
        Self::GreenRatio,
        Self::BuildingDensity,
        Self::TransitScore,
        Self::MixedUse,
        Self::Walkability,
        Self::FifteenMinute,
        Self::BikeScore,
        Self::StreetConnectivity,
    ];

    /// The wire/string form of this id (e.g. `"transit-score"`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Diversity => "diversity",
            Self::GreenRatio => "green-ratio",
            Self::BuildingDensity => "building-density",
            Self::TransitScore => "transit-score",
            Self::MixedUse => "mixed-use",
            Self::Walkability => "walkability",
            Self::FifteenMinute => "fifteen-minute",
            Self::BikeScore => "bike-score",
            Self::StreetConnectivity => "street-connectivity",
        }
    }
}

impl std::fmt::Display for MetricId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One computed derived metric: the normalized value, a confidence grade,
/// and the named intermediate quantities that fed it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedMetricValue {
    /// Which metric this is.
    pub metric_id: MetricId,
    /// Metric value, clamped to `[0, 100]`.
    pub value: f64,
    /// Data-completeness grade for the required layers.
    pub confidence: Confidence,
    /// Named intermediate quantities retained for auditability and tooltip
    /// display. Always includes every weighted sub-component of the value.
    pub breakdown: BTreeMap<String, f64>,
}

/// An externally produced index imported from a delimited text file.
///
/// Lives alongside, never merged into, the computed metrics. Created once
/// at import time and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalIndex {
    /// Stable identifier assigned at import time.
    pub id: String,
    /// Human-readable index name.
    pub name: String,
    /// Where the data came from (file name, provider, ...).
    pub source: String,
    /// Values keyed by area name, `"row-N"`, or `"lat,lon"` rounded to six
    /// decimals. Non-empty; import fails otherwise.
    pub values: BTreeMap<String, f64>,
    /// Smallest imported value.
    pub min: f64,
    /// Largest imported value.
    pub max: f64,
    /// Optional unit label for display.
    pub unit: Option<String>,
    /// Import time.
    pub imported_at: DateTime<Utc>,
}

/// Fixed-threshold label for a Shannon diversity index.
#[must_use]
pub fn diversity_label(h: f64) -> &'static str {
    if h >= 2.0 {
        "very diverse"
    } else if h >= 1.5 {
        "diverse"
    } else if h >= 1.0 {
        "moderately diverse"
    } else if h >= 0.5 {
        "limited"
    } else {
        "low diversity"
    }
}

/// Fixed-threshold label for a coverage score in `[0, 100]`.
#[must_use]
pub fn coverage_label(score: f64) -> &'static str {
    if score >= 87.5 {
        "excellent"
    } else if score >= 62.5 {
        "good"
    } else if score >= 37.5 {
        "partial"
    } else if score > 0.0 {
        "sparse"
    } else {
        "no data"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_id_round_trips_through_string_form() {
        for &id in LayerId::ALL {
            assert_eq!(LayerId::from_id(id.as_str()), Some(id));
        }
    }

    #[test]
    fn unknown_layer_id_is_ignored() {
        assert_eq!(LayerId::from_id("poi-nightclubs"), None);
    }

    #[test]
    fn absent_layer_reads_as_zero() {
        let ctx = AreaContext::new(1.0, MultiPolygon(vec![]), BTreeMap::new());
        assert_eq!(ctx.count(LayerId::PoiGrocery), 0);
        assert!(ctx.area_m2(LayerId::LeisureParks).abs() < f64::EPSILON);
        assert!(!ctx.has_data(LayerId::Roads));
    }

    #[test]
    fn every_category_maps_to_known_layers() {
        for &cat in PoiCategory::ALL {
            assert!(!cat.layers().is_empty());
        }
    }

    #[test]
    fn diversity_labels_bucket_by_threshold() {
        assert_eq!(diversity_label(2.1), "very diverse");
        assert_eq!(diversity_label(1.5), "diverse");
        assert_eq!(diversity_label(1.2), "moderately diverse");
        assert_eq!(diversity_label(0.6), "limited");
        assert_eq!(diversity_label(0.0), "low diversity");
    }

    #[test]
    fn coverage_labels_bucket_by_threshold() {
        assert_eq!(coverage_label(100.0), "excellent");
        assert_eq!(coverage_label(75.0), "good");
        assert_eq!(coverage_label(50.0), "partial");
        assert_eq!(coverage_label(12.5), "sparse");
        assert_eq!(coverage_label(0.0), "no data");
    }

    #[test]
    fn confidence_orders_low_to_high() {
        assert!(Confidence::Low < Confidence::Medium);
        assert!(Confidence::Medium < Confidence::High);
    }
}

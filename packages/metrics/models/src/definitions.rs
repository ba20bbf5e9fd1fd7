//! Static reference table describing each derived metric.
//!
//! One definition per [`MetricId`]: display name, human-readable formula,
//! required layers, and the canonical interpretation thresholds. The table
//! is shared by the calculators and by callers rendering names/units/
//! interpretation text; it is never recomputed.

use serde::Serialize;

use crate::{LayerId, MetricId};

/// Boundaries between the interpretation buckets of a 0-100 metric value.
///
/// This is the single canonical threshold table per metric; the
/// interpretation label is always read from here so that definition and
/// lookup can never disagree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterpretationThresholds {
    /// Values below this read as "low".
    pub low: f64,
    /// Values below this (and at least `low`) read as "moderate".
    pub medium: f64,
    /// Values below this (and at least `medium`) read as "good";
    /// values at or above it read as "excellent".
    pub high: f64,
}

impl InterpretationThresholds {
    /// Bucket a metric value into its interpretation label.
    #[must_use]
    pub fn interpret(&self, value: f64) -> &'static str {
        if value < self.low {
            "low"
        } else if value < self.medium {
            "moderate"
        } else if value < self.high {
            "good"
        } else {
            "excellent"
        }
    }
}

/// Static description of one derived metric.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedMetricDefinition {
    /// Metric id.
    pub id: MetricId,
    /// Human-readable metric name.
    pub name: &'static str,
    /// Human-readable formula summary for tooltips.
    pub formula: &'static str,
    /// Layers this metric consumes. Confidence grading is a function of
    /// how many of these had observed data.
    pub required_layers: &'static [LayerId],
    /// Canonical interpretation thresholds.
    pub thresholds: InterpretationThresholds,
}

/// The ten point-feature layers the derived diversity index spreads
/// entropy over.
pub const DIVERSITY_LAYERS: &[LayerId] = &[
    LayerId::PoiFoodDrink,
    LayerId::PoiCafes,
    LayerId::PoiShopping,
    LayerId::PoiGrocery,
    LayerId::PoiHealth,
    LayerId::PoiEducation,
    LayerId::PoiBikeParking,
    LayerId::PoiBikeShops,
    LayerId::TransitStops,
    LayerId::TransitStations,
];

const DEFINITIONS: &[DerivedMetricDefinition] = &[
    DerivedMetricDefinition {
        id: MetricId::Diversity,
        name: "Amenity Diversity",
        formula: "Shannon entropy over point layers, normalized to max entropy",
        required_layers: DIVERSITY_LAYERS,
        thresholds: InterpretationThresholds {
            low: 25.0,
            medium: 50.0,
            high: 75.0,
        },
    },
    DerivedMetricDefinition {
        id: MetricId::GreenRatio,
        name: "Green Ratio",
        formula: "(park area + water area) / total area × 100",
        required_layers: &[LayerId::LeisureParks, LayerId::NaturalWater],
        thresholds: InterpretationThresholds {
            low: 10.0,
            medium: 25.0,
            high: 40.0,
        },
    },
    DerivedMetricDefinition {
        id: MetricId::BuildingDensity,
        name: "Building Density",
        formula: "building footprint area / total area × 100",
        required_layers: &[
            LayerId::BuildingsResidential,
            LayerId::BuildingsCommercial,
            LayerId::BuildingsIndustrial,
            LayerId::BuildingsOther,
        ],
        thresholds: InterpretationThresholds {
            low: 15.0,
            medium: 30.0,
            high: 50.0,
        },
    },
    DerivedMetricDefinition {
        id: MetricId::TransitScore,
        name: "Transit Score",
        formula: "log-normalized mode-weighted stop density (rail ×2, bus ×1)",
        required_layers: &[LayerId::TransitStations, LayerId::TransitStops],
        thresholds: InterpretationThresholds {
            low: 25.0,
            medium: 50.0,
            high: 75.0,
        },
    },
    DerivedMetricDefinition {
        id: MetricId::MixedUse,
        name: "Mixed-Use Score",
        formula: "1 − |residential share − commercial share| × 100",
        required_layers: &[LayerId::BuildingsResidential, LayerId::BuildingsCommercial],
        thresholds: InterpretationThresholds {
            low: 40.0,
            medium: 60.0,
            high: 80.0,
        },
    },
    DerivedMetricDefinition {
        id: MetricId::Walkability,
        name: "Walkability",
        formula: "weighted log-decay amenity densities (85%) + intersection bonus (15%)",
        required_layers: &[
            LayerId::PoiGrocery,
            LayerId::PoiFoodDrink,
            LayerId::PoiShopping,
            LayerId::PoiCafes,
            LayerId::LeisureParks,
            LayerId::PoiEducation,
            LayerId::PoiHealth,
            LayerId::Roads,
        ],
        thresholds: InterpretationThresholds {
            low: 25.0,
            medium: 50.0,
            high: 70.0,
        },
    },
    DerivedMetricDefinition {
        id: MetricId::FifteenMinute,
        name: "15-Minute City Score",
        formula: "essential category groups present / 5 × 100",
        required_layers: &[
            LayerId::PoiFoodDrink,
            LayerId::PoiGrocery,
            LayerId::PoiHealth,
            LayerId::PoiEducation,
            LayerId::LeisureParks,
            LayerId::TransitStops,
            LayerId::TransitStations,
        ],
        thresholds: InterpretationThresholds {
            low: 40.0,
            medium: 60.0,
            high: 80.0,
        },
    },
    DerivedMetricDefinition {
        id: MetricId::BikeScore,
        name: "Bike Score",
        formula: "infrastructure 50% + amenities 30% + connectivity 20%",
        required_layers: &[
            LayerId::BikeLanes,
            LayerId::PoiBikeParking,
            LayerId::PoiBikeShops,
            LayerId::Roads,
        ],
        thresholds: InterpretationThresholds {
            low: 25.0,
            medium: 50.0,
            high: 70.0,
        },
    },
    DerivedMetricDefinition {
        id: MetricId::StreetConnectivity,
        name: "Street Connectivity",
        formula: "estimated intersections per km² against a 100/km² benchmark",
        required_layers: &[LayerId::Roads],
        thresholds: InterpretationThresholds {
            low: 25.0,
            medium: 50.0,
            high: 75.0,
        },
    },
];

/// All derived metric definitions, in [`MetricId::ALL`] order.
#[must_use]
pub const fn definitions() -> &'static [DerivedMetricDefinition] {
    DEFINITIONS
}

/// Looks up the definition for a metric. Total: the table covers every
/// [`MetricId`].
#[must_use]
pub fn definition(id: MetricId) -> &'static DerivedMetricDefinition {
    DEFINITIONS
        .iter()
        .find(|d| d.id == id)
        .unwrap_or(&DEFINITIONS[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_covers_every_metric_id() {
        for &id in MetricId::ALL {
            assert_eq!(definition(id).id, id);
        }
        assert_eq!(DEFINITIONS.len(), MetricId::ALL.len());
    }

    #[test]
    fn interpret_buckets_in_order() {
        let t = InterpretationThresholds {
            low: 25.0,
            medium: 50.0,
            high: 75.0,
        };
        assert_eq!(t.interpret(10.0), "low");
        assert_eq!(t.interpret(25.0), "moderate");
        assert_eq!(t.interpret(60.0), "good");
        assert_eq!(t.interpret(75.0), "excellent");
    }

    #[test]
    fn diversity_layer_set_has_ten_point_layers() {
        assert_eq!(DIVERSITY_LAYERS.len(), 10);
    }
}

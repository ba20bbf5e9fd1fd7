//! Derived index calculator.
//!
//! Nine independent scoring functions, each consuming a subset of the
//! layer statistics and producing a 0-100 value, a confidence grade, and
//! a named breakdown of every weighted sub-component for auditability.
//!
//! Shared numeric-safety rules: any division by the area size or by a
//! count guards against zero (result `0`, never NaN/Inf), and the final
//! value is clamped to `[0, 100]`. Confidence is a reproducible function
//! of how many required layers had observed data, graded per the rules
//! documented on each function.

use std::collections::BTreeMap;

use area_compare_metrics_models::{
    AreaContext, Confidence, DerivedMetricValue, LayerId, MetricId, definitions,
};

use crate::poi::{safe_div, shannon_entropy};

/// Meters of road centerline assumed per intersection when estimating
/// intersection density from total road length.
const METERS_PER_INTERSECTION: f64 = 200.0;

/// Intersections per km² treated as fully connected.
const INTERSECTION_BENCHMARK: f64 = 100.0;

/// Mode-weighted stop density treated as "high transit density".
const TRANSIT_DENSITY_BENCHMARK: f64 = 50.0;

/// Bike-lane km per km² treated as complete infrastructure.
const BIKE_LANE_BENCHMARK_KM_PER_KM2: f64 = 5.0;

/// Bike parking spots per km² benchmark.
const BIKE_PARKING_BENCHMARK: f64 = 50.0;

/// Bike shops per km² benchmark.
const BIKE_SHOP_BENCHMARK: f64 = 2.0;

/// Computes every derived metric for one area snapshot.
#[must_use]
pub fn compute_all(ctx: &AreaContext) -> Vec<DerivedMetricValue> {
    MetricId::ALL.iter().map(|&id| compute(ctx, id)).collect()
}

/// Computes a single derived metric. Never fails; degenerate inputs
/// resolve to a zero value with confidence downgraded to low.
#[must_use]
pub fn compute(ctx: &AreaContext, id: MetricId) -> DerivedMetricValue {
    match id {
        MetricId::Diversity => diversity(ctx),
        MetricId::GreenRatio => green_ratio(ctx),
        MetricId::BuildingDensity => building_density(ctx),
        MetricId::TransitScore => transit_score(ctx),
        MetricId::MixedUse => mixed_use(ctx),
        MetricId::Walkability => walkability(ctx),
        MetricId::FifteenMinute => fifteen_minute(ctx),
        MetricId::BikeScore => bike_score(ctx),
        MetricId::StreetConnectivity => street_connectivity(ctx),
    }
}

fn clamp100(value: f64) -> f64 {
    value.min(100.0)
}

/// `log(1+x)/log(1+benchmark)` normalization onto `[0, 100]`.
fn log_normalize(value: f64, benchmark: f64) -> f64 {
    clamp100(100.0 * (1.0 + value).ln() / (1.0 + benchmark).ln())
}

/// Estimated intersections per km², derived from total road length.
fn intersection_density(ctx: &AreaContext) -> f64 {
    let estimated = ctx.length_m(LayerId::Roads) / METERS_PER_INTERSECTION;
    safe_div(estimated, ctx.area_km2)
}

/// Fraction-of-required-layers confidence rule: `≥80% → high`,
/// `≥50% → medium`, else `low`.
fn presence_confidence(ctx: &AreaContext, layers: &[LayerId]) -> Confidence {
    let present = layers.iter().filter(|&&id| ctx.has_data(id)).count();
    #[allow(clippy::cast_precision_loss)]
    let ratio = if layers.is_empty() {
        0.0
    } else {
        present as f64 / layers.len() as f64
    };
    if ratio >= 0.8 {
        Confidence::High
    } else if ratio >= 0.5 {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}

fn value(
    id: MetricId,
    raw: f64,
    confidence: Confidence,
    breakdown: BTreeMap<String, f64>,
) -> DerivedMetricValue {
    DerivedMetricValue {
        metric_id: id,
        value: clamp100(raw),
        confidence,
        breakdown,
    }
}

/// Shannon entropy over the ten point-feature layers, normalized against
/// the maximum possible entropy for that many layers.
fn diversity(ctx: &AreaContext) -> DerivedMetricValue {
    let layers = definitions::DIVERSITY_LAYERS;
    let counts: Vec<u64> = layers.iter().map(|&id| ctx.count(id)).collect();
    let total: u64 = counts.iter().sum();

    let raw_entropy = shannon_entropy(&counts);
    #[allow(clippy::cast_precision_loss)]
    let max_entropy = (layers.len() as f64).ln();
    let normalized = safe_div(raw_entropy, max_entropy) * 100.0;

    let mut breakdown = BTreeMap::new();
    breakdown.insert("rawEntropy".to_owned(), raw_entropy);
    breakdown.insert("maxEntropy".to_owned(), max_entropy);
    #[allow(clippy::cast_precision_loss)]
    breakdown.insert("totalFeatures".to_owned(), total as f64);
    #[allow(clippy::cast_precision_loss)]
    breakdown.insert(
        "layersWithData".to_owned(),
        counts.iter().filter(|&&c| c > 0).count() as f64,
    );

    value(
        MetricId::Diversity,
        normalized,
        presence_confidence(ctx, layers),
        breakdown,
    )
}

/// Parks + water area share of the total area, in percent.
///
/// Confidence is `high` if any contributing layer has data, else `low`.
fn green_ratio(ctx: &AreaContext) -> DerivedMetricValue {
    let park_m2 = ctx.area_m2(LayerId::LeisureParks);
    let water_m2 = ctx.area_m2(LayerId::NaturalWater);
    let share = safe_div(park_m2 + water_m2, ctx.area_km2 * 1_000_000.0) * 100.0;

    let confidence =
        if ctx.has_data(LayerId::LeisureParks) || ctx.has_data(LayerId::NaturalWater) {
            Confidence::High
        } else {
            Confidence::Low
        };

    let mut breakdown = BTreeMap::new();
    breakdown.insert("parkAreaM2".to_owned(), park_m2);
    breakdown.insert("waterAreaM2".to_owned(), water_m2);
    breakdown.insert("greenSharePct".to_owned(), clamp100(share));

    value(MetricId::GreenRatio, share, confidence, breakdown)
}

/// Building footprint area share of the total area, in percent.
///
/// Confidence: `high` with ≥2 of the 4 building layers present, `medium`
/// with ≥1, else `low`.
fn building_density(ctx: &AreaContext) -> DerivedMetricValue {
    let layers = [
        LayerId::BuildingsResidential,
        LayerId::BuildingsCommercial,
        LayerId::BuildingsIndustrial,
        LayerId::BuildingsOther,
    ];
    let footprint_m2 = ctx.area_m2_across(&layers);
    let share = safe_div(footprint_m2, ctx.area_km2 * 1_000_000.0) * 100.0;

    let present = layers.iter().filter(|&&id| ctx.has_data(id)).count();
    let confidence = if present >= 2 {
        Confidence::High
    } else if present >= 1 {
        Confidence::Medium
    } else {
        Confidence::Low
    };

    let mut breakdown = BTreeMap::new();
    breakdown.insert(
        "residentialAreaM2".to_owned(),
        ctx.area_m2(LayerId::BuildingsResidential),
    );
    breakdown.insert(
        "commercialAreaM2".to_owned(),
        ctx.area_m2(LayerId::BuildingsCommercial),
    );
    breakdown.insert(
        "industrialAreaM2".to_owned(),
        ctx.area_m2(LayerId::BuildingsIndustrial),
    );
    breakdown.insert(
        "otherAreaM2".to_owned(),
        ctx.area_m2(LayerId::BuildingsOther),
    );
    breakdown.insert("footprintSharePct".to_owned(), clamp100(share));

    value(MetricId::BuildingDensity, share, confidence, breakdown)
}

/// Mode-weighted stop density with logarithmic normalization. Rail
/// stations weigh `2.0`, bus stops `1.0`.
///
/// Confidence: `high` only when both a rail and a bus layer have non-zero
/// counts, `medium` with exactly one, else `low`.
fn transit_score(ctx: &AreaContext) -> DerivedMetricValue {
    let rail = ctx.count(LayerId::TransitStations);
    let bus = ctx.count(LayerId::TransitStops);

    #[allow(clippy::cast_precision_loss)]
    let weighted_sum = rail as f64 * 2.0 + bus as f64;
    let weighted_density = safe_div(weighted_sum, ctx.area_km2);
    let score = log_normalize(weighted_density, TRANSIT_DENSITY_BENCHMARK);

    let confidence = match (rail > 0, bus > 0) {
        (true, true) => Confidence::High,
        (true, false) | (false, true) => Confidence::Medium,
        (false, false) => Confidence::Low,
    };

    let mut breakdown = BTreeMap::new();
    #[allow(clippy::cast_precision_loss)]
    breakdown.insert("railStations".to_owned(), rail as f64);
    #[allow(clippy::cast_precision_loss)]
    breakdown.insert("busStops".to_owned(), bus as f64);
    breakdown.insert("weightedSum".to_owned(), weighted_sum);
    breakdown.insert("weightedDensity".to_owned(), weighted_density);

    value(MetricId::TransitScore, score, confidence, breakdown)
}

/// Residential/commercial balance: `(1 − |resRatio − comRatio|) × 100`
/// over each type's share of the combined footprint.
///
/// A zero combined footprint yields value `0` with confidence `low`;
/// otherwise confidence is `high` when both types are present, `medium`
/// when only one is.
fn mixed_use(ctx: &AreaContext) -> DerivedMetricValue {
    let res_m2 = ctx.area_m2(LayerId::BuildingsResidential);
    let com_m2 = ctx.area_m2(LayerId::BuildingsCommercial);
    let combined = res_m2 + com_m2;

    let mut breakdown = BTreeMap::new();
    breakdown.insert("residentialAreaM2".to_owned(), res_m2);
    breakdown.insert("commercialAreaM2".to_owned(), com_m2);

    if combined <= 0.0 {
        breakdown.insert("residentialRatio".to_owned(), 0.0);
        breakdown.insert("commercialRatio".to_owned(), 0.0);
        return value(MetricId::MixedUse, 0.0, Confidence::Low, breakdown);
    }

    let res_ratio = res_m2 / combined;
    let com_ratio = com_m2 / combined;
    let score = (1.0 - (res_ratio - com_ratio).abs()) * 100.0;

    let confidence = if res_m2 > 0.0 && com_m2 > 0.0 {
        Confidence::High
    } else {
        Confidence::Medium
    };

    breakdown.insert("residentialRatio".to_owned(), res_ratio);
    breakdown.insert("commercialRatio".to_owned(), com_ratio);

    value(MetricId::MixedUse, score, confidence, breakdown)
}

/// One walkability amenity category: reporting key, source layer, weight,
/// and the density benchmark at which the category saturates.
struct WalkCategory {
    key: &'static str,
    layer: LayerId,
    weight: f64,
    max_density: f64,
}

/// Per-category density benchmarks (features per km²) at which the
/// log-decay score saturates.
const WALK_CATEGORIES: &[WalkCategory] = &[
    WalkCategory {
        key: "grocery",
        layer: LayerId::PoiGrocery,
        weight: 3.0,
        max_density: 10.0,
    },
    WalkCategory {
        key: "restaurants",
        layer: LayerId::PoiFoodDrink,
        weight: 3.0,
        max_density: 50.0,
    },
    WalkCategory {
        key: "shopping",
        layer: LayerId::PoiShopping,
        weight: 2.0,
        max_density: 30.0,
    },
    WalkCategory {
        key: "coffee",
        layer: LayerId::PoiCafes,
        weight: 2.0,
        max_density: 20.0,
    },
    WalkCategory {
        key: "parks",
        layer: LayerId::LeisureParks,
        weight: 2.0,
        max_density: 5.0,
    },
    WalkCategory {
        key: "schools",
        layer: LayerId::PoiEducation,
        weight: 1.0,
        max_density: 5.0,
    },
    WalkCategory {
        key: "healthcare",
        layer: LayerId::PoiHealth,
        weight: 1.0,
        max_density: 10.0,
    },
];

/// Walkability proxy: weighted log-distance-decay amenity densities,
/// capped at 85% of the final value, plus a pedestrian bonus of up to 15
/// points from estimated intersection density.
///
/// Confidence: `high` with ≥5 of the 7 amenity categories populated,
/// `medium` with ≥3, else `low`.
fn walkability(ctx: &AreaContext) -> DerivedMetricValue {
    let mut breakdown = BTreeMap::new();
    let mut weighted_score = 0.0;
    let mut weight_total = 0.0;
    let mut populated = 0usize;

    for cat in WALK_CATEGORIES {
        let count = ctx.count(cat.layer);
        if count > 0 {
            populated += 1;
        }
        #[allow(clippy::cast_precision_loss)]
        let density = safe_div(count as f64, ctx.area_km2);
        // Logarithmic distance-decay proxy: saturates at the category
        // benchmark rather than growing linearly with density.
        let saturation = (density / cat.max_density).min(1.0);
        let score = clamp100(100.0 * (1.0 + 10.0 * saturation).ln() / 11.0_f64.ln());

        weighted_score += score * cat.weight;
        weight_total += cat.weight;
        breakdown.insert(format!("{}Score", cat.key), score);
    }

    let amenity = safe_div(weighted_score, weight_total);
    let amenity_component = amenity * 0.85;

    let int_density = intersection_density(ctx);
    let pedestrian_bonus = (int_density / INTERSECTION_BENCHMARK * 15.0).min(15.0);

    breakdown.insert("amenityComponent".to_owned(), amenity_component);
    breakdown.insert("pedestrianBonus".to_owned(), pedestrian_bonus);
    breakdown.insert("intersectionDensity".to_owned(), int_density);

    let confidence = if populated >= 5 {
        Confidence::High
    } else if populated >= 3 {
        Confidence::Medium
    } else {
        Confidence::Low
    };

    value(
        MetricId::Walkability,
        amenity_component + pedestrian_bonus,
        confidence,
        breakdown,
    )
}

/// The essential category groups a 15-minute neighborhood must cover.
const ESSENTIAL_GROUPS: &[(&str, &[LayerId])] = &[
    (
        "food",
        &[LayerId::PoiFoodDrink, LayerId::PoiGrocery, LayerId::PoiCafes],
    ),
    ("healthcare", &[LayerId::PoiHealth]),
    ("education", &[LayerId::PoiEducation]),
    ("greenSpace", &[LayerId::LeisureParks]),
    (
        "transit",
        &[LayerId::TransitStops, LayerId::TransitStations],
    ),
];

/// 15-minute city score: binary presence across the five essential
/// category groups, not a density measure.
///
/// Confidence is always `high`; a presence-only test has no partial-data
/// degradation.
fn fifteen_minute(ctx: &AreaContext) -> DerivedMetricValue {
    let mut breakdown = BTreeMap::new();
    let mut present = 0usize;

    for (key, layers) in ESSENTIAL_GROUPS {
        let has = layers.iter().any(|&id| ctx.count(id) > 0);
        if has {
            present += 1;
        }
        breakdown.insert(format!("{key}Present"), if has { 1.0 } else { 0.0 });
    }

    #[allow(clippy::cast_precision_loss)]
    let score = present as f64 / ESSENTIAL_GROUPS.len() as f64 * 100.0;

    value(MetricId::FifteenMinute, score, Confidence::High, breakdown)
}

/// Bike score: infrastructure 50% (log-normalized lane density),
/// amenities 30% (70/30 parking/shop blend), connectivity 20% (linear in
/// intersection density).
///
/// Confidence: `high` when both infrastructure and amenity data are
/// present, `medium` with either, else `low`.
fn bike_score(ctx: &AreaContext) -> DerivedMetricValue {
    let lane_km = ctx.length_m(LayerId::BikeLanes) / 1000.0;
    let lane_density = safe_div(lane_km, ctx.area_km2);
    let infrastructure = log_normalize(lane_density, BIKE_LANE_BENCHMARK_KM_PER_KM2);

    #[allow(clippy::cast_precision_loss)]
    let parking_density = safe_div(ctx.count(LayerId::PoiBikeParking) as f64, ctx.area_km2);
    #[allow(clippy::cast_precision_loss)]
    let shop_density = safe_div(ctx.count(LayerId::PoiBikeShops) as f64, ctx.area_km2);
    let amenities = 0.7 * log_normalize(parking_density, BIKE_PARKING_BENCHMARK)
        + 0.3 * log_normalize(shop_density, BIKE_SHOP_BENCHMARK);

    let int_density = intersection_density(ctx);
    let connectivity = clamp100(int_density / INTERSECTION_BENCHMARK * 100.0);

    let score = 0.5 * infrastructure + 0.3 * amenities + 0.2 * connectivity;

    let has_infra = ctx.has_data(LayerId::BikeLanes);
    let has_amenity = ctx.has_data(LayerId::PoiBikeParking) || ctx.has_data(LayerId::PoiBikeShops);
    let confidence = match (has_infra, has_amenity) {
        (true, true) => Confidence::High,
        (true, false) | (false, true) => Confidence::Medium,
        (false, false) => Confidence::Low,
    };

    let mut breakdown = BTreeMap::new();
    breakdown.insert("infrastructureScore".to_owned(), infrastructure);
    breakdown.insert("amenityScore".to_owned(), amenities);
    breakdown.insert("connectivityScore".to_owned(), connectivity);
    breakdown.insert("laneDensityKmPerKm2".to_owned(), lane_density);
    breakdown.insert("parkingDensity".to_owned(), parking_density);
    breakdown.insert("shopDensity".to_owned(), shop_density);

    value(MetricId::BikeScore, score, confidence, breakdown)
}

/// Street connectivity: estimated intersection density scored linearly
/// against the 100/km² benchmark.
///
/// Confidence is `high` when the roads layer has data, else `low`.
fn street_connectivity(ctx: &AreaContext) -> DerivedMetricValue {
    let estimated = ctx.length_m(LayerId::Roads) / METERS_PER_INTERSECTION;
    let density = safe_div(estimated, ctx.area_km2);
    let score = density / INTERSECTION_BENCHMARK * 100.0;

    let confidence = if ctx.has_data(LayerId::Roads) {
        Confidence::High
    } else {
        Confidence::Low
    };

    let mut breakdown = BTreeMap::new();
    breakdown.insert("estimatedIntersections".to_owned(), estimated);
    breakdown.insert("intersectionDensity".to_owned(), density);

    value(MetricId::StreetConnectivity, score, confidence, breakdown)
}

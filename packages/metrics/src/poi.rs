//! POI metrics calculator.
//!
//! Rolls per-layer feature counts up into the eight fixed amenity
//! categories and reports counts, densities, shares, Shannon diversity,
//! and a data-coverage score. Never fails: missing layers and zero areas
//! degrade to zero values.

use area_compare_metrics_models::{
    AreaContext, CategoryMetric, PoiCategory, PoiMetrics, coverage_label, diversity_label,
};

/// Shannon diversity index `H = -Σ p_i ln(p_i)` over a count vector.
///
/// Zero-count entries contribute nothing; an all-zero vector yields `0`.
pub(crate) fn shannon_entropy(counts: &[u64]) -> f64 {
    let total: u64 = counts.iter().sum();
    if total == 0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let total = total as f64;
    counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            #[allow(clippy::cast_precision_loss)]
            let p = c as f64 / total;
            -p * p.ln()
        })
        .sum()
}

/// Divides, treating a non-positive denominator as "no data" rather than
/// producing NaN or infinity.
pub(crate) fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Computes the full [`PoiMetrics`] for one area snapshot.
///
/// Always returns a complete result; when no data exists every numeric
/// field is zero and the labels read as "no data"/"low diversity".
#[must_use]
pub fn compute(ctx: &AreaContext) -> PoiMetrics {
    let counts: Vec<u64> = PoiCategory::ALL
        .iter()
        .map(|cat| ctx.count_across(cat.layers()))
        .collect();

    let total_count: u64 = counts.iter().sum();
    #[allow(clippy::cast_precision_loss)]
    let total_f = total_count as f64;

    let density = safe_div(total_f, ctx.area_km2);
    let diversity_index = shannon_entropy(&counts);

    let populated = counts.iter().filter(|&&c| c > 0).count();
    #[allow(clippy::cast_precision_loss)]
    let coverage_score = populated as f64 / PoiCategory::ALL.len() as f64 * 100.0;

    let category_breakdown: Vec<CategoryMetric> = PoiCategory::ALL
        .iter()
        .zip(&counts)
        .map(|(&cat, &count)| {
            #[allow(clippy::cast_precision_loss)]
            let count_f = count as f64;
            CategoryMetric {
                id: cat,
                name: cat.display_name().to_owned(),
                count,
                density: safe_div(count_f, ctx.area_km2),
                share: if total_count > 0 {
                    count_f / total_f * 100.0
                } else {
                    0.0
                },
                color: cat.color().to_owned(),
            }
        })
        .collect();

    log::debug!(
        "POI metrics: {total_count} features across {populated}/{} categories",
        PoiCategory::ALL.len()
    );

    PoiMetrics {
        total_count,
        density,
        diversity_index,
        diversity_label: diversity_label(diversity_index).to_owned(),
        category_breakdown,
        coverage_score,
        coverage_label: coverage_label(coverage_score).to_owned(),
        area_km2: ctx.area_km2,
        computed_at: chrono::Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use area_compare_metrics_models::{LayerId, LayerStats};
    use geo::MultiPolygon;

    use super::*;

    fn ctx_with_counts(area_km2: f64, counts: &[(LayerId, u64)]) -> AreaContext {
        let layers: BTreeMap<LayerId, LayerStats> = counts
            .iter()
            .map(|&(id, feature_count)| {
                (
                    id,
                    LayerStats {
                        feature_count,
                        ..LayerStats::default()
                    },
                )
            })
            .collect();
        AreaContext::new(area_km2, MultiPolygon(vec![]), layers)
    }

    #[test]
    fn empty_area_degrades_to_all_zero() {
        let metrics = compute(&ctx_with_counts(1.0, &[]));
        assert_eq!(metrics.total_count, 0);
        assert!(metrics.density.abs() < f64::EPSILON);
        assert!(metrics.diversity_index.abs() < f64::EPSILON);
        assert!(metrics.coverage_score.abs() < f64::EPSILON);
        assert_eq!(metrics.coverage_label, "no data");
        assert!(
            metrics
                .category_breakdown
                .iter()
                .all(|c| c.share.abs() < f64::EPSILON)
        );
    }

    #[test]
    fn single_layer_scenario_matches_expected_values() {
        // 1 km², 100 food POIs, everything else empty.
        let metrics = compute(&ctx_with_counts(1.0, &[(LayerId::PoiFoodDrink, 100)]));
        assert_eq!(metrics.total_count, 100);
        assert!((metrics.density - 100.0).abs() < 1e-9);
        assert!((metrics.coverage_score - 12.5).abs() < 1e-9);
        assert!(metrics.diversity_index.abs() < f64::EPSILON);
    }

    #[test]
    fn zero_area_never_produces_nan_density() {
        let metrics = compute(&ctx_with_counts(0.0, &[(LayerId::PoiShopping, 40)]));
        assert!(metrics.density.abs() < f64::EPSILON);
        assert!(
            metrics
                .category_breakdown
                .iter()
                .all(|c| c.density.abs() < f64::EPSILON)
        );
    }

    #[test]
    fn shares_sum_to_one_hundred_when_populated() {
        let metrics = compute(&ctx_with_counts(
            2.0,
            &[
                (LayerId::PoiFoodDrink, 30),
                (LayerId::PoiGrocery, 25),
                (LayerId::TransitStops, 45),
            ],
        ));
        let share_sum: f64 = metrics.category_breakdown.iter().map(|c| c.share).sum();
        assert!((share_sum - 100.0).abs() < 1e-6);
    }

    #[test]
    fn diversity_is_zero_iff_at_most_one_category_populated() {
        let one = compute(&ctx_with_counts(1.0, &[(LayerId::PoiHealth, 12)]));
        assert!(one.diversity_index.abs() < f64::EPSILON);

        let two = compute(&ctx_with_counts(
            1.0,
            &[(LayerId::PoiHealth, 12), (LayerId::PoiEducation, 3)],
        ));
        assert!(two.diversity_index > 0.0);
    }

    #[test]
    fn category_layers_aggregate_into_one_count() {
        // Food & drink and cafes both roll up into the food category.
        let metrics = compute(&ctx_with_counts(
            1.0,
            &[(LayerId::PoiFoodDrink, 10), (LayerId::PoiCafes, 5)],
        ));
        let food = &metrics.category_breakdown[0];
        assert_eq!(food.count, 15);
        assert!((metrics.coverage_score - 12.5).abs() < 1e-9);
    }

    #[test]
    fn full_coverage_requires_every_category() {
        let all: Vec<(LayerId, u64)> = PoiCategory::ALL
            .iter()
            .map(|cat| (cat.layers()[0], 1))
            .collect();
        let metrics = compute(&ctx_with_counts(1.0, &all));
        assert!((metrics.coverage_score - 100.0).abs() < 1e-9);
        assert_eq!(metrics.coverage_label, "excellent");
    }

    #[test]
    fn even_spread_maximizes_entropy() {
        let all: Vec<(LayerId, u64)> = PoiCategory::ALL
            .iter()
            .map(|cat| (cat.layers()[0], 10))
            .collect();
        let metrics = compute(&ctx_with_counts(1.0, &all));
        #[allow(clippy::cast_precision_loss)]
        let max_h = (PoiCategory::ALL.len() as f64).ln();
        assert!((metrics.diversity_index - max_h).abs() < 1e-9);
        assert_eq!(metrics.diversity_label, "very diverse");
    }
}

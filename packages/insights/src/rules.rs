//! Heuristic insight rules.
//!
//! A fixed-order rule set over one or two areas' POI metrics. Each rule
//! independently appends at most one insight; the final list is capped at
//! four entries. Per-rule confidence labels are fixed constants, not
//! computed from the data.

use area_compare_metrics_models::{Confidence, PoiCategory, PoiMetrics};

use crate::compare::percent_delta;
use crate::{Insight, InsightKind};

/// Maximum number of insights returned for any input.
const MAX_INSIGHTS: usize = 4;

/// Density at or above which an area reads as amenity-rich (per km²).
const HIGH_DENSITY: f64 = 200.0;

/// Density below which an area reads as amenity-sparse (per km²).
const LOW_DENSITY: f64 = 50.0;

/// Shannon index at or above which the mix reads as diverse.
const DIVERSE_MIX: f64 = 1.5;

fn food_density(metrics: &PoiMetrics) -> f64 {
    metrics
        .category_breakdown
        .iter()
        .find(|c| c.id == PoiCategory::Food)
        .map_or(0.0, |c| c.density)
}

/// Generates insights for a single area.
#[must_use]
pub fn generate(name: &str, metrics: &PoiMetrics) -> Vec<Insight> {
    let mut insights = Vec::new();

    if metrics.density >= HIGH_DENSITY {
        insights.push(Insight {
            title: "High Amenity Density".to_owned(),
            body: format!(
                "{name} has {:.0} amenities per km², which suggests a well-served urban area.",
                metrics.density
            ),
            kind: InsightKind::Positive,
            confidence: Confidence::High,
            metric_ids: vec!["density".to_owned()],
        });
    }

    if metrics.density < LOW_DENSITY {
        insights.push(Insight {
            title: "Low Amenity Density".to_owned(),
            body: format!(
                "{name} has only {:.0} amenities per km², which may indicate limited local services or incomplete map data.",
                metrics.density
            ),
            kind: InsightKind::Caution,
            confidence: Confidence::High,
            metric_ids: vec!["density".to_owned()],
        });
    }

    if metrics.diversity_index >= DIVERSE_MIX {
        insights.push(Insight {
            title: "Diverse Amenity Mix".to_owned(),
            body: format!(
                "A diversity index of {:.2} suggests {name} offers a broad mix of amenity types.",
                metrics.diversity_index
            ),
            kind: InsightKind::Positive,
            confidence: Confidence::High,
            metric_ids: vec!["diversity".to_owned()],
        });
    }

    insights.truncate(MAX_INSIGHTS);
    insights
}

/// Generates comparative insights for two areas.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn generate_pair(
    name_a: &str,
    a: &PoiMetrics,
    name_b: &str,
    b: &PoiMetrics,
) -> Vec<Insight> {
    let mut insights = Vec::new();

    let density_delta = percent_delta(a.density, b.density);
    if density_delta.abs() > 50.0 {
        let (higher, lower) = if density_delta > 0.0 {
            (name_a, name_b)
        } else {
            (name_b, name_a)
        };
        insights.push(Insight {
            title: "Amenity Density Gap".to_owned(),
            body: format!(
                "{higher} has {:.0}% more amenities per km² than {lower}, which suggests noticeably different levels of local service.",
                density_delta.abs()
            ),
            kind: InsightKind::Neutral,
            confidence: Confidence::Medium,
            metric_ids: vec!["density".to_owned()],
        });
    }

    let coverage_gap = a.coverage_score - b.coverage_score;
    if coverage_gap.abs() > 20.0 {
        let worse = if coverage_gap < 0.0 { name_a } else { name_b };
        insights.push(Insight {
            title: "Uneven Data Coverage".to_owned(),
            body: format!(
                "{worse} has data for noticeably fewer amenity categories; differences may reflect map coverage rather than the areas themselves.",
            ),
            kind: InsightKind::Caution,
            confidence: Confidence::High,
            metric_ids: vec!["coverage".to_owned()],
        });
    }

    let diversity_gap = a.diversity_index - b.diversity_index;
    if diversity_gap.abs() > 0.3 {
        let (more, less) = if diversity_gap > 0.0 {
            (name_a, name_b)
        } else {
            (name_b, name_a)
        };
        insights.push(Insight {
            title: "Different Amenity Mix".to_owned(),
            body: format!(
                "{more} shows a more varied amenity mix than {less} ({:.2} vs {:.2} diversity index).",
                more_diversity(a, b),
                less_diversity(a, b)
            ),
            kind: InsightKind::Neutral,
            confidence: Confidence::Medium,
            metric_ids: vec!["diversity".to_owned()],
        });
    }

    let area_delta = percent_delta(a.area_km2, b.area_km2);
    if area_delta.abs() > 100.0 {
        insights.push(Insight {
            title: "Very Different Area Sizes".to_owned(),
            body: format!(
                "{name_a} ({:.1} km²) and {name_b} ({:.1} km²) differ greatly in size; per-km² figures are the more defensible comparison.",
                a.area_km2, b.area_km2
            ),
            kind: InsightKind::Caution,
            confidence: Confidence::High,
            metric_ids: vec!["area".to_owned(), "density".to_owned()],
        });
    }

    let food_delta = percent_delta(food_density(a), food_density(b));
    if food_delta.abs() > 75.0 {
        let better = if food_delta > 0.0 { name_a } else { name_b };
        insights.push(Insight {
            title: "Dining Options".to_owned(),
            body: format!(
                "{better} has a noticeably higher density of food and drink amenities, which may indicate a livelier dining scene.",
            ),
            kind: InsightKind::Neutral,
            confidence: Confidence::Medium,
            metric_ids: vec!["food-density".to_owned()],
        });
    }

    insights.truncate(MAX_INSIGHTS);
    insights
}

fn more_diversity(a: &PoiMetrics, b: &PoiMetrics) -> f64 {
    a.diversity_index.max(b.diversity_index)
}

fn less_diversity(a: &PoiMetrics, b: &PoiMetrics) -> f64 {
    a.diversity_index.min(b.diversity_index)
}

#[cfg(test)]
mod tests {
    use area_compare_metrics_models::{CategoryMetric, coverage_label, diversity_label};

    use super::*;

    fn metrics(density: f64, diversity: f64, coverage: f64, area_km2: f64) -> PoiMetrics {
        metrics_with_food(density, diversity, coverage, area_km2, 0.0)
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn metrics_with_food(
        density: f64,
        diversity: f64,
        coverage: f64,
        area_km2: f64,
        food_density: f64,
    ) -> PoiMetrics {
        PoiMetrics {
            total_count: (density * area_km2) as u64,
            density,
            diversity_index: diversity,
            diversity_label: diversity_label(diversity).to_owned(),
            category_breakdown: vec![CategoryMetric {
                id: PoiCategory::Food,
                name: PoiCategory::Food.display_name().to_owned(),
                count: (food_density * area_km2) as u64,
                density: food_density,
                share: 0.0,
                color: PoiCategory::Food.color().to_owned(),
            }],
            coverage_score: coverage,
            coverage_label: coverage_label(coverage).to_owned(),
            area_km2,
            computed_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn dense_diverse_area_reads_positive() {
        let insights = generate("Old Town", &metrics(250.0, 1.8, 100.0, 2.0));
        assert_eq!(insights.len(), 2);
        assert_eq!(insights[0].title, "High Amenity Density");
        assert_eq!(insights[0].kind, InsightKind::Positive);
        assert_eq!(insights[1].title, "Diverse Amenity Mix");
    }

    #[test]
    fn sparse_area_reads_caution() {
        let insights = generate("Outskirts", &metrics(20.0, 0.4, 25.0, 5.0));
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].kind, InsightKind::Caution);
        assert_eq!(insights[0].confidence, Confidence::High);
    }

    #[test]
    fn middling_area_generates_nothing() {
        assert!(generate("Somewhere", &metrics(100.0, 1.0, 75.0, 1.0)).is_empty());
    }

    #[test]
    fn density_gap_names_the_higher_area() {
        let insights = generate_pair(
            "A",
            &metrics(300.0, 1.0, 75.0, 1.0),
            "B",
            &metrics(100.0, 1.0, 75.0, 1.0),
        );
        assert_eq!(insights.len(), 1);
        assert!(insights[0].body.starts_with("A has 200%"));
        assert_eq!(insights[0].kind, InsightKind::Neutral);
    }

    #[test]
    fn coverage_gap_names_the_worse_covered_area() {
        let insights = generate_pair(
            "A",
            &metrics(100.0, 1.0, 50.0, 1.0),
            "B",
            &metrics(100.0, 1.0, 87.5, 1.0),
        );
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].title, "Uneven Data Coverage");
        assert!(insights[0].body.starts_with("A "));
    }

    #[test]
    fn size_mismatch_recommends_per_km2_comparison() {
        let insights = generate_pair(
            "A",
            &metrics(100.0, 1.0, 75.0, 10.0),
            "B",
            &metrics(100.0, 1.0, 75.0, 1.0),
        );
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].title, "Very Different Area Sizes");
        assert!(insights[0].metric_ids.contains(&"area".to_owned()));
    }

    #[test]
    fn food_density_gap_triggers_dining_insight() {
        let insights = generate_pair(
            "A",
            &metrics_with_food(100.0, 1.0, 75.0, 1.0, 90.0),
            "B",
            &metrics_with_food(100.0, 1.0, 75.0, 1.0, 40.0),
        );
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].title, "Dining Options");
        assert!(insights[0].body.starts_with("A "));
    }

    #[test]
    fn insight_list_is_capped_at_four() {
        // Trip every pair rule at once.
        let insights = generate_pair(
            "A",
            &metrics_with_food(400.0, 2.0, 100.0, 10.0, 200.0),
            "B",
            &metrics_with_food(100.0, 1.0, 25.0, 1.0, 10.0),
        );
        assert_eq!(insights.len(), MAX_INSIGHTS);
    }

    #[test]
    fn identical_areas_generate_no_pair_insights() {
        let m = metrics(100.0, 1.0, 75.0, 1.0);
        assert!(generate_pair("A", &m, "B", &m).is_empty());
    }
}

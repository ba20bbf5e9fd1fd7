//! Area document loading and report shapes.
//!
//! An area document is the JSON handed over by the external fetch/clip
//! stage: a name, optional precomputed km² size, GeoJSON geometry, and
//! per-layer statistics keyed by string layer id. Unknown layer ids are
//! logged and skipped, never errors.

use std::collections::BTreeMap;
use std::path::Path;

use area_compare_insights::{Insight, compare, rules};
use area_compare_metrics::{derived, geometry, poi};
use area_compare_metrics_models::{
    AreaContext, DerivedMetricValue, LayerId, LayerStats, MetricId, PoiMetrics,
};
use serde::{Deserialize, Serialize};

/// On-disk area document produced by the fetch/clip stage.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AreaDocument {
    /// Area display name.
    name: String,
    /// Precomputed area size; derived from the geometry when absent.
    #[serde(default)]
    area_km2: Option<f64>,
    /// GeoJSON `Polygon`/`MultiPolygon` geometry (lon/lat, closed rings).
    geometry: serde_json::Value,
    /// Per-layer statistics keyed by string layer id.
    #[serde(default)]
    layers: BTreeMap<String, LayerStats>,
}

/// Loads an area document and converts it into an engine snapshot.
///
/// # Errors
///
/// Returns an error when the file cannot be read, the JSON is malformed,
/// or the geometry is not a polygon.
pub fn load_area(path: &Path) -> Result<(String, AreaContext), Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)?;
    let doc: AreaDocument = serde_json::from_str(&text)?;

    let polygon = geometry::multipolygon_from_geojson(&doc.geometry.to_string())
        .ok_or_else(|| format!("{}: geometry is not a Polygon/MultiPolygon", path.display()))?;

    let area_km2 = doc
        .area_km2
        .unwrap_or_else(|| geometry::polygon_area_km2(&polygon));

    let mut layers = BTreeMap::new();
    for (id, stats) in doc.layers {
        match LayerId::from_id(&id) {
            Some(layer) => {
                layers.insert(layer, stats);
            }
            None => log::debug!("Skipping unknown layer id '{id}'"),
        }
    }

    log::info!(
        "Loaded area '{}': {:.2} km², {} layers",
        doc.name,
        area_km2,
        layers.len()
    );

    Ok((doc.name, AreaContext::new(area_km2, polygon, layers)))
}

/// Full metrics report for one area.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaReport {
    /// Area display name.
    pub name: String,
    /// POI metrics.
    pub poi: PoiMetrics,
    /// All derived metrics.
    pub derived: Vec<DerivedMetricValue>,
    /// Single-area insights.
    pub insights: Vec<Insight>,
}

impl AreaReport {
    /// Runs both calculators and the single-area insight rules.
    #[must_use]
    pub fn build(name: &str, ctx: &AreaContext) -> Self {
        let poi = poi::compute(ctx);
        let insights = rules::generate(name, &poi);
        Self {
            name: name.to_owned(),
            poi,
            derived: derived::compute_all(ctx),
            insights,
        }
    }
}

/// One compared metric with its rendered trend glyph.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeltaRow {
    /// Delta and trend classification.
    #[serde(flatten)]
    pub delta: compare::MetricDelta,
    /// Trend glyph for display; empty for flat deltas.
    pub indicator: String,
}

/// Side-by-side report for two areas.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonReport {
    /// First area's full report.
    pub a: AreaReport,
    /// Second (baseline) area's full report.
    pub b: AreaReport,
    /// Per-metric deltas, first area relative to the second.
    pub deltas: Vec<DeltaRow>,
    /// Cross-area insights.
    pub insights: Vec<Insight>,
}

impl ComparisonReport {
    /// Scores both areas and compares every derived metric.
    #[must_use]
    pub fn build(name_a: &str, ctx_a: &AreaContext, name_b: &str, ctx_b: &AreaContext) -> Self {
        let a = AreaReport::build(name_a, ctx_a);
        let b = AreaReport::build(name_b, ctx_b);

        let deltas = MetricId::ALL
            .iter()
            .map(|&id| {
                let value_a = metric_value(&a.derived, id);
                let value_b = metric_value(&b.derived, id);
                let delta = compare::compare(id, value_a, value_b);
                DeltaRow {
                    indicator: delta.trend.glyph().to_owned(),
                    delta,
                }
            })
            .collect();

        let insights = rules::generate_pair(name_a, &a.poi, name_b, &b.poi);

        Self {
            a,
            b,
            deltas,
            insights,
        }
    }
}

fn metric_value(derived: &[DerivedMetricValue], id: MetricId) -> f64 {
    derived
        .iter()
        .find(|m| m.metric_id == id)
        .map_or(0.0, |m| m.value)
}

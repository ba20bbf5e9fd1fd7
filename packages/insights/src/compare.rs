//! Two-area metric comparison.
//!
//! Computes the percentage delta between two values of the same metric
//! and classifies it into a discrete trend indicator. The delta is
//! deliberately asymmetric: it is always relative to the second value.

use area_compare_metrics_models::MetricId;
use serde::{Deserialize, Serialize};

/// Discrete classification of a percentage delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrendIndicator {
    /// Delta above +50%.
    StrongUp,
    /// Delta above +10%.
    Up,
    /// Delta below −50%.
    StrongDown,
    /// Delta below −10%.
    Down,
    /// Delta within ±10%.
    Flat,
}

impl TrendIndicator {
    /// Classifies a percentage delta.
    #[must_use]
    pub fn from_delta(delta_pct: f64) -> Self {
        if delta_pct > 50.0 {
            Self::StrongUp
        } else if delta_pct > 10.0 {
            Self::Up
        } else if delta_pct < -50.0 {
            Self::StrongDown
        } else if delta_pct < -10.0 {
            Self::Down
        } else {
            Self::Flat
        }
    }

    /// Display glyph for UI panels; flat deltas render as nothing.
    #[must_use]
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::StrongUp => "▲▲",
            Self::Up => "▲",
            Self::StrongDown => "▼▼",
            Self::Down => "▼",
            Self::Flat => "",
        }
    }
}

/// Comparison of one metric across two areas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricDelta {
    /// Which metric was compared.
    pub metric_id: MetricId,
    /// Value for the first area.
    pub a: f64,
    /// Value for the second (baseline) area.
    pub b: f64,
    /// Percentage delta of `a` relative to `b`.
    pub delta_pct: f64,
    /// Discrete trend classification of the delta.
    pub trend: TrendIndicator,
}

/// Percentage delta of `a` relative to `b`.
///
/// When `b` is zero the delta is `100` if `a` is positive, else `0`, so
/// the result is always finite.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn percent_delta(a: f64, b: f64) -> f64 {
    if b == 0.0 {
        if a > 0.0 { 100.0 } else { 0.0 }
    } else {
        (a - b) / b * 100.0
    }
}

/// Compares one metric's value across two areas.
#[must_use]
pub fn compare(metric_id: MetricId, a: f64, b: f64) -> MetricDelta {
    let delta_pct = percent_delta(a, b);
    MetricDelta {
        metric_id,
        a,
        b,
        delta_pct,
        trend: TrendIndicator::from_delta(delta_pct),
    }
}

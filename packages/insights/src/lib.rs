#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Metric comparison and heuristic insight generation.
//!
//! [`compare`] turns two metric values into a percentage delta and a
//! discrete trend indicator. [`rules`] turns one or two areas' POI metrics
//! into short natural-language observations. Both are pure and stateless;
//! insight wording is deliberately conservative ("suggests", "may
//! indicate") and never implies causation.

use area_compare_metrics_models::Confidence;
use serde::{Deserialize, Serialize};

pub mod compare;
pub mod rules;

/// Whether an insight reads as favorable, unfavorable, or descriptive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    /// Favorable observation.
    Positive,
    /// Something the reader should double-check before comparing.
    Caution,
    /// Descriptive difference with no value judgement.
    Neutral,
}

/// A short generated observation about one or two areas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    /// Short headline.
    pub title: String,
    /// One-sentence observation.
    pub body: String,
    /// Favorable / caution / descriptive.
    pub kind: InsightKind,
    /// Fixed per-rule confidence label.
    pub confidence: Confidence,
    /// Ids of the metrics that produced this insight.
    pub metric_ids: Vec<String>,
}

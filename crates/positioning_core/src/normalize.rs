//! Min-max normalization of partner aggregates onto a 0-100 scale.
//!
//! Scores are relative to the cohort passed in: narrowing the partner set
//! moves the baseline and therefore every partner's score.

use serde::{Deserialize, Serialize};

use crate::aggregate::PartnerAggregate;
use crate::contract::ensure_finite_total;
use crate::error::EngineResult;

/// Raw aggregate field feeding one axis of the positioning chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisSource {
    FitAccumulator,
    UpstreamFit,
    TotalGmv,
    TotalRebate,
    TotalRevenue,
    TotalStores,
    AvgRebatePerStore,
    StoreCoverage,
}

impl AxisSource {
    pub fn raw_value(self, aggregate: &PartnerAggregate) -> f64 {
        match self {
            AxisSource::FitAccumulator => aggregate.raw_fit,
            AxisSource::UpstreamFit => aggregate.upstream_fit,
            AxisSource::TotalGmv => aggregate.total_gmv,
            AxisSource::TotalRebate => aggregate.total_rebate,
            AxisSource::TotalRevenue => aggregate.total_revenue,
            AxisSource::TotalStores => aggregate.total_stores as f64,
            AxisSource::AvgRebatePerStore => aggregate.avg_rebate_per_store(),
            AxisSource::StoreCoverage => aggregate.store_coverage,
        }
    }
}

/// Which raw fields become the fit (X) and rebate (Y) scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisMapping {
    pub fit: AxisSource,
    pub rebate: AxisSource,
}

impl Default for AxisMapping {
    fn default() -> Self {
        Self {
            fit: AxisSource::FitAccumulator,
            rebate: AxisSource::TotalRebate,
        }
    }
}

/// An aggregate with its two normalized scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredPartner {
    pub aggregate: PartnerAggregate,
    pub fit_score: f64,
    pub rebate_score: f64,
}

/// Normalize a value to the 0-100 range.
///
/// Uses min-max normalization: `(value - min) / (max - min) * 100`.
/// If min == max, returns 0. The ratio is taken before scaling so a span
/// near `f64::MAX` cannot overflow the numerator.
pub fn normalize_metric(value: f64, min: f64, max: f64) -> f64 {
    if max == min {
        0.0
    } else {
        ((value - min) / (max - min) * 100.0).clamp(0.0, 100.0)
    }
}

fn axis_bounds(
    aggregates: &[PartnerAggregate],
    source: AxisSource,
    axis: &str,
) -> EngineResult<(f64, f64)> {
    let (min, max) = aggregates
        .iter()
        .map(|aggregate| source.raw_value(aggregate))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), v| {
            (min.min(v), max.max(v))
        });
    ensure_finite_total(&format!("{axis} axis"), "span", max - min)?;
    Ok((min, max))
}

/// Score every aggregate against the bounds of the whole set.
///
/// Returns scores in the same order as the input. Fails when an axis spans
/// more than the finite `f64` range.
pub fn normalize_scores(
    aggregates: Vec<PartnerAggregate>,
    mapping: &AxisMapping,
) -> EngineResult<Vec<ScoredPartner>> {
    if aggregates.is_empty() {
        return Ok(vec![]);
    }

    let (fit_min, fit_max) = axis_bounds(&aggregates, mapping.fit, "fit")?;
    let (rebate_min, rebate_max) = axis_bounds(&aggregates, mapping.rebate, "rebate")?;

    let scored = aggregates
        .into_iter()
        .map(|aggregate| {
            let fit_score = normalize_metric(mapping.fit.raw_value(&aggregate), fit_min, fit_max);
            let rebate_score = normalize_metric(
                mapping.rebate.raw_value(&aggregate),
                rebate_min,
                rebate_max,
            );
            ScoredPartner {
                aggregate,
                fit_score,
                rebate_score,
            }
        })
        .collect();
    Ok(scored)
}

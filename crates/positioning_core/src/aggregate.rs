//! Per-partner aggregation of store metric rows.
//!
//! Groups the snapshot by partner and produces summed GMV, rebate and revenue,
//! the distinct store count and the tier-weighted raw fit signal. Only
//! partners with at least one matching row are returned.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::contract::{ensure_finite_total, PartnerDirectory};
use crate::error::EngineResult;
use crate::model::{Category, Partner, PeriodWindow, StorePartnerMetric, StoreTier};
use crate::weighting::TierWeighting;

/// Restricts which rows feed a computation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MetricFilter {
    /// `None` compares all partners.
    pub category: Option<Category>,
    pub period: Option<PeriodWindow>,
}

impl MetricFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, category: Option<Category>) -> Self {
        self.category = category;
        self
    }

    pub fn with_period(mut self, period: Option<PeriodWindow>) -> Self {
        self.period = period;
        self
    }

    pub fn matches_partner(&self, partner: &Partner) -> bool {
        self.category
            .map_or(true, |category| partner.has_category(category))
    }

    pub fn matches_period(&self, row: &StorePartnerMetric) -> bool {
        self.period.map_or(true, |window| row.overlaps(&window))
    }
}

/// Summed metrics for one partner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartnerAggregate {
    pub partner_id: String,
    pub partner_name: String,
    pub category: Category,
    pub total_gmv: f64,
    pub total_rebate: f64,
    pub total_revenue: f64,
    pub total_stores: usize,
    /// Sum of tier weights over the partner's distinct stores.
    pub raw_fit: f64,
    /// Tier-weighted mean of the upstream `fit_score_raw` values.
    pub upstream_fit: f64,
    /// Percent of the platform's tier-weighted store base covered.
    pub store_coverage: f64,
    pub row_count: usize,
}

impl PartnerAggregate {
    pub fn avg_rebate_per_store(&self) -> f64 {
        if self.total_stores == 0 {
            0.0
        } else {
            self.total_rebate / self.total_stores as f64
        }
    }
}

/// Everything the aggregator needs besides the rows themselves.
pub struct AggregationContext<'a> {
    pub directory: &'a PartnerDirectory<'a>,
    /// Tiers from the store directory; these win over the tier on a row.
    pub store_tiers: &'a BTreeMap<&'a str, StoreTier>,
    pub weighting: &'a dyn TierWeighting,
}

impl AggregationContext<'_> {
    fn tier_for(&self, row: &StorePartnerMetric) -> StoreTier {
        self.store_tiers
            .get(row.store_id.as_str())
            .copied()
            .unwrap_or(row.store_tier)
    }

    /// Total weight of every store in the directory.
    fn platform_weight(&self) -> f64 {
        self.store_tiers
            .values()
            .map(|tier| self.weighting.weight(*tier))
            .sum()
    }
}

/// Aggregate `metrics` per partner, sorted by partner id.
///
/// Rows are summed in a canonical order so the totals do not depend on the
/// order the snapshot was supplied in. Rows whose partner is missing from the
/// directory are skipped; callers validate the snapshot beforehand.
///
/// Fails when a partner's totals overflow to infinity even though every row
/// is finite.
pub fn aggregate_partner_metrics(
    metrics: &[StorePartnerMetric],
    filter: &MetricFilter,
    context: &AggregationContext<'_>,
) -> EngineResult<Vec<PartnerAggregate>> {
    let mut grouped: BTreeMap<&str, (&Partner, Vec<&StorePartnerMetric>)> = BTreeMap::new();
    for row in metrics.iter().filter(|row| filter.matches_period(row)) {
        let Some(partner) = context.directory.get(&row.partner_id) else {
            continue;
        };
        if !filter.matches_partner(partner) {
            continue;
        }
        grouped
            .entry(row.partner_id.as_str())
            .or_insert_with(|| (partner, Vec::new()))
            .1
            .push(row);
    }

    let platform_weight = context.platform_weight();

    grouped
        .into_values()
        .filter_map(|(partner, mut rows)| {
            let category = filter.category.or_else(|| partner.primary_category())?;
            rows.sort_by(|left, right| left.canonical_cmp(right));
            Some(aggregate_partner(partner, category, &rows, context, platform_weight))
        })
        .collect()
}

fn aggregate_partner(
    partner: &Partner,
    category: Category,
    rows: &[&StorePartnerMetric],
    context: &AggregationContext<'_>,
    platform_weight: f64,
) -> EngineResult<PartnerAggregate> {
    let mut total_gmv = 0.0;
    let mut total_rebate = 0.0;
    let mut total_revenue = 0.0;
    let mut weighted_upstream_fit = 0.0;
    let mut upstream_weight = 0.0;
    // A store counts once however many periods it reports.
    let mut store_weights: BTreeMap<&str, f64> = BTreeMap::new();

    for row in rows {
        total_gmv += row.monthly_gmv;
        total_rebate += row.rebate_generated;
        total_revenue += row.partner_revenue;

        let weight = context.weighting.weight(context.tier_for(row));
        weighted_upstream_fit += weight * row.fit_score_raw;
        upstream_weight += weight;
        store_weights
            .entry(row.store_id.as_str())
            .and_modify(|existing| *existing = existing.max(weight))
            .or_insert(weight);
    }

    let raw_fit: f64 = store_weights.values().sum();
    let covered_weight: f64 = store_weights
        .iter()
        .filter(|(store_id, _)| context.store_tiers.contains_key(*store_id))
        .map(|(_, weight)| weight)
        .sum();
    let store_coverage = if platform_weight > 0.0 {
        (100.0 * covered_weight / platform_weight).clamp(0.0, 100.0)
    } else {
        0.0
    };
    let upstream_fit = if upstream_weight > 0.0 {
        weighted_upstream_fit / upstream_weight
    } else {
        0.0
    };

    let subject = format!("partner '{}'", partner.id);
    for (field, value) in [
        ("total_gmv", total_gmv),
        ("total_rebate", total_rebate),
        ("total_revenue", total_revenue),
        ("raw_fit", raw_fit),
        ("upstream_fit", upstream_fit),
    ] {
        ensure_finite_total(&subject, field, value)?;
    }

    Ok(PartnerAggregate {
        partner_id: partner.id.clone(),
        partner_name: partner.name.clone(),
        category,
        total_gmv,
        total_rebate,
        total_revenue,
        total_stores: store_weights.len(),
        raw_fit,
        upstream_fit,
        store_coverage,
        row_count: rows.len(),
    })
}

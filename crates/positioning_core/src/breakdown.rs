//! Per-store revenue attribution.
//!
//! For one store, merges each partner's period rows into a single item and
//! reports the partner's GMV, revenue and rebate alongside its share of the
//! store totals.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::contract::{ensure_finite_total, PartnerDirectory};
use crate::error::EngineResult;
use crate::model::{Partner, PeriodWindow, StorePartnerMetric, StoreRevenueBreakdownItem};

/// Where an item's `rebate_percentage` comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateSource {
    /// Upstream value from the latest period row.
    #[default]
    PassThrough,
    /// `rebate / gmv * 100` over the merged rows.
    Recomputed,
}

/// Rebate as a percent of GMV, 0 when there is no GMV.
pub fn rebate_rate(rebate: f64, gmv: f64) -> f64 {
    if gmv == 0.0 {
        0.0
    } else {
        rebate / gmv * 100.0
    }
}

/// `part` as a percent of `total`, 0 when the total is 0.
pub fn share_of(part: f64, total: f64) -> f64 {
    if total == 0.0 {
        0.0
    } else {
        part / total * 100.0
    }
}

/// Breakdown rows for `store_id`, largest GMV first.
///
/// Returns an empty list when the store has no rows in the window, and an
/// error when merged sums or derived rates overflow.
pub fn store_breakdown(
    store_id: &str,
    directory: &PartnerDirectory<'_>,
    metrics: &[StorePartnerMetric],
    period: Option<&PeriodWindow>,
    rate_source: RateSource,
) -> EngineResult<Vec<StoreRevenueBreakdownItem>> {
    let mut grouped: BTreeMap<&str, (&Partner, Vec<&StorePartnerMetric>)> = BTreeMap::new();
    for row in metrics {
        if row.store_id != store_id {
            continue;
        }
        if period.is_some_and(|window| !row.overlaps(window)) {
            continue;
        }
        let Some(partner) = directory.get(&row.partner_id) else {
            continue;
        };
        grouped
            .entry(row.partner_id.as_str())
            .or_insert_with(|| (partner, Vec::new()))
            .1
            .push(row);
    }

    let mut items: Vec<StoreRevenueBreakdownItem> = grouped
        .into_values()
        .filter_map(|(partner, mut rows)| {
            rows.sort_by(|left, right| left.canonical_cmp(right));
            merge_partner_rows(partner, &rows, rate_source)
        })
        .collect();

    let store_gmv: f64 = items.iter().map(|item| item.gmv).sum();
    let store_rebate: f64 = items.iter().map(|item| item.rebate).sum();
    let store = format!("store '{store_id}'");
    ensure_finite_total(&store, "gmv", store_gmv)?;
    ensure_finite_total(&store, "rebate", store_rebate)?;
    for item in &mut items {
        item.gmv_share = share_of(item.gmv, store_gmv);
        item.rebate_share = share_of(item.rebate, store_rebate);
        ensure_finite_item(&store, item)?;
    }

    items.sort_by(|left, right| {
        right
            .gmv
            .total_cmp(&left.gmv)
            .then_with(|| left.partner_id.cmp(&right.partner_id))
    });
    Ok(items)
}

fn ensure_finite_item(store: &str, item: &StoreRevenueBreakdownItem) -> EngineResult<()> {
    let subject = format!("{store} partner '{}'", item.partner_id);
    for (field, value) in [
        ("gmv", item.gmv),
        ("partner_revenue", item.partner_revenue),
        ("rebate", item.rebate),
        ("rebate_percentage", item.rebate_percentage),
        ("gmv_share", item.gmv_share),
        ("rebate_share", item.rebate_share),
    ] {
        ensure_finite_total(&subject, field, value)?;
    }
    Ok(())
}

fn merge_partner_rows(
    partner: &Partner,
    rows: &[&StorePartnerMetric],
    rate_source: RateSource,
) -> Option<StoreRevenueBreakdownItem> {
    let category = partner.primary_category()?;
    let latest = rows.iter().max_by(|left, right| {
        left.period_end
            .cmp(&right.period_end)
            .then_with(|| left.period_start.cmp(&right.period_start))
            .then_with(|| left.canonical_cmp(right))
    })?;

    let gmv: f64 = rows.iter().map(|row| row.monthly_gmv).sum();
    let partner_revenue: f64 = rows.iter().map(|row| row.partner_revenue).sum();
    let rebate: f64 = rows.iter().map(|row| row.rebate_generated).sum();

    let rebate_percentage = match rate_source {
        RateSource::PassThrough => latest.rebate_percentage,
        RateSource::Recomputed => rebate_rate(rebate, gmv),
    };

    Some(StoreRevenueBreakdownItem {
        partner_id: partner.id.clone(),
        partner_name: partner.name.clone(),
        category,
        gmv,
        partner_revenue,
        rebate,
        rebate_percentage,
        roi: latest.roi,
        gmv_share: 0.0,
        rebate_share: 0.0,
        period_count: rows.len(),
    })
}

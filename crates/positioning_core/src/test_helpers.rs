//! Test helpers for building snapshots.
//!
//! Shared fixtures so unit tests, integration tests and benches describe
//! partners, stores and metric rows the same way.

use chrono::NaiveDate;

use crate::model::{Category, Partner, Store, StorePartnerMetric, StoreTier};

/// Year every fixture period falls in.
pub const TEST_YEAR: i32 = 2024;

/// Upstream ROI carried by fixture rows. Tests only check it is passed through.
pub const TEST_ROI: f64 = 1.25;

/// First and last day of `month` in [`TEST_YEAR`].
///
/// # Panics
///
/// Panics if `month` is not in `1..=12`.
pub fn test_period(month: u32) -> (NaiveDate, NaiveDate) {
    let start = NaiveDate::from_ymd_opt(TEST_YEAR, month, 1).expect("month should be 1..=12");
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(TEST_YEAR + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(TEST_YEAR, month + 1, 1)
    }
    .expect("next month should exist");
    let end = next.pred_opt().expect("month should have a last day");
    (start, end)
}

pub fn test_partner(id: &str, categories: Vec<Category>) -> Partner {
    Partner::new(id, format!("Partner {id}"), categories)
}

pub fn payment_partner(id: &str) -> Partner {
    test_partner(id, vec![Category::Payment])
}

pub fn test_store(id: &str, tier: StoreTier) -> Store {
    Store::new(id, format!("Store {id}"), tier)
}

/// A January row with revenue at 2% of GMV and an upstream rebate rate that
/// matches `rebate / gmv`.
pub fn test_metric(
    store_id: &str,
    partner_id: &str,
    tier: StoreTier,
    gmv: f64,
    rebate: f64,
) -> StorePartnerMetric {
    test_metric_for_month(store_id, partner_id, tier, gmv, rebate, 1)
}

pub fn test_metric_for_month(
    store_id: &str,
    partner_id: &str,
    tier: StoreTier,
    gmv: f64,
    rebate: f64,
    month: u32,
) -> StorePartnerMetric {
    let (period_start, period_end) = test_period(month);
    StorePartnerMetric {
        store_id: store_id.to_string(),
        partner_id: partner_id.to_string(),
        period_start,
        period_end,
        store_tier: tier,
        monthly_gmv: gmv,
        partner_revenue: gmv * 0.02,
        rebate_generated: rebate,
        rebate_percentage: if gmv == 0.0 { 0.0 } else { rebate / gmv * 100.0 },
        roi: TEST_ROI,
        fit_score_raw: 50.0,
    }
}

#![allow(dead_code)]

use positioning_core::test_helpers::{
    payment_partner, test_metric, test_metric_for_month, test_partner, test_store,
};
use positioning_core::{Category, Partner, Store, StorePartnerMetric, StoreTier};

/// Two payment partners from the reference scenario.
///
/// A sells in two medium stores (GMV 100,000, rebate 5,000); B sells in one
/// (GMV 50,000, rebate 8,000).
pub fn two_payment_partners() -> (Vec<Partner>, Vec<Store>, Vec<StorePartnerMetric>) {
    let partners = vec![payment_partner("a"), payment_partner("b")];
    let stores = vec![
        test_store("s1", StoreTier::Medium),
        test_store("s2", StoreTier::Medium),
    ];
    let metrics = vec![
        test_metric("s1", "a", StoreTier::Medium, 60_000.0, 3_000.0),
        test_metric("s2", "a", StoreTier::Medium, 40_000.0, 2_000.0),
        test_metric("s1", "b", StoreTier::Medium, 50_000.0, 8_000.0),
    ];
    (partners, stores, metrics)
}

/// A mixed-category snapshot spanning three months and four stores.
pub fn mixed_snapshot() -> (Vec<Partner>, Vec<Store>, Vec<StorePartnerMetric>) {
    let partners = vec![
        test_partner("courier", vec![Category::Logistic]),
        test_partner("wallet", vec![Category::Payment]),
        test_partner("bazaar", vec![Category::Marketplace, Category::Payment]),
        test_partner("freight", vec![Category::Logistic]),
        test_partner("dormant", vec![Category::Payment]),
    ];
    let stores = vec![
        test_store("north", StoreTier::Large),
        test_store("south", StoreTier::Medium),
        test_store("east", StoreTier::Small),
        test_store("west", StoreTier::Small),
    ];
    let mut metrics = Vec::new();
    for month in 1..=3 {
        metrics.extend([
            test_metric_for_month("north", "courier", StoreTier::Large, 40_000.0, 1_200.0, month),
            test_metric_for_month("south", "courier", StoreTier::Medium, 20_000.0, 500.0, month),
            test_metric_for_month("north", "wallet", StoreTier::Large, 90_000.0, 4_500.0, month),
            test_metric_for_month("east", "bazaar", StoreTier::Small, 15_000.0, 2_250.0, month),
            test_metric_for_month("west", "bazaar", StoreTier::Small, 12_000.0, 1_800.0, month),
            test_metric_for_month("south", "freight", StoreTier::Medium, 8_000.0, 160.0, month),
        ]);
    }
    metrics.push(test_metric_for_month("east", "freight", StoreTier::Small, 4_000.0, 80.0, 2));
    (partners, stores, metrics)
}

pub fn total_rebate_for_store(metrics: &[StorePartnerMetric], store_id: &str) -> f64 {
    metrics
        .iter()
        .filter(|row| row.store_id == store_id)
        .map(|row| row.rebate_generated)
        .sum()
}

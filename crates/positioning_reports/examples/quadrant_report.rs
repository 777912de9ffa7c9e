//! Example: quadrant charts and store breakdowns for a partner snapshot.
//!
//! This example demonstrates how to:
//! 1. Load a snapshot (or generate a synthetic one)
//! 2. Compute quadrant positions for every category cohort in parallel
//! 3. Rank partners and break the busiest store down by partner
//! 4. Export the chart and table rows to CSV/JSON
//!
//! Usage:
//! `cargo run -p positioning_reports --example quadrant_report [snapshot.json] [engine.json]`
//! Set `RUST_LOG=debug` to see the engine's own tracing.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use positioning_core::{
    Category, Partner, PositioningEngine, Store, StorePartnerMetric, StoreRevenueBreakdownItem,
    StoreTier,
};
use positioning_reports::{
    all_cohorts, engine_from_config_file, export_breakdown_to_csv, export_cohorts_to_json,
    export_quadrants_to_csv, run_category_cohorts, run_store_breakdowns, top_partners,
    JsonSnapshotFile, RankingKey, Snapshot, SnapshotSource,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::EnvFilter;

const OUTPUT_DIR: &str = "positioning_report";

fn synthetic_snapshot(seed: u64) -> Snapshot {
    let mut rng = StdRng::seed_from_u64(seed);
    let tiers = [StoreTier::Small, StoreTier::Medium, StoreTier::Large];

    let partners: Vec<Partner> = (0..12)
        .map(|i| {
            let category = Category::ALL[i % Category::ALL.len()];
            Partner::new(format!("partner-{i:02}"), format!("Partner {i:02}"), vec![category])
        })
        .collect();
    let stores: Vec<Store> = (0..40)
        .map(|i| {
            Store::new(
                format!("store-{i:02}"),
                format!("Store {i:02}"),
                tiers[rng.gen_range(0..tiers.len())],
            )
        })
        .collect();

    let mut metrics = Vec::new();
    for store in &stores {
        for partner in &partners {
            if rng.gen_range(0..3) != 0 {
                continue;
            }
            for month in 1..=3 {
                let (Some(period_start), Some(period_end)) = (
                    NaiveDate::from_ymd_opt(2024, month, 1),
                    NaiveDate::from_ymd_opt(2024, month, 28),
                ) else {
                    continue;
                };
                let monthly_gmv: f64 = rng.gen_range(5_000.0..150_000.0);
                let rebate_generated = monthly_gmv * rng.gen_range(0.005..0.08);
                metrics.push(StorePartnerMetric {
                    store_id: store.id.clone(),
                    partner_id: partner.id.clone(),
                    period_start,
                    period_end,
                    store_tier: store.tier,
                    monthly_gmv,
                    partner_revenue: monthly_gmv * 0.02,
                    rebate_generated,
                    rebate_percentage: rebate_generated / monthly_gmv * 100.0,
                    roi: rng.gen_range(0.5..3.0),
                    fit_score_raw: rng.gen_range(0.0..100.0),
                });
            }
        }
    }

    Snapshot::new(partners, stores, metrics)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let snapshot = match args.next() {
        Some(path) => JsonSnapshotFile::new(path).load()?,
        None => {
            println!("No snapshot given, generating a synthetic one...");
            synthetic_snapshot(42)
        }
    };
    let engine = match args.next() {
        Some(path) => engine_from_config_file(path)?,
        None => PositioningEngine::default(),
    };
    println!(
        "Snapshot: {} partners, {} stores, {} metric rows",
        snapshot.partners.len(),
        snapshot.stores.len(),
        snapshot.metrics.len()
    );

    let cohorts = run_category_cohorts(&engine, &snapshot, &all_cohorts(), None)?;
    for cohort in &cohorts {
        let label = cohort.category.map_or("all", Category::as_str);
        println!("\n=== Cohort: {label} ({} partners) ===", cohort.positions.len());
        for bucket in &cohort.summary.buckets {
            println!(
                "{:<11} {:>3} partners  GMV {:>14.2}  rebate {:>12.2}",
                bucket.quadrant.as_str(),
                bucket.partners,
                bucket.total_gmv,
                bucket.total_rebate
            );
        }
    }

    let unfiltered = &cohorts[0].positions;
    println!("\n=== Top partners by combined score ===");
    for position in top_partners(unfiltered, RankingKey::CombinedScore, 5) {
        println!(
            "{:<12} fit {:>6.1}  rebate {:>6.1}  {}",
            position.partner_id, position.fit_score, position.rebate_score, position.quadrant
        );
    }

    let breakdowns = run_store_breakdowns(&engine, &snapshot, &snapshot.store_ids(), None)?;
    let store_gmv =
        |items: &[StoreRevenueBreakdownItem]| items.iter().map(|item| item.gmv).sum::<f64>();
    let busiest = breakdowns
        .iter()
        .max_by(|a, b| store_gmv(&a.items).total_cmp(&store_gmv(&b.items)));

    println!("\nExporting results...");
    let out = Path::new(OUTPUT_DIR);
    fs::create_dir_all(out)?;
    export_cohorts_to_json(&cohorts, out.join("cohorts.json"))?;
    if !unfiltered.is_empty() {
        export_quadrants_to_csv(unfiltered, out.join("quadrants.csv"))?;
    }
    if let Some(store) = busiest.filter(|store| !store.items.is_empty()) {
        println!("Busiest store: {} ({} partners)", store.store_id, store.items.len());
        export_breakdown_to_csv(&store.items, out.join("breakdown.csv"))?;
    }
    println!("Exported to {OUTPUT_DIR}/");

    Ok(())
}

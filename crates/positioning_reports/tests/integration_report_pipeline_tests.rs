use std::fs;
use std::path::Path;

use positioning_core::test_helpers::{
    payment_partner, test_metric_for_month, test_partner, test_store,
};
use positioning_core::{
    result_fingerprint, Category, EngineConfig, PositioningEngine, Quadrant, QuadrantThresholds,
    StorePartnerMetric, StoreTier,
};
use positioning_reports::{
    all_cohorts, engine_from_config_file, export_cohorts_to_json, export_quadrants_to_csv,
    run_category_cohorts, run_store_breakdowns, save_engine_config, top_partners,
    write_snapshot_file, CsvMetricsSource, JsonSnapshotFile, RankingKey, Snapshot, SnapshotSource,
};
use tempfile::TempDir;

fn snapshot() -> Snapshot {
    let partners = vec![
        payment_partner("wallet"),
        payment_partner("cardco"),
        test_partner("courier", vec![Category::Logistic]),
    ];
    let stores = vec![
        test_store("north", StoreTier::Large),
        test_store("south", StoreTier::Medium),
        test_store("east", StoreTier::Small),
    ];
    let mut metrics = Vec::new();
    for month in 1..=2 {
        metrics.extend([
            test_metric_for_month("north", "wallet", StoreTier::Large, 80_000.0, 2_400.0, month),
            test_metric_for_month("south", "wallet", StoreTier::Medium, 30_000.0, 900.0, month),
            test_metric_for_month("east", "cardco", StoreTier::Small, 20_000.0, 4_000.0, month),
            test_metric_for_month("north", "courier", StoreTier::Large, 15_000.0, 300.0, month),
        ]);
    }
    Snapshot::new(partners, stores, metrics)
}

fn write_csv_source(dir: &Path, snapshot: &Snapshot) -> CsvMetricsSource {
    let directory_path = dir.join("directory.json");
    let directory = serde_json::json!({
        "version": 1,
        "partners": snapshot.partners,
        "stores": snapshot.stores,
    });
    fs::write(&directory_path, directory.to_string()).unwrap();

    let metrics_path = dir.join("metrics.csv");
    let mut writer = csv::Writer::from_path(&metrics_path).unwrap();
    for row in &snapshot.metrics {
        writer.serialize(row).unwrap();
    }
    writer.flush().unwrap();

    CsvMetricsSource::new(directory_path, metrics_path)
}

#[test]
fn json_and_csv_sources_produce_identical_positions() {
    let dir = TempDir::new().unwrap();
    let snapshot = snapshot();

    let json_path = dir.path().join("snapshot.json");
    write_snapshot_file(&json_path, &snapshot).unwrap();
    let from_json = JsonSnapshotFile::new(&json_path).load().unwrap();
    let from_csv = write_csv_source(dir.path(), &snapshot).load().unwrap();

    let engine = PositioningEngine::default();
    let json_positions = engine.quadrant_positions(&from_json.quadrant_query()).unwrap();
    let csv_positions = engine.quadrant_positions(&from_csv.quadrant_query()).unwrap();

    assert_eq!(
        result_fingerprint(&json_positions).unwrap(),
        result_fingerprint(&csv_positions).unwrap()
    );
    let rows: Vec<StorePartnerMetric> = from_csv.metrics;
    assert_eq!(rows, snapshot.metrics);
}

#[test]
fn config_file_changes_classification() {
    let dir = TempDir::new().unwrap();
    let snapshot = snapshot();
    let query = snapshot.quadrant_query().with_category(Some(Category::Payment));

    let default_positions = PositioningEngine::default().quadrant_positions(&query).unwrap();
    let wallet = default_positions
        .iter()
        .find(|p| p.partner_id == "wallet")
        .unwrap();
    assert_eq!(wallet.quadrant, Quadrant::Challenger);

    // A zero rebate bar turns every high-fit partner into a leader.
    let config_path = dir.path().join("engine.json");
    let config = EngineConfig::default().with_thresholds(QuadrantThresholds::new(70.0, 0.0));
    save_engine_config(&config_path, &config).unwrap();
    let engine = engine_from_config_file(&config_path).unwrap();

    let tuned = engine.quadrant_positions(&query).unwrap();
    let wallet = tuned.iter().find(|p| p.partner_id == "wallet").unwrap();
    assert_eq!(wallet.quadrant, Quadrant::Leader);
}

#[test]
fn cohort_run_exports_every_cohort() {
    let dir = TempDir::new().unwrap();
    let snapshot = snapshot();
    let engine = PositioningEngine::default();

    let cohorts = run_category_cohorts(&engine, &snapshot, &all_cohorts(), Some(2)).unwrap();
    let out = dir.path().join("cohorts.json");
    export_cohorts_to_json(&cohorts, &out).unwrap();

    let exported: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    let array = exported.as_array().unwrap();
    assert_eq!(array.len(), cohorts.len());
    assert!(array[0]["category"].is_null());
    assert_eq!(array[0]["positions"].as_array().unwrap().len(), 3);
    assert_eq!(array[0]["summary"]["buckets"].as_array().unwrap().len(), 4);

    let marketplace = cohorts
        .iter()
        .find(|c| c.category == Some(Category::Marketplace))
        .unwrap();
    assert!(marketplace.positions.is_empty());
}

#[test]
fn store_breakdowns_cover_every_known_store() {
    let snapshot = snapshot();
    let engine = PositioningEngine::default();
    let store_ids = snapshot.store_ids();

    let results = run_store_breakdowns(&engine, &snapshot, &store_ids, None).unwrap();
    assert_eq!(results.len(), 3);

    let north = results.iter().find(|r| r.store_id == "north").unwrap();
    let rebate: f64 = north.items.iter().map(|item| item.rebate).sum();
    assert!((rebate - 2.0 * (2_400.0 + 300.0)).abs() < 1e-6);
    assert_eq!(north.items[0].partner_id, "wallet");
    assert_eq!(north.items[0].period_count, 2);
}

#[test]
fn leaderboard_export_round_trip() {
    let dir = TempDir::new().unwrap();
    let snapshot = snapshot();
    let positions = PositioningEngine::default()
        .quadrant_positions(&snapshot.quadrant_query())
        .unwrap();

    let top: Vec<_> = top_partners(&positions, RankingKey::TotalGmv, 2)
        .into_iter()
        .cloned()
        .collect();
    assert_eq!(top[0].partner_id, "wallet");

    let out = dir.path().join("top.csv");
    export_quadrants_to_csv(&top, &out).unwrap();
    let contents = fs::read_to_string(&out).unwrap();
    assert_eq!(contents.lines().count(), 3);
}

//! File sources, parallel runs and exports around `positioning_core`.
//!
//! The engine itself never touches the filesystem. This crate is the outer
//! boundary: it loads snapshots and engine configs, fans computations out over
//! a thread pool and writes the rows the dashboard charts and tables consume.
//!
//! # Quick Start
//!
//! ```no_run
//! use positioning_reports::{
//!     all_cohorts, export_cohorts_to_json, run_category_cohorts, JsonSnapshotFile,
//!     SnapshotSource,
//! };
//! use positioning_core::PositioningEngine;
//!
//! let snapshot = JsonSnapshotFile::new("snapshot.json").load()?;
//! let engine = PositioningEngine::default();
//!
//! // One quadrant chart per category, plus the unfiltered one
//! let cohorts = run_category_cohorts(&engine, &snapshot, &all_cohorts(), None)?;
//! export_cohorts_to_json(&cohorts, "cohorts.json")?;
//! # Ok::<(), positioning_reports::ReportError>(())
//! ```
//!
//! # Architecture
//!
//! - [`snapshot`]: the data-access boundary and its file-backed sources
//! - [`config`]: versioned engine config files
//! - [`runner`]: parallel cohort and store runs using rayon
//! - [`ranking`]: leaderboards over quadrant positions
//! - [`export`]: CSV/JSON export of positions and breakdowns

pub mod config;
pub mod error;
pub mod export;
pub mod ranking;
pub mod runner;
pub mod snapshot;

pub use config::{engine_from_config_file, load_engine_config, save_engine_config};
pub use error::{ReportError, ReportResult};
pub use export::{
    export_breakdown_to_csv, export_breakdown_to_json, export_cohorts_to_json,
    export_quadrants_to_csv, export_quadrants_to_json,
};
pub use ranking::{find_best_position_index, rank_by, top_partners, RankingKey};
pub use runner::{
    all_cohorts, run_category_cohorts, run_store_breakdowns, CohortResult, StoreBreakdownResult,
};
pub use snapshot::{
    write_snapshot_file, CsvMetricsSource, InMemorySnapshot, JsonSnapshotFile, Snapshot,
    SnapshotSource,
};

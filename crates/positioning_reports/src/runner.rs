//! Parallel report execution using rayon.
//!
//! Each cohort (category filter) and each store breakdown is an independent
//! pure computation over the same borrowed snapshot, so they fan out across a
//! thread pool with no shared mutable state. Results keep input order.

use positioning_core::{
    summarize_quadrants, Category, GartnerQuadrant, PositioningEngine, QuadrantSummary,
    StoreRevenueBreakdownItem,
};
use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::error::ReportResult;
use crate::snapshot::Snapshot;

/// Quadrant positions for one category filter (`None` = all partners).
#[derive(Debug, Clone, Serialize)]
pub struct CohortResult {
    pub category: Option<Category>,
    pub positions: Vec<GartnerQuadrant>,
    pub summary: QuadrantSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct StoreBreakdownResult {
    pub store_id: String,
    pub items: Vec<StoreRevenueBreakdownItem>,
}

/// The unfiltered cohort followed by one cohort per category.
pub fn all_cohorts() -> Vec<Option<Category>> {
    std::iter::once(None)
        .chain(Category::ALL.iter().copied().map(Some))
        .collect()
}

fn build_pool(num_threads: Option<usize>) -> ReportResult<rayon::ThreadPool> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(threads) = num_threads {
        builder = builder.num_threads(threads);
    }
    Ok(builder.build()?)
}

/// Compute quadrant positions for several category filters in parallel.
///
/// # Arguments
///
/// * `engine` - Configured engine shared by every cohort
/// * `snapshot` - Snapshot all cohorts are computed from
/// * `cohorts` - Category filters to compute
/// * `num_threads` - Optional pool size. If None, uses rayon's default.
///
/// # Errors
///
/// Returns the first engine error; a malformed snapshot fails every cohort
/// the same way.
pub fn run_category_cohorts(
    engine: &PositioningEngine,
    snapshot: &Snapshot,
    cohorts: &[Option<Category>],
    num_threads: Option<usize>,
) -> ReportResult<Vec<CohortResult>> {
    let pool = build_pool(num_threads)?;
    let results = pool.install(|| {
        cohorts
            .par_iter()
            .map(|&category| -> ReportResult<CohortResult> {
                let query = snapshot.quadrant_query().with_category(category);
                let positions = engine.quadrant_positions(&query)?;
                let summary = summarize_quadrants(&positions);
                Ok(CohortResult {
                    category,
                    positions,
                    summary,
                })
            })
            .collect::<ReportResult<Vec<_>>>()
    })?;

    info!(
        cohorts = results.len(),
        threads = pool.current_num_threads(),
        "computed quadrant cohorts"
    );
    Ok(results)
}

/// Compute revenue breakdowns for many stores in parallel.
pub fn run_store_breakdowns(
    engine: &PositioningEngine,
    snapshot: &Snapshot,
    store_ids: &[String],
    num_threads: Option<usize>,
) -> ReportResult<Vec<StoreBreakdownResult>> {
    let pool = build_pool(num_threads)?;
    let results = pool.install(|| {
        store_ids
            .par_iter()
            .map(|store_id| -> ReportResult<StoreBreakdownResult> {
                let items = engine.store_breakdown(&snapshot.breakdown_query(store_id))?;
                Ok(StoreBreakdownResult {
                    store_id: store_id.clone(),
                    items,
                })
            })
            .collect::<ReportResult<Vec<_>>>()
    })?;

    info!(stores = results.len(), "computed store breakdowns");
    Ok(results)
}

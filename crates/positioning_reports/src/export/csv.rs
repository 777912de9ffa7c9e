use std::fs::File;
use std::path::Path;

use positioning_core::{GartnerQuadrant, StoreRevenueBreakdownItem};

use crate::error::{ReportError, ReportResult};

pub(crate) fn export_quadrants_impl(
    positions: &[GartnerQuadrant],
    file: File,
    path: &Path,
) -> ReportResult<()> {
    let mut wtr = csv::Writer::from_writer(file);

    wtr.write_record([
        "partner_id",
        "partner_name",
        "category",
        "quadrant",
        "fit_score",
        "rebate_score",
        "total_stores",
        "total_gmv",
        "total_rebate",
        "total_revenue",
        "avg_rebate_per_store",
        "store_coverage",
    ])?;

    for position in positions {
        wtr.write_record([
            position.partner_id.as_str(),
            position.partner_name.as_str(),
            position.category.as_str(),
            position.quadrant.as_str(),
            &position.fit_score.to_string(),
            &position.rebate_score.to_string(),
            &position.total_stores.to_string(),
            &position.total_gmv.to_string(),
            &position.total_rebate.to_string(),
            &position.total_revenue.to_string(),
            &position.avg_rebate_per_store.to_string(),
            &position.store_coverage.to_string(),
        ])?;
    }

    wtr.flush().map_err(|error| ReportError::io(path, error))
}

pub(crate) fn export_breakdown_impl(
    items: &[StoreRevenueBreakdownItem],
    file: File,
    path: &Path,
) -> ReportResult<()> {
    let mut wtr = csv::Writer::from_writer(file);

    wtr.write_record([
        "partner_id",
        "partner_name",
        "category",
        "gmv",
        "partner_revenue",
        "rebate",
        "rebate_percentage",
        "roi",
        "gmv_share",
        "rebate_share",
        "period_count",
    ])?;

    for item in items {
        wtr.write_record([
            item.partner_id.as_str(),
            item.partner_name.as_str(),
            item.category.as_str(),
            &item.gmv.to_string(),
            &item.partner_revenue.to_string(),
            &item.rebate.to_string(),
            &item.rebate_percentage.to_string(),
            &item.roi.to_string(),
            &item.gmv_share.to_string(),
            &item.rebate_share.to_string(),
            &item.period_count.to_string(),
        ])?;
    }

    wtr.flush().map_err(|error| ReportError::io(path, error))
}

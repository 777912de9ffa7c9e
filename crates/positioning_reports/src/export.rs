//! Export of derived rows for charts and tables.
//!
//! CSV exports refuse empty result sets; JSON exports write `[]` so that a
//! dashboard can always load the file.

use std::path::Path;

use positioning_core::{GartnerQuadrant, StoreRevenueBreakdownItem};
use tracing::info;

use crate::error::ReportResult;
use crate::runner::CohortResult;

#[path = "export/csv.rs"]
mod csv;
#[path = "export/json.rs"]
mod json;
#[path = "export/writer_utils.rs"]
mod writer_utils;

/// Export quadrant positions to CSV, one row per partner.
///
/// # Errors
///
/// Returns [`ReportError::NothingToExport`](crate::error::ReportError::NothingToExport)
/// for an empty slice, or an I/O / CSV error.
pub fn export_quadrants_to_csv(
    positions: &[GartnerQuadrant],
    path: impl AsRef<Path>,
) -> ReportResult<()> {
    let path = path.as_ref();
    writer_utils::ensure_not_empty(positions)?;
    let file = writer_utils::create_output_file(path)?;
    csv::export_quadrants_impl(positions, file, path)?;
    info!(path = %path.display(), rows = positions.len(), "exported quadrant CSV");
    Ok(())
}

pub fn export_quadrants_to_json(
    positions: &[GartnerQuadrant],
    path: impl AsRef<Path>,
) -> ReportResult<()> {
    let path = path.as_ref();
    let file = writer_utils::create_output_file(path)?;
    json::export_to_json_impl(positions, file, path)
}

/// Export one store's breakdown to CSV, one row per partner.
pub fn export_breakdown_to_csv(
    items: &[StoreRevenueBreakdownItem],
    path: impl AsRef<Path>,
) -> ReportResult<()> {
    let path = path.as_ref();
    writer_utils::ensure_not_empty(items)?;
    let file = writer_utils::create_output_file(path)?;
    csv::export_breakdown_impl(items, file, path)?;
    info!(path = %path.display(), rows = items.len(), "exported breakdown CSV");
    Ok(())
}

pub fn export_breakdown_to_json(
    items: &[StoreRevenueBreakdownItem],
    path: impl AsRef<Path>,
) -> ReportResult<()> {
    let path = path.as_ref();
    let file = writer_utils::create_output_file(path)?;
    json::export_to_json_impl(items, file, path)
}

/// Export every cohort (positions plus legend summary) as one JSON array.
pub fn export_cohorts_to_json(
    cohorts: &[CohortResult],
    path: impl AsRef<Path>,
) -> ReportResult<()> {
    let path = path.as_ref();
    let file = writer_utils::create_output_file(path)?;
    json::export_to_json_impl(cohorts, file, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReportError;
    use positioning_core::test_helpers::{payment_partner, test_metric, test_store};
    use positioning_core::{
        compute_quadrant_positions, compute_store_breakdown, Category, Quadrant, StoreTier,
    };
    use tempfile::NamedTempFile;

    fn positions() -> Vec<GartnerQuadrant> {
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
        compute_quadrant_positions(&partners, &stores, &metrics, Some(Category::Payment)).unwrap()
    }

    #[test]
    fn quadrant_csv_has_header_and_rows() {
        let file = NamedTempFile::new().unwrap();
        export_quadrants_to_csv(&positions(), file.path()).unwrap();

        let mut reader = ::csv::Reader::from_path(file.path()).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[0], "partner_id");
        assert_eq!(&headers[3], "quadrant");

        let rows: Vec<::csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "a");
        assert_eq!(&rows[0][3], Quadrant::Challenger.as_str());
        assert_eq!(&rows[1][3], Quadrant::Niche.as_str());
    }

    #[test]
    fn quadrant_json_round_trips() {
        let file = NamedTempFile::new().unwrap();
        let positions = positions();
        export_quadrants_to_json(&positions, file.path()).unwrap();

        let contents = std::fs::read_to_string(file.path()).unwrap();
        let loaded: Vec<GartnerQuadrant> = serde_json::from_str(&contents).unwrap();
        assert_eq!(loaded, positions);
    }

    #[test]
    fn empty_csv_export_is_an_error() {
        let file = NamedTempFile::new().unwrap();
        let error = export_breakdown_to_csv(&[], file.path()).unwrap_err();
        assert!(matches!(error, ReportError::NothingToExport));
    }

    #[test]
    fn empty_json_export_writes_an_empty_array() {
        let file = NamedTempFile::new().unwrap();
        export_breakdown_to_json(&[], file.path()).unwrap();

        let contents = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(contents.trim(), "[]");
    }

    #[test]
    fn breakdown_csv_lists_each_partner() {
        let partners = vec![payment_partner("a"), payment_partner("b")];
        let metrics = vec![
            test_metric("s1", "a", StoreTier::Medium, 60_000.0, 3_000.0),
            test_metric("s1", "b", StoreTier::Medium, 50_000.0, 8_000.0),
        ];
        let items = compute_store_breakdown("s1", &partners, &metrics).unwrap();

        let file = NamedTempFile::new().unwrap();
        export_breakdown_to_csv(&items, file.path()).unwrap();

        let contents = std::fs::read_to_string(file.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("partner_id,partner_name,category,gmv"));
        assert!(lines[1].starts_with("a,Partner a,payment,60000"));
    }

    #[test]
    fn unwritable_path_is_reported() {
        let error = export_quadrants_to_json(&positions(), "/no/such/dir/out.json").unwrap_err();
        assert!(matches!(error, ReportError::Io { .. }));
    }
}

use std::fs::File;
use std::path::Path;

use crate::error::{ReportError, ReportResult};

pub(crate) fn ensure_not_empty<T>(items: &[T]) -> ReportResult<()> {
    if items.is_empty() {
        return Err(ReportError::NothingToExport);
    }
    Ok(())
}

pub(crate) fn create_output_file(path: &Path) -> ReportResult<File> {
    File::create(path).map_err(|error| ReportError::io(path, error))
}

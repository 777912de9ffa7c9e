use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::{ReportError, ReportResult};

pub(crate) fn export_to_json_impl<T: Serialize + ?Sized>(
    value: &T,
    file: File,
    path: &Path,
) -> ReportResult<()> {
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)
        .map_err(|error| ReportError::json(path, error))?;
    writer.flush().map_err(|error| ReportError::io(path, error))
}

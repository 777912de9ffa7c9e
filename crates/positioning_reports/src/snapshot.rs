//! Data-access boundary between the persistence layer and the engine.
//!
//! The engine only ever sees already-loaded collections. Anything that reads
//! files (or, in the dashboard, a remote store) implements [`SnapshotSource`]
//! and hands back a [`Snapshot`].

use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use positioning_core::{BreakdownQuery, Partner, QuadrantQuery, Store, StorePartnerMetric};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ReportError, ReportResult};

pub const SNAPSHOT_FILE_VERSION: u32 = 1;

/// Read-only copy of the three record collections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub partners: Vec<Partner>,
    #[serde(default)]
    pub stores: Vec<Store>,
    #[serde(default)]
    pub metrics: Vec<StorePartnerMetric>,
}

impl Snapshot {
    pub fn new(
        partners: Vec<Partner>,
        stores: Vec<Store>,
        metrics: Vec<StorePartnerMetric>,
    ) -> Self {
        Self {
            partners,
            stores,
            metrics,
        }
    }

    pub fn quadrant_query(&self) -> QuadrantQuery<'_> {
        QuadrantQuery::new(&self.partners, &self.stores, &self.metrics)
    }

    pub fn breakdown_query<'a>(&'a self, store_id: &'a str) -> BreakdownQuery<'a> {
        BreakdownQuery::new(store_id, &self.partners, &self.metrics)
    }

    /// Every store id known to the directory or referenced by a metric row.
    pub fn store_ids(&self) -> Vec<String> {
        self.stores
            .iter()
            .map(|store| store.id.as_str())
            .chain(self.metrics.iter().map(|row| row.store_id.as_str()))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}

pub trait SnapshotSource {
    fn partners(&self) -> ReportResult<Vec<Partner>>;
    fn stores(&self) -> ReportResult<Vec<Store>>;
    fn metrics(&self) -> ReportResult<Vec<StorePartnerMetric>>;

    fn load(&self) -> ReportResult<Snapshot> {
        Ok(Snapshot {
            partners: self.partners()?,
            stores: self.stores()?,
            metrics: self.metrics()?,
        })
    }
}

/// Snapshot already held in memory, e.g. fetched by the dashboard.
#[derive(Debug, Clone, Default)]
pub struct InMemorySnapshot {
    snapshot: Snapshot,
}

impl InMemorySnapshot {
    pub fn new(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }
}

impl SnapshotSource for InMemorySnapshot {
    fn partners(&self) -> ReportResult<Vec<Partner>> {
        Ok(self.snapshot.partners.clone())
    }

    fn stores(&self) -> ReportResult<Vec<Store>> {
        Ok(self.snapshot.stores.clone())
    }

    fn metrics(&self) -> ReportResult<Vec<StorePartnerMetric>> {
        Ok(self.snapshot.metrics.clone())
    }

    fn load(&self) -> ReportResult<Snapshot> {
        Ok(self.snapshot.clone())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotFileV1 {
    version: u32,
    #[serde(flatten)]
    snapshot: Snapshot,
}

/// Versioned JSON document holding partners, stores and metrics.
#[derive(Debug, Clone)]
pub struct JsonSnapshotFile {
    path: PathBuf,
}

impl JsonSnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotSource for JsonSnapshotFile {
    fn partners(&self) -> ReportResult<Vec<Partner>> {
        Ok(self.load()?.partners)
    }

    fn stores(&self) -> ReportResult<Vec<Store>> {
        Ok(self.load()?.stores)
    }

    fn metrics(&self) -> ReportResult<Vec<StorePartnerMetric>> {
        Ok(self.load()?.metrics)
    }

    fn load(&self) -> ReportResult<Snapshot> {
        let file: SnapshotFileV1 = read_versioned_json(&self.path)?;
        check_version("snapshot", file.version, SNAPSHOT_FILE_VERSION)?;
        info!(
            path = %self.path.display(),
            partners = file.snapshot.partners.len(),
            stores = file.snapshot.stores.len(),
            rows = file.snapshot.metrics.len(),
            "loaded snapshot"
        );
        Ok(file.snapshot)
    }
}

#[derive(Debug, Deserialize)]
struct DirectoryFileV1 {
    version: u32,
    #[serde(default)]
    partners: Vec<Partner>,
    #[serde(default)]
    stores: Vec<Store>,
}

/// Partner/store directory from JSON with metric rows from a CSV export.
///
/// The CSV header uses the metric field names (`store_id`, `partner_id`,
/// `period_start`, ...); dates are `YYYY-MM-DD` and tiers are lowercase.
#[derive(Debug, Clone)]
pub struct CsvMetricsSource {
    directory_path: PathBuf,
    metrics_path: PathBuf,
}

impl CsvMetricsSource {
    pub fn new(directory_path: impl Into<PathBuf>, metrics_path: impl Into<PathBuf>) -> Self {
        Self {
            directory_path: directory_path.into(),
            metrics_path: metrics_path.into(),
        }
    }

    fn directory(&self) -> ReportResult<DirectoryFileV1> {
        let directory: DirectoryFileV1 = read_versioned_json(&self.directory_path)?;
        check_version("directory", directory.version, SNAPSHOT_FILE_VERSION)?;
        Ok(directory)
    }
}

impl SnapshotSource for CsvMetricsSource {
    fn partners(&self) -> ReportResult<Vec<Partner>> {
        Ok(self.directory()?.partners)
    }

    fn stores(&self) -> ReportResult<Vec<Store>> {
        Ok(self.directory()?.stores)
    }

    fn metrics(&self) -> ReportResult<Vec<StorePartnerMetric>> {
        let mut reader = csv::Reader::from_path(&self.metrics_path)?;
        let metrics = reader
            .deserialize::<StorePartnerMetric>()
            .collect::<Result<Vec<_>, _>>()?;
        info!(path = %self.metrics_path.display(), rows = metrics.len(), "loaded metric rows");
        Ok(metrics)
    }

    fn load(&self) -> ReportResult<Snapshot> {
        let directory = self.directory()?;
        Ok(Snapshot {
            partners: directory.partners,
            stores: directory.stores,
            metrics: self.metrics()?,
        })
    }
}

/// Write `snapshot` as a versioned JSON document readable by [`JsonSnapshotFile`].
pub fn write_snapshot_file(path: impl AsRef<Path>, snapshot: &Snapshot) -> ReportResult<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|error| ReportError::io(path, error))?;
    let document = SnapshotFileV1 {
        version: SNAPSHOT_FILE_VERSION,
        snapshot: snapshot.clone(),
    };
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &document)
        .map_err(|error| ReportError::json(path, error))?;
    writer.flush().map_err(|error| ReportError::io(path, error))
}

pub(crate) fn read_versioned_json<T>(path: &Path) -> ReportResult<T>
where
    T: for<'de> Deserialize<'de>,
{
    let contents = fs::read_to_string(path).map_err(|error| ReportError::io(path, error))?;
    serde_json::from_str(&contents).map_err(|error| ReportError::json(path, error))
}

pub(crate) fn check_version(kind: &'static str, found: u32, expected: u32) -> ReportResult<()> {
    if found != expected {
        return Err(ReportError::UnsupportedVersion {
            kind,
            found,
            expected,
        });
    }
    Ok(())
}

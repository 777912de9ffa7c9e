//! Versioned engine configuration files.
//!
//! ```json
//! {"version": 1, "engine": {"thresholds": {"fit": 60.0, "rebate": 75.0}}}
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use positioning_core::{EngineConfig, PositioningEngine};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ReportError, ReportResult};
use crate::snapshot::{check_version, read_versioned_json};

pub const CONFIG_FILE_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct EngineConfigFileV1 {
    version: u32,
    #[serde(default)]
    engine: EngineConfig,
}

/// Read and validate an engine config file.
pub fn load_engine_config(path: impl AsRef<Path>) -> ReportResult<EngineConfig> {
    let path = path.as_ref();
    let file: EngineConfigFileV1 = read_versioned_json(path)?;
    check_version("config", file.version, CONFIG_FILE_VERSION)?;
    file.engine.validate()?;
    info!(path = %path.display(), "loaded engine config");
    Ok(file.engine)
}

pub fn save_engine_config(path: impl AsRef<Path>, config: &EngineConfig) -> ReportResult<()> {
    let path = path.as_ref();
    let document = EngineConfigFileV1 {
        version: CONFIG_FILE_VERSION,
        engine: config.clone(),
    };
    let file = File::create(path).map_err(|error| ReportError::io(path, error))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &document)
        .map_err(|error| ReportError::json(path, error))?;
    writer.flush().map_err(|error| ReportError::io(path, error))
}

pub fn engine_from_config_file(path: impl AsRef<Path>) -> ReportResult<PositioningEngine> {
    let config = load_engine_config(path)?;
    Ok(PositioningEngine::new(config)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use positioning_core::{QuadrantThresholds, RateSource, TierWeights};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn saved_config_loads_back() {
        let file = NamedTempFile::new().unwrap();
        let config = EngineConfig::default()
            .with_tier_weights(TierWeights::uniform())
            .with_rate_source(RateSource::Recomputed);
        save_engine_config(file.path(), &config).unwrap();

        assert_eq!(load_engine_config(file.path()).unwrap(), config);
    }

    #[test]
    fn missing_engine_section_uses_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"version": 1}}"#).unwrap();

        assert_eq!(load_engine_config(file.path()).unwrap(), EngineConfig::default());
    }

    #[test]
    fn invalid_thresholds_are_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"version": 1, "engine": {{"thresholds": {{"fit": 140.0, "rebate": 70.0}}}}}}"#
        )
        .unwrap();

        let error = load_engine_config(file.path()).unwrap_err();
        assert!(matches!(error, ReportError::Engine(_)));
    }

    #[test]
    fn future_versions_are_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"version": 2, "engine": {{}}}}"#).unwrap();

        let error = load_engine_config(file.path()).unwrap_err();
        assert!(matches!(
            error,
            ReportError::UnsupportedVersion { kind: "config", found: 2, .. }
        ));
    }

    #[test]
    fn engine_from_config_file_applies_thresholds() {
        let file = NamedTempFile::new().unwrap();
        let config = EngineConfig::default().with_thresholds(QuadrantThresholds::new(50.0, 90.0));
        save_engine_config(file.path(), &config).unwrap();

        let engine = engine_from_config_file(file.path()).unwrap();
        assert_eq!(engine.config().thresholds, QuadrantThresholds::new(50.0, 90.0));
    }
}

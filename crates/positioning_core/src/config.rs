use serde::{Deserialize, Serialize};

use crate::breakdown::RateSource;
use crate::classify::QuadrantThresholds;
use crate::error::EngineResult;
use crate::normalize::AxisMapping;
use crate::weighting::TierWeights;

/// Tunable policy for the positioning engine.
///
/// Every field has a default, so partial config documents only need to name
/// what they override.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub tier_weights: TierWeights,
    pub thresholds: QuadrantThresholds,
    pub axes: AxisMapping,
    pub rate_source: RateSource,
}

impl EngineConfig {
    pub fn with_tier_weights(mut self, tier_weights: TierWeights) -> Self {
        self.tier_weights = tier_weights;
        self
    }

    pub fn with_thresholds(mut self, thresholds: QuadrantThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn with_axes(mut self, axes: AxisMapping) -> Self {
        self.axes = axes;
        self
    }

    pub fn with_rate_source(mut self, rate_source: RateSource) -> Self {
        self.rate_source = rate_source;
        self
    }

    pub fn validate(&self) -> EngineResult<()> {
        self.tier_weights.validate()?;
        self.thresholds.validate()
    }
}

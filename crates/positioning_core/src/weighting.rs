use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::model::StoreTier;

/// Maps a store tier to its contribution to a partner's raw fit signal.
///
/// Implemented by [`TierWeights`] and by any `Fn(StoreTier) -> f64` closure,
/// so callers can swap the weighting policy without touching aggregation.
pub trait TierWeighting: Send + Sync {
    fn weight(&self, tier: StoreTier) -> f64;
}

impl<F> TierWeighting for F
where
    F: Fn(StoreTier) -> f64 + Send + Sync,
{
    fn weight(&self, tier: StoreTier) -> f64 {
        self(tier)
    }
}

/// Table-driven tier weighting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierWeights {
    pub small: f64,
    pub medium: f64,
    pub large: f64,
}

impl Default for TierWeights {
    fn default() -> Self {
        Self::size_scaled()
    }
}

impl TierWeights {
    pub fn new(small: f64, medium: f64, large: f64) -> Self {
        Self {
            small,
            medium,
            large,
        }
    }

    /// Larger stores count proportionally more: 1 / 2 / 3.
    pub fn size_scaled() -> Self {
        Self::new(1.0, 2.0, 3.0)
    }

    /// Every store counts the same, so fit tracks the distinct store count.
    pub fn uniform() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }

    pub fn validate(&self) -> EngineResult<()> {
        for (tier, weight) in [
            (StoreTier::Small, self.small),
            (StoreTier::Medium, self.medium),
            (StoreTier::Large, self.large),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(EngineError::invalid_config(format!(
                    "tier weight for '{}' must be a finite non-negative number, got {weight}",
                    tier.as_str()
                )));
            }
        }
        Ok(())
    }
}

impl TierWeighting for TierWeights {
    fn weight(&self, tier: StoreTier) -> f64 {
        match tier {
            StoreTier::Small => self.small,
            StoreTier::Medium => self.medium,
            StoreTier::Large => self.large,
        }
    }
}

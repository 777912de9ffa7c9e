use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::model::Quadrant;

/// Score at or above which a partner sits in the upper half of an axis.
pub const DEFAULT_QUADRANT_THRESHOLD: f64 = 70.0;

/// Per-axis cutoffs for quadrant assignment. Values equal to a cutoff count
/// as high.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuadrantThresholds {
    pub fit: f64,
    pub rebate: f64,
}

impl Default for QuadrantThresholds {
    fn default() -> Self {
        Self::uniform(DEFAULT_QUADRANT_THRESHOLD)
    }
}

impl QuadrantThresholds {
    pub fn new(fit: f64, rebate: f64) -> Self {
        Self { fit, rebate }
    }

    pub fn uniform(threshold: f64) -> Self {
        Self::new(threshold, threshold)
    }

    pub fn validate(&self) -> EngineResult<()> {
        for (axis, value) in [("fit", self.fit), ("rebate", self.rebate)] {
            if !(0.0..=100.0).contains(&value) {
                return Err(EngineError::invalid_config(format!(
                    "{axis} threshold must be within [0, 100], got {value}"
                )));
            }
        }
        Ok(())
    }

    pub fn classify(&self, fit_score: f64, rebate_score: f64) -> Quadrant {
        classify(fit_score, rebate_score, self)
    }
}

pub fn classify(fit_score: f64, rebate_score: f64, thresholds: &QuadrantThresholds) -> Quadrant {
    let high_fit = fit_score >= thresholds.fit;
    let high_rebate = rebate_score >= thresholds.rebate;
    match (high_fit, high_rebate) {
        (true, true) => Quadrant::Leader,
        (true, false) => Quadrant::Challenger,
        (false, true) => Quadrant::Niche,
        (false, false) => Quadrant::Laggard,
    }
}

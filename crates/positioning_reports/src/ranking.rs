//! Leaderboards over computed quadrant positions.

use std::cmp::Ordering;

use positioning_core::GartnerQuadrant;
use serde::{Deserialize, Serialize};

/// Metric a leaderboard is sorted by (descending).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingKey {
    /// `fit_score + rebate_score`, the order the engine already emits.
    #[default]
    CombinedScore,
    FitScore,
    RebateScore,
    TotalGmv,
    TotalRebate,
    StoreCoverage,
}

impl RankingKey {
    pub fn value(self, position: &GartnerQuadrant) -> f64 {
        match self {
            Self::CombinedScore => position.fit_score + position.rebate_score,
            Self::FitScore => position.fit_score,
            Self::RebateScore => position.rebate_score,
            Self::TotalGmv => position.total_gmv,
            Self::TotalRebate => position.total_rebate,
            Self::StoreCoverage => position.store_coverage,
        }
    }
}

fn compare(key: RankingKey, a: &GartnerQuadrant, b: &GartnerQuadrant) -> Ordering {
    key.value(b)
        .total_cmp(&key.value(a))
        .then_with(|| a.partner_id.cmp(&b.partner_id))
}

/// Positions sorted by `key` descending, ties broken by partner id.
pub fn rank_by(positions: &[GartnerQuadrant], key: RankingKey) -> Vec<&GartnerQuadrant> {
    let mut ranked: Vec<&GartnerQuadrant> = positions.iter().collect();
    ranked.sort_by(|a, b| compare(key, a, b));
    ranked
}

pub fn find_best_position_index(positions: &[GartnerQuadrant], key: RankingKey) -> Option<usize> {
    positions
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| compare(key, a, b))
        .map(|(index, _)| index)
}

pub fn top_partners(
    positions: &[GartnerQuadrant],
    key: RankingKey,
    limit: usize,
) -> Vec<&GartnerQuadrant> {
    let mut ranked = rank_by(positions, key);
    ranked.truncate(limit);
    ranked
}

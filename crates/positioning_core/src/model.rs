//! Records exchanged with the data-access layer.
//!
//! `Partner`, `Store` and `StorePartnerMetric` arrive as read-only snapshots.
//! `GartnerQuadrant` and `StoreRevenueBreakdownItem` are built fresh on every
//! call and handed to the chart and table layers.

use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

pub type PartnerId = String;
pub type StoreId = String;

/// Partner line of business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Logistic,
    Payment,
    Marketplace,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Logistic, Category::Payment, Category::Marketplace];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Logistic => "logistic",
            Category::Payment => "payment",
            Category::Marketplace => "marketplace",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Size/segment of a store. Larger tiers weigh more in the fit signal.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum StoreTier {
    #[default]
    Small,
    Medium,
    Large,
}

impl StoreTier {
    pub fn as_str(self) -> &'static str {
        match self {
            StoreTier::Small => "small",
            StoreTier::Medium => "medium",
            StoreTier::Large => "large",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partner {
    pub id: PartnerId,
    pub name: String,
    /// The first entry is the partner's primary category.
    pub categories: Vec<Category>,
}

impl Partner {
    pub fn new(id: impl Into<String>, name: impl Into<String>, categories: Vec<Category>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            categories,
        }
    }

    pub fn primary_category(&self) -> Option<Category> {
        self.categories.first().copied()
    }

    pub fn has_category(&self, category: Category) -> bool {
        self.categories.contains(&category)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    pub id: StoreId,
    pub name: String,
    pub tier: StoreTier,
}

impl Store {
    pub fn new(id: impl Into<String>, name: impl Into<String>, tier: StoreTier) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            tier,
        }
    }
}

/// One store–partner–period fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorePartnerMetric {
    pub store_id: StoreId,
    pub partner_id: PartnerId,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub store_tier: StoreTier,
    pub monthly_gmv: f64,
    pub partner_revenue: f64,
    pub rebate_generated: f64,
    pub rebate_percentage: f64,
    /// Supplied by the upstream metrics source; never derived here.
    pub roi: f64,
    #[serde(default)]
    pub fit_score_raw: f64,
}

impl StorePartnerMetric {
    /// True when the row's period overlaps `window` (bounds inclusive).
    pub fn overlaps(&self, window: &PeriodWindow) -> bool {
        self.period_start <= window.end && self.period_end >= window.start
    }

    /// Total order over every field, used to sum rows independently of the
    /// order they were supplied in.
    pub(crate) fn canonical_cmp(&self, other: &Self) -> Ordering {
        self.store_id
            .cmp(&other.store_id)
            .then_with(|| self.partner_id.cmp(&other.partner_id))
            .then_with(|| self.period_start.cmp(&other.period_start))
            .then_with(|| self.period_end.cmp(&other.period_end))
            .then_with(|| self.store_tier.cmp(&other.store_tier))
            .then_with(|| self.monthly_gmv.total_cmp(&other.monthly_gmv))
            .then_with(|| self.partner_revenue.total_cmp(&other.partner_revenue))
            .then_with(|| self.rebate_generated.total_cmp(&other.rebate_generated))
            .then_with(|| self.rebate_percentage.total_cmp(&other.rebate_percentage))
            .then_with(|| self.roi.total_cmp(&other.roi))
            .then_with(|| self.fit_score_raw.total_cmp(&other.fit_score_raw))
    }

    pub(crate) fn numeric_fields(&self) -> [(&'static str, f64); 6] {
        [
            ("monthly_gmv", self.monthly_gmv),
            ("partner_revenue", self.partner_revenue),
            ("rebate_generated", self.rebate_generated),
            ("rebate_percentage", self.rebate_percentage),
            ("roi", self.roi),
            ("fit_score_raw", self.fit_score_raw),
        ]
    }
}

/// Inclusive date range used to restrict which period rows are considered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl PeriodWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> EngineResult<Self> {
        let window = Self { start, end };
        window.validate()?;
        Ok(window)
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.end < self.start {
            return Err(EngineError::invalid_input(format!(
                "period window ends ({}) before it starts ({})",
                self.end, self.start
            )));
        }
        Ok(())
    }
}

/// Strategic position derived from normalized fit and rebate scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quadrant {
    Leader,
    Challenger,
    Niche,
    Laggard,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::Leader,
        Quadrant::Challenger,
        Quadrant::Niche,
        Quadrant::Laggard,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Quadrant::Leader => "leader",
            Quadrant::Challenger => "challenger",
            Quadrant::Niche => "niche",
            Quadrant::Laggard => "laggard",
        }
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-partner position within the compared cohort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GartnerQuadrant {
    pub partner_id: PartnerId,
    pub partner_name: String,
    pub category: Category,
    /// Normalized 0-100, X axis of the positioning chart.
    pub fit_score: f64,
    /// Normalized 0-100, Y axis of the positioning chart.
    pub rebate_score: f64,
    pub quadrant: Quadrant,
    pub total_stores: usize,
    pub total_gmv: f64,
    pub total_rebate: f64,
    pub total_revenue: f64,
    pub avg_rebate_per_store: f64,
    /// Percent of the platform's tier-weighted store base the partner covers.
    pub store_coverage: f64,
}

/// One partner's contribution to a single store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreRevenueBreakdownItem {
    pub partner_id: PartnerId,
    pub partner_name: String,
    pub category: Category,
    pub gmv: f64,
    pub partner_revenue: f64,
    pub rebate: f64,
    pub rebate_percentage: f64,
    pub roi: f64,
    /// Percent of the store's GMV contributed by this partner.
    pub gmv_share: f64,
    /// Percent of the store's rebate contributed by this partner.
    pub rebate_share: f64,
    pub period_count: usize,
}

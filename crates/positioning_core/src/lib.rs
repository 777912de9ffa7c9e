//! Strategic positioning and revenue attribution for partner dashboards.
//!
//! Given a snapshot of partners, stores and per-store, per-partner monthly
//! metrics, this crate ranks partners into four strategic quadrants and
//! breaks a single store's revenue down by partner. Everything is a pure
//! function of the snapshot: no I/O, no caching, no state between calls.
//!
//! # Quick Start
//!
//! ```no_run
//! use positioning_core::{compute_quadrant_positions, compute_store_breakdown, Category};
//! # use positioning_core::{Partner, Store, StorePartnerMetric};
//! # fn load() -> (Vec<Partner>, Vec<Store>, Vec<StorePartnerMetric>) { unimplemented!() }
//!
//! let (partners, stores, metrics) = load();
//!
//! // Position payment partners against each other
//! let positions =
//!     compute_quadrant_positions(&partners, &stores, &metrics, Some(Category::Payment))?;
//!
//! // Attribute one store's revenue and rebate to its partners
//! let breakdown = compute_store_breakdown("store-42", &partners, &metrics)?;
//! # Ok::<(), positioning_core::EngineError>(())
//! ```
//!
//! # Architecture
//!
//! - [`aggregate`]: per-partner totals and the tier-weighted fit signal
//! - [`weighting`]: pluggable tier weighting policies
//! - [`normalize`]: min-max scaling of aggregates onto 0-100
//! - [`classify`]: quadrant thresholds
//! - [`breakdown`]: per-store attribution
//! - [`engine`]: validated entry points tying the pipelines together
//! - [`contract`]: snapshot validation and result fingerprints

pub mod aggregate;
pub mod breakdown;
pub mod classify;
pub mod config;
pub mod contract;
pub mod engine;
pub mod error;
pub mod model;
pub mod normalize;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;
pub mod weighting;

pub use breakdown::RateSource;
pub use classify::{QuadrantThresholds, DEFAULT_QUADRANT_THRESHOLD};
pub use config::EngineConfig;
pub use contract::result_fingerprint;
pub use engine::{
    compute_quadrant_positions, compute_store_breakdown, summarize_quadrants, BreakdownQuery,
    PositioningEngine, QuadrantQuery, QuadrantSummary,
};
pub use error::{EngineError, EngineResult};
pub use model::{
    Category, GartnerQuadrant, Partner, PeriodWindow, Quadrant, Store, StorePartnerMetric,
    StoreRevenueBreakdownItem, StoreTier,
};
pub use normalize::{AxisMapping, AxisSource};
pub use weighting::{TierWeighting, TierWeights};

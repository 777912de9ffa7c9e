//! Entry points used by the presentation layer.
//!
//! Both pipelines validate the snapshot, compute a fresh result and keep no
//! state between calls.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::aggregate::{aggregate_partner_metrics, AggregationContext, MetricFilter};
use crate::breakdown::store_breakdown;
use crate::config::EngineConfig;
use crate::contract::{index_store_tiers, validate_metrics, PartnerDirectory};
use crate::error::EngineResult;
use crate::model::{
    Category, GartnerQuadrant, Partner, PeriodWindow, Quadrant, Store, StorePartnerMetric,
    StoreRevenueBreakdownItem,
};
use crate::normalize::{normalize_scores, ScoredPartner};
use crate::weighting::TierWeighting;

/// Inputs for a quadrant computation.
#[derive(Debug, Clone, Copy)]
pub struct QuadrantQuery<'a> {
    pub partners: &'a [Partner],
    pub stores: &'a [Store],
    pub metrics: &'a [StorePartnerMetric],
    pub category: Option<Category>,
    pub period: Option<PeriodWindow>,
}

impl<'a> QuadrantQuery<'a> {
    pub fn new(
        partners: &'a [Partner],
        stores: &'a [Store],
        metrics: &'a [StorePartnerMetric],
    ) -> Self {
        Self {
            partners,
            stores,
            metrics,
            category: None,
            period: None,
        }
    }

    pub fn with_category(mut self, category: Option<Category>) -> Self {
        self.category = category;
        self
    }

    pub fn with_period(mut self, period: Option<PeriodWindow>) -> Self {
        self.period = period;
        self
    }
}

/// Inputs for a single-store breakdown.
#[derive(Debug, Clone, Copy)]
pub struct BreakdownQuery<'a> {
    pub store_id: &'a str,
    pub partners: &'a [Partner],
    pub metrics: &'a [StorePartnerMetric],
    pub period: Option<PeriodWindow>,
}

impl<'a> BreakdownQuery<'a> {
    pub fn new(
        store_id: &'a str,
        partners: &'a [Partner],
        metrics: &'a [StorePartnerMetric],
    ) -> Self {
        Self {
            store_id,
            partners,
            metrics,
            period: None,
        }
    }

    pub fn with_period(mut self, period: Option<PeriodWindow>) -> Self {
        self.period = period;
        self
    }
}

/// Configured engine. Cheap to clone and safe to share across threads.
#[derive(Clone)]
pub struct PositioningEngine {
    config: EngineConfig,
    weighting: Arc<dyn TierWeighting>,
    /// Set once `with_weighting` replaces the config's tier table.
    custom_weighting: bool,
}

impl Default for PositioningEngine {
    fn default() -> Self {
        let config = EngineConfig::default();
        Self {
            weighting: Arc::new(config.tier_weights),
            custom_weighting: false,
            config,
        }
    }
}

impl fmt::Debug for PositioningEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PositioningEngine")
            .field("config", &self.config)
            .field("custom_weighting", &self.custom_weighting)
            .finish_non_exhaustive()
    }
}

impl PositioningEngine {
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self {
            weighting: Arc::new(config.tier_weights),
            custom_weighting: false,
            config,
        })
    }

    /// Replace the config's tier table with a custom weighting policy.
    pub fn with_weighting(mut self, weighting: impl TierWeighting + 'static) -> Self {
        self.weighting = Arc::new(weighting);
        self.custom_weighting = true;
        self
    }

    /// The config the engine was built from. When [`has_custom_weighting`]
    /// is true, `tier_weights` here is not the table in use.
    ///
    /// [`has_custom_weighting`]: Self::has_custom_weighting
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn has_custom_weighting(&self) -> bool {
        self.custom_weighting
    }

    /// Aggregate, normalize and classify every partner with matching rows.
    ///
    /// Output is ranked by combined score (fit + rebate) descending, ties by
    /// partner id.
    pub fn quadrant_positions(
        &self,
        query: &QuadrantQuery<'_>,
    ) -> EngineResult<Vec<GartnerQuadrant>> {
        debug!(
            partners = query.partners.len(),
            stores = query.stores.len(),
            rows = query.metrics.len(),
            category = ?query.category,
            "computing quadrant positions"
        );

        let (directory, store_tiers) =
            validated_directory(query.partners, query.metrics, query.period.as_ref())
                .and_then(|directory| {
                    index_store_tiers(query.stores).map(|store_tiers| (directory, store_tiers))
                })
                .inspect_err(|error| warn!(%error, "rejected snapshot for quadrant positions"))?;

        let filter = MetricFilter::all()
            .with_category(query.category)
            .with_period(query.period);
        let context = AggregationContext {
            directory: &directory,
            store_tiers: &store_tiers,
            weighting: self.weighting.as_ref(),
        };
        let scored = aggregate_partner_metrics(query.metrics, &filter, &context)
            .and_then(|aggregates| normalize_scores(aggregates, &self.config.axes))
            .inspect_err(|error| warn!(%error, "rejected totals for quadrant positions"))?;

        let mut positions: Vec<GartnerQuadrant> = scored
            .into_iter()
            .map(|partner| self.position(partner))
            .collect();
        positions.sort_by(|left, right| {
            (right.fit_score + right.rebate_score)
                .total_cmp(&(left.fit_score + left.rebate_score))
                .then_with(|| left.partner_id.cmp(&right.partner_id))
        });

        debug!(positioned = positions.len(), "quadrant positions computed");
        Ok(positions)
    }

    fn position(&self, partner: ScoredPartner) -> GartnerQuadrant {
        let ScoredPartner {
            aggregate,
            fit_score,
            rebate_score,
        } = partner;
        let avg_rebate_per_store = aggregate.avg_rebate_per_store();
        GartnerQuadrant {
            quadrant: self.config.thresholds.classify(fit_score, rebate_score),
            partner_id: aggregate.partner_id,
            partner_name: aggregate.partner_name,
            category: aggregate.category,
            fit_score,
            rebate_score,
            total_stores: aggregate.total_stores,
            total_gmv: aggregate.total_gmv,
            total_rebate: aggregate.total_rebate,
            total_revenue: aggregate.total_revenue,
            avg_rebate_per_store,
            store_coverage: aggregate.store_coverage,
        }
    }

    /// Per-partner contribution to one store. Unknown stores yield an empty list.
    pub fn store_breakdown(
        &self,
        query: &BreakdownQuery<'_>,
    ) -> EngineResult<Vec<StoreRevenueBreakdownItem>> {
        debug!(
            store_id = query.store_id,
            partners = query.partners.len(),
            rows = query.metrics.len(),
            "computing store breakdown"
        );

        let directory = validated_directory(query.partners, query.metrics, query.period.as_ref())
            .inspect_err(|error| {
                warn!(%error, store_id = query.store_id, "rejected snapshot for store breakdown")
            })?;

        let items = store_breakdown(
            query.store_id,
            &directory,
            query.metrics,
            query.period.as_ref(),
            self.config.rate_source,
        )
        .inspect_err(|error| {
            warn!(%error, store_id = query.store_id, "rejected totals for store breakdown")
        })?;

        debug!(store_id = query.store_id, items = items.len(), "store breakdown computed");
        Ok(items)
    }
}

fn validated_directory<'a>(
    partners: &'a [Partner],
    metrics: &[StorePartnerMetric],
    period: Option<&PeriodWindow>,
) -> EngineResult<PartnerDirectory<'a>> {
    if let Some(window) = period {
        window.validate()?;
    }
    let directory = PartnerDirectory::build(partners)?;
    validate_metrics(metrics, &directory)?;
    Ok(directory)
}

/// Quadrant positions with the default configuration.
pub fn compute_quadrant_positions(
    partners: &[Partner],
    stores: &[Store],
    metrics: &[StorePartnerMetric],
    category_filter: Option<Category>,
) -> EngineResult<Vec<GartnerQuadrant>> {
    PositioningEngine::default().quadrant_positions(
        &QuadrantQuery::new(partners, stores, metrics).with_category(category_filter),
    )
}

/// Store breakdown with the default configuration.
pub fn compute_store_breakdown(
    store_id: &str,
    partners: &[Partner],
    metrics: &[StorePartnerMetric],
) -> EngineResult<Vec<StoreRevenueBreakdownItem>> {
    PositioningEngine::default().store_breakdown(&BreakdownQuery::new(store_id, partners, metrics))
}

/// Totals for one quadrant of the chart legend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuadrantBucket {
    pub quadrant: Quadrant,
    pub partners: usize,
    pub total_gmv: f64,
    pub total_rebate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuadrantSummary {
    /// One bucket per quadrant, in `Quadrant::ALL` order, empty ones included.
    pub buckets: Vec<QuadrantBucket>,
}

impl QuadrantSummary {
    pub fn bucket(&self, quadrant: Quadrant) -> Option<&QuadrantBucket> {
        self.buckets.iter().find(|bucket| bucket.quadrant == quadrant)
    }
}

pub fn summarize_quadrants(positions: &[GartnerQuadrant]) -> QuadrantSummary {
    let buckets = Quadrant::ALL
        .iter()
        .map(|&quadrant| {
            let members = positions.iter().filter(|position| position.quadrant == quadrant);
            let (partners, total_gmv, total_rebate) =
                members.fold((0, 0.0, 0.0), |(count, gmv, rebate), position| {
                    (count + 1, gmv + position.total_gmv, rebate + position.total_rebate)
                });
            QuadrantBucket {
                quadrant,
                partners,
                total_gmv,
                total_rebate,
            }
        })
        .collect();
    QuadrantSummary { buckets }
}

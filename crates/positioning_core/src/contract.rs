//! Input validation and stable encoding of engine results.
//!
//! Snapshots are checked in full before any computation starts, so a single
//! malformed record rejects the whole call instead of skewing the output.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::{EngineError, EngineResult};
use crate::model::{Partner, Store, StorePartnerMetric, StoreTier};

/// Partners indexed by id.
#[derive(Debug, Clone)]
pub struct PartnerDirectory<'a> {
    partners: BTreeMap<&'a str, &'a Partner>,
}

impl<'a> PartnerDirectory<'a> {
    pub fn build(partners: &'a [Partner]) -> EngineResult<Self> {
        let mut indexed = BTreeMap::new();
        for partner in partners {
            if partner.id.trim().is_empty() {
                return Err(EngineError::invalid_input("partner id cannot be empty"));
            }
            if partner.categories.is_empty() {
                return Err(EngineError::invalid_input(format!(
                    "partner '{}' has no categories",
                    partner.id
                )));
            }
            if indexed.insert(partner.id.as_str(), partner).is_some() {
                return Err(EngineError::invalid_input(format!(
                    "duplicate partner id '{}'",
                    partner.id
                )));
            }
        }
        Ok(Self { partners: indexed })
    }

    pub fn get(&self, partner_id: &str) -> Option<&'a Partner> {
        self.partners.get(partner_id).copied()
    }

    pub fn len(&self) -> usize {
        self.partners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partners.is_empty()
    }
}

/// Store tiers indexed by store id.
pub fn index_store_tiers(stores: &[Store]) -> EngineResult<BTreeMap<&str, StoreTier>> {
    let mut tiers = BTreeMap::new();
    for store in stores {
        if store.id.trim().is_empty() {
            return Err(EngineError::invalid_input("store id cannot be empty"));
        }
        if tiers.insert(store.id.as_str(), store.tier).is_some() {
            return Err(EngineError::invalid_input(format!(
                "duplicate store id '{}'",
                store.id
            )));
        }
    }
    Ok(tiers)
}

/// Checks every metric row for shape problems and dangling partner references.
pub fn validate_metrics(
    metrics: &[StorePartnerMetric],
    directory: &PartnerDirectory<'_>,
) -> EngineResult<()> {
    for (index, row) in metrics.iter().enumerate() {
        if row.store_id.trim().is_empty() {
            return Err(EngineError::invalid_input(format!(
                "metric row {index} has an empty store id"
            )));
        }
        if row.partner_id.trim().is_empty() {
            return Err(EngineError::invalid_input(format!(
                "metric row {index} has an empty partner id"
            )));
        }
        if row.period_end < row.period_start {
            return Err(EngineError::invalid_input(format!(
                "metric row {index} (store '{}', partner '{}') ends on {} before it starts on {}",
                row.store_id, row.partner_id, row.period_end, row.period_start
            )));
        }
        for (field, value) in row.numeric_fields() {
            if !value.is_finite() {
                return Err(EngineError::invalid_input(format!(
                    "metric row {index} (store '{}', partner '{}') has non-finite {field}",
                    row.store_id, row.partner_id
                )));
            }
        }
        if directory.get(&row.partner_id).is_none() {
            return Err(EngineError::invalid_input(format!(
                "metric row {index} references unknown partner '{}'",
                row.partner_id
            )));
        }
    }
    Ok(())
}

/// Rejects a derived value that left the finite range, e.g. an overflowed sum.
pub(crate) fn ensure_finite_total(subject: &str, field: &str, value: f64) -> EngineResult<()> {
    if value.is_finite() {
        return Ok(());
    }
    Err(EngineError::invalid_input(format!(
        "{subject} has non-finite {field} ({value}); the inputs overflow the numeric range"
    )))
}

/// Distinct store ids referenced by `metrics`, sorted.
pub fn referenced_store_ids(metrics: &[StorePartnerMetric]) -> Vec<&str> {
    metrics
        .iter()
        .map(|row| row.store_id.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn stable_contract_json(value: impl Serialize) -> EngineResult<String> {
    serde_json::to_string(&value).map_err(|error| EngineError::Encoding {
        message: error.to_string(),
    })
}

/// Hex SHA-256 of the stable JSON encoding of `value`.
pub fn result_fingerprint(value: impl Serialize) -> EngineResult<String> {
    let mut hasher = Sha256::new();
    hasher.update(stable_contract_json(value)?);
    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Category;
    use crate::test_helpers::{payment_partner, test_metric};

    #[test]
    fn directory_rejects_duplicate_partner_ids() {
        let partners = vec![payment_partner("p1"), payment_partner("p1")];
        let error = PartnerDirectory::build(&partners).expect_err("directory should fail");
        assert_eq!(error.message(), "duplicate partner id 'p1'");
    }

    #[test]
    fn directory_rejects_partner_without_categories() {
        let partners = vec![Partner::new("p1", "Acme", Vec::new())];
        let error = PartnerDirectory::build(&partners).expect_err("directory should fail");
        assert_eq!(error.message(), "partner 'p1' has no categories");
    }

    #[test]
    fn store_index_rejects_duplicates() {
        let stores = vec![
            Store::new("s1", "North", StoreTier::Small),
            Store::new("s1", "North again", StoreTier::Large),
        ];
        let error = index_store_tiers(&stores).expect_err("index should fail");
        assert_eq!(error.message(), "duplicate store id 's1'");
    }

    #[test]
    fn metrics_must_reference_known_partners() {
        let partners = vec![Partner::new("p1", "Acme", vec![Category::Payment])];
        let directory = PartnerDirectory::build(&partners).expect("directory");
        let metrics = vec![test_metric("s1", "ghost", StoreTier::Small, 100.0, 5.0)];

        let error = validate_metrics(&metrics, &directory).expect_err("validation should fail");
        assert_eq!(error.message(), "metric row 0 references unknown partner 'ghost'");
    }

    #[test]
    fn metrics_reject_non_finite_values() {
        let partners = vec![payment_partner("p1")];
        let directory = PartnerDirectory::build(&partners).expect("directory");
        let mut row = test_metric("s1", "p1", StoreTier::Small, 100.0, 5.0);
        row.roi = f64::NAN;

        let error = validate_metrics(&[row], &directory).expect_err("validation should fail");
        assert!(error.message().contains("non-finite roi"));
    }

    #[test]
    fn metrics_reject_reversed_periods() {
        let partners = vec![payment_partner("p1")];
        let directory = PartnerDirectory::build(&partners).expect("directory");
        let mut row = test_metric("s1", "p1", StoreTier::Small, 100.0, 5.0);
        std::mem::swap(&mut row.period_start, &mut row.period_end);

        let error = validate_metrics(&[row], &directory).expect_err("validation should fail");
        assert!(error.message().contains("before it starts"));
    }

    #[test]
    fn fingerprint_is_stable_for_equal_values() {
        let left = result_fingerprint(vec![1.5, 2.0]).expect("fingerprint");
        let right = result_fingerprint(vec![1.5, 2.0]).expect("fingerprint");
        let other = result_fingerprint(vec![2.0, 1.5]).expect("fingerprint");
        assert_eq!(left, right);
        assert_ne!(left, other);
        assert_eq!(left.len(), 64);
    }

    #[test]
    fn referenced_store_ids_are_sorted_and_distinct() {
        let metrics = vec![
            test_metric("s2", "p1", StoreTier::Small, 1.0, 0.0),
            test_metric("s1", "p1", StoreTier::Small, 1.0, 0.0),
            test_metric("s2", "p2", StoreTier::Small, 1.0, 0.0),
        ];
        assert_eq!(referenced_store_ids(&metrics), vec!["s1", "s2"]);
    }
}

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::SustainError;
use crate::statement::record::{is_derived_label, LineItem};
use crate::SustainResult;

/// How a future year's value of one line item is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ForecastPolicy {
    /// Mean of the trailing three history values of the line.
    #[serde(alias = "average")]
    Average,
    /// Prior year's value compounded by the configured percentage.
    #[serde(alias = "multiplier")]
    Multiplier,
}

/// Policies resolved from labels to raw line items.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolicySet {
    policies: BTreeMap<LineItem, ForecastPolicy>,
}

impl PolicySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every raw line item under the same policy.
    pub fn uniform(policy: ForecastPolicy) -> Self {
        PolicySet {
            policies: LineItem::ALL.into_iter().map(|item| (item, policy)).collect(),
        }
    }

    pub fn with(mut self, item: LineItem, policy: ForecastPolicy) -> Self {
        self.policies.insert(item, policy);
        self
    }

    pub fn get(&self, item: LineItem) -> Option<ForecastPolicy> {
        self.policies.get(&item).copied()
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }

    /// Resolve label-keyed policies.
    ///
    /// Labels of computed lines are skipped and reported in the returned
    /// warnings; labels that name nothing are rejected.
    pub fn from_labels(
        labels: &BTreeMap<String, ForecastPolicy>,
    ) -> SustainResult<(PolicySet, Vec<String>)> {
        let mut set = PolicySet::new();
        let mut warnings = Vec::new();

        for (label, policy) in labels {
            if let Some(item) = LineItem::from_label(label) {
                set.policies.insert(item, *policy);
            } else if is_derived_label(label) {
                warnings.push(format!(
                    "Policy for '{label}' ignored: computed lines are always re-derived"
                ));
            } else {
                return Err(SustainError::invalid(
                    format!("policies.{label}"),
                    "Unknown line item label",
                ));
            }
        }

        Ok((set, warnings))
    }
}

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Hygiene status for normalization and canonicalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HygieneStatus {
    /// The input mapped onto the schema without degradation.
    Ok,
    /// The input was accepted, but some information was defaulted or coerced.
    Lossy,
}

/// Stable warning code, e.g. `MissingField:title`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HygieneWarning(String);

impl HygieneWarning {
    /// Creates a warning from a literal code.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Creates a warning scoped to a field, rendered as `code:field`.
    pub fn for_field(code: &str, field: &str) -> Self {
        Self(format!("{}:{}", code, field))
    }

    /// Returns the warning code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Report describing how much an input was degraded on its way to canonical form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HygieneReport {
    /// Overall hygiene status.
    pub status: HygieneStatus,
    /// Stable warning codes, in the order they were raised.
    pub warnings: Vec<HygieneWarning>,
    /// Counters keyed by metric name.
    pub metrics: BTreeMap<String, u64>,
}

impl Default for HygieneReport {
    fn default() -> Self {
        Self {
            status: HygieneStatus::Ok,
            warnings: vec![],
            metrics: BTreeMap::new(),
        }
    }
}

impl HygieneReport {
    /// Records a lossy degradation: pushes the warning and bumps `metric`.
    pub fn degrade(&mut self, warning: HygieneWarning, metric: &str) {
        if self.status == HygieneStatus::Ok {
            self.status = HygieneStatus::Lossy;
        }
        self.warnings.push(warning);
        self.bump(metric);
    }

    /// Increments a metric without changing the status.
    pub fn bump(&mut self, metric: &str) {
        self.metrics
            .entry(metric.to_string())
            .and_modify(|count| *count += 1)
            .or_insert(1);
    }

    /// Returns true when nothing was degraded.
    pub fn is_clean(&self) -> bool {
        self.status == HygieneStatus::Ok
    }

    /// Folds another report into this one.
    pub fn merge(&mut self, other: HygieneReport) {
        if other.status == HygieneStatus::Lossy {
            self.status = HygieneStatus::Lossy;
        }
        self.warnings.extend(other.warnings);
        for (name, count) in other.metrics {
            *self.metrics.entry(name).or_insert(0) += count;
        }
    }
}

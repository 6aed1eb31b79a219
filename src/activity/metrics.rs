//! Companion metrics - named, unit-typed quantities describing demand
//!
//! Identifiers and unit kinds are closed enumerations; configuration strings
//! are mapped onto them at load time so unknown keys fail before the first
//! timestep rather than during computation.

use crate::core::error::{MusterError, Result};
use serde::{Deserialize, Serialize};

/// The measurement identifiers an activity may declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricId {
    /// Head examined this timestep
    Inspected,
    /// Head actually acted upon; the primary action metric that drives the
    /// skip count and execution quota
    Performed,
}

impl MetricId {
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "inspected" => Ok(MetricId::Inspected),
            "performed" => Ok(MetricId::Performed),
            other => Err(MusterError::UnknownMetric(other.to_string())),
        }
    }
}

impl std::fmt::Display for MetricId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricId::Inspected => write!(f, "inspected"),
            MetricId::Performed => write!(f, "performed"),
        }
    }
}

/// Unit kind of a companion metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MetricUnit {
    /// One occurrence regardless of magnitude
    Fixed,
    /// Exactly the supplied count
    PerUnit,
}

impl MetricUnit {
    /// Parse a configuration string, naming the metric on failure
    pub fn parse(metric: &str, s: &str) -> Result<Self> {
        match s {
            "fixed" => Ok(MetricUnit::Fixed),
            "per-unit" => Ok(MetricUnit::PerUnit),
            other => Err(MusterError::UnknownMetricUnit {
                metric: metric.to_string(),
                unit: other.to_string(),
            }),
        }
    }

    fn apply(self, raw: f64) -> f64 {
        match self {
            MetricUnit::Fixed => 1.0,
            MetricUnit::PerUnit => raw,
        }
    }
}

/// The `(identifier, unit)` pairs an activity declares
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricTable {
    entries: Vec<(MetricId, MetricUnit)>,
}

impl MetricTable {
    pub fn new(entries: Vec<(MetricId, MetricUnit)>) -> Self {
        Self { entries }
    }

    pub fn unit(&self, id: MetricId) -> Option<MetricUnit> {
        self.entries
            .iter()
            .find(|(m, _)| *m == id)
            .map(|(_, u)| *u)
    }

    pub fn declares(&self, id: MetricId) -> bool {
        self.unit(id).is_some()
    }

    /// Map a raw count through the declared unit kind
    ///
    /// Returns None for undeclared metrics; declarations are validated at
    /// load so this is a caller bug, not a runtime condition.
    pub fn compute(&self, id: MetricId, raw: f64) -> Option<f64> {
        self.unit(id).map(|u| u.apply(raw))
    }
}

impl Default for MetricTable {
    fn default() -> Self {
        Self::new(vec![
            (MetricId::Inspected, MetricUnit::PerUnit),
            (MetricId::Performed, MetricUnit::PerUnit),
        ])
    }
}

/// Values computed for one timestep; never persisted across timesteps
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricValues {
    values: Vec<(MetricId, f64)>,
}

impl MetricValues {
    pub fn set(&mut self, id: MetricId, value: f64) {
        if let Some(entry) = self.values.iter_mut().find(|(m, _)| *m == id) {
            entry.1 = value;
        } else {
            self.values.push((id, value));
        }
    }

    pub fn get(&self, id: MetricId) -> Option<f64> {
        self.values
            .iter()
            .find(|(m, _)| *m == id)
            .map(|(_, v)| *v)
    }
}

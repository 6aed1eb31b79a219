//! Resource request builder - turns computed metric values into typed
//! requests against the shared pool
//!
//! Non-labour resources produce a single request. Labour fans out one request
//! per matching labour filter group, or one per matching individual when the
//! apply-to-all policy is set; each labour request carries a limit set
//! derived from the amount it asks for.

use crate::activity::filter::{select, FilterGroup};
use crate::activity::limits::{limits, LimitParams, LimitPolicy, LimitSet};
use crate::activity::metrics::{MetricId, MetricValues};
use crate::core::diagnostics::Diagnostics;
use crate::core::types::ResourceKind;
use crate::herd::member::Member;
use serde::{Deserialize, Serialize};

/// A demand for a quantity of one resource kind
///
/// Created in the request phase, consumed by the pool, discarded after the
/// timestep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceRequest {
    pub resource: ResourceKind,
    pub amount: f64,
    /// Grouping/category tag used by pool-side accounting
    pub category: String,
    /// The companion metric this request was derived from
    pub metric: MetricId,
    pub allow_substitution: bool,
    /// Bounds for labour requests; None for other kinds
    pub limit: Option<LimitSet>,
}

/// Configuration for the non-labour request of an activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestConfig {
    pub resource: ResourceKind,
    /// Metric whose value becomes the requested amount
    pub metric: MetricId,
    pub category: String,
    #[serde(default)]
    pub allow_substitution: bool,
    /// Round the amount up to whole unit blocks
    #[serde(default)]
    pub whole_units: bool,
    #[serde(default = "one")]
    pub unit_size: f64,
}

fn one() -> f64 {
    1.0
}

/// How labour demand is derived from the driving metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LabourMeasure {
    /// days = rate * value
    Fixed,
    /// days = units(value / unit_size) * rate
    PerUnit,
}

/// Labour demand configuration for an activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabourRequirement {
    /// Metric whose value drives the days needed
    pub metric: MetricId,
    /// Labour-days per unit block
    pub rate: f64,
    /// Head per unit block
    pub unit_size: f64,
    pub measure: LabourMeasure,
    /// Round the unit count up before applying the rate
    #[serde(default)]
    pub whole_units: bool,
    /// One request per matching individual instead of one per group
    #[serde(default)]
    pub apply_to_all: bool,
    pub policy: LimitPolicy,
    pub params: LimitParams,
    /// Sub-filter-groups over the labour force; at least one is required
    pub groups: Vec<FilterGroup>,
    pub category: String,
    #[serde(default)]
    pub allow_substitution: bool,
}

impl LabourRequirement {
    /// Labour-days needed for the given metric value
    pub fn days_needed(&self, value: f64) -> f64 {
        match self.measure {
            LabourMeasure::Fixed => self.rate * value,
            LabourMeasure::PerUnit => {
                if self.unit_size <= 0.0 {
                    return 0.0;
                }
                let units = value / self.unit_size;
                let units = if self.whole_units { units.ceil() } else { units };
                units * self.rate
            }
        }
    }
}

/// Build the timestep's resource requests from computed metric values
///
/// Zero or negative computed demand produces no request; that is a cheap
/// short-circuit, not an error.
pub fn build_requests(
    metrics: &MetricValues,
    request: Option<&RequestConfig>,
    labour: Option<&LabourRequirement>,
    labour_force: &[Member],
    diagnostics: &mut Diagnostics,
) -> Vec<ResourceRequest> {
    let mut out = Vec::new();

    if let Some(cfg) = request {
        if let Some(value) = metrics.get(cfg.metric) {
            let amount = if cfg.whole_units && cfg.unit_size > 0.0 {
                (value / cfg.unit_size).ceil() * cfg.unit_size
            } else {
                value
            };
            if amount > 0.0 {
                out.push(ResourceRequest {
                    resource: cfg.resource,
                    amount,
                    category: cfg.category.clone(),
                    metric: cfg.metric,
                    allow_substitution: cfg.allow_substitution,
                    limit: None,
                });
            }
        }
    }

    if let Some(req) = labour {
        let value = metrics.get(req.metric).unwrap_or(0.0);
        let days = req.days_needed(value);
        if days > 0.0 {
            let limit = limits(days, req.policy, &req.params, req.unit_size, req.rate);
            for group in &req.groups {
                let matching = select(
                    labour_force,
                    std::slice::from_ref(group),
                    diagnostics,
                );
                if matching.is_empty() {
                    continue;
                }
                if req.apply_to_all {
                    // One request per matching individual, each capped at the
                    // per-person bound.
                    for _ in matching.ids() {
                        out.push(ResourceRequest {
                            resource: ResourceKind::Labour,
                            amount: days.min(limit.max_days_per_person),
                            category: req.category.clone(),
                            metric: req.metric,
                            allow_substitution: req.allow_substitution,
                            limit: Some(limit),
                        });
                    }
                } else {
                    out.push(ResourceRequest {
                        resource: ResourceKind::Labour,
                        amount: days.min(limit.max_days_per_group),
                        category: req.category.clone(),
                        metric: req.metric,
                        allow_substitution: req.allow_substitution,
                        limit: Some(limit),
                    });
                }
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::MemberId;
    use crate::herd::member::{AttributeField, CompareOp, Predicate};

    fn worker(id: u32, supplied: f64) -> Member {
        Member::new(MemberId(id), 300.0, 70.0).with_supplied(supplied)
    }

    fn any_worker_group() -> FilterGroup {
        FilterGroup::new(
            "stockmen",
            Predicate::Attribute {
                field: AttributeField::Supplied,
                op: CompareOp::Gt,
                value: 0.0,
            },
        )
    }

    fn labour_req(measure: LabourMeasure) -> LabourRequirement {
        LabourRequirement {
            metric: MetricId::Performed,
            rate: 2.0,
            unit_size: 10.0,
            measure,
            whole_units: true,
            apply_to_all: false,
            policy: LimitPolicy::AsTotalAllowed,
            params: LimitParams {
                max_per_person: 3.0,
                max_per_group: 100.0,
                min_per_person: 0.5,
            },
            groups: vec![any_worker_group()],
            category: "husbandry".into(),
            allow_substitution: false,
        }
    }

    fn perf(value: f64) -> MetricValues {
        let mut m = MetricValues::default();
        m.set(MetricId::Performed, value);
        m
    }

    #[test]
    fn test_days_needed_fixed_measure() {
        let req = labour_req(LabourMeasure::Fixed);
        assert!((req.days_needed(5.0) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_days_needed_per_unit_rounds_up() {
        let req = labour_req(LabourMeasure::PerUnit);
        // 25 head / 10 per unit = 2.5 -> 3 units * 2 days = 6
        assert!((req.days_needed(25.0) - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_days_needed_per_unit_raw() {
        let mut req = labour_req(LabourMeasure::PerUnit);
        req.whole_units = false;
        // 25 / 10 = 2.5 units * 2 days = 5
        assert!((req.days_needed(25.0) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_non_labour_request_amount() {
        let cfg = RequestConfig {
            resource: ResourceKind::Feed,
            metric: MetricId::Performed,
            category: "supplement".into(),
            allow_substitution: false,
            whole_units: false,
            unit_size: 1.0,
        };
        let mut diag = Diagnostics::new();
        let requests = build_requests(&perf(12.0), Some(&cfg), None, &[], &mut diag);
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].resource, ResourceKind::Feed);
        assert!((requests[0].amount - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_non_labour_whole_unit_rounding() {
        let cfg = RequestConfig {
            resource: ResourceKind::Feed,
            metric: MetricId::Performed,
            category: "supplement".into(),
            allow_substitution: false,
            whole_units: true,
            unit_size: 25.0,
        };
        let mut diag = Diagnostics::new();
        let requests = build_requests(&perf(30.0), Some(&cfg), None, &[], &mut diag);
        assert!((requests[0].amount - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_demand_no_requests() {
        let req = labour_req(LabourMeasure::Fixed);
        let force = vec![worker(0, 20.0)];
        let mut diag = Diagnostics::new();
        let requests = build_requests(&perf(0.0), None, Some(&req), &force, &mut diag);
        assert!(requests.is_empty());
    }

    #[test]
    fn test_labour_one_request_per_group() {
        let mut req = labour_req(LabourMeasure::Fixed);
        req.groups.push(FilterGroup::new(
            "casuals",
            Predicate::Attribute {
                field: AttributeField::Supplied,
                op: CompareOp::Ge,
                value: 10.0,
            },
        ));
        let force = vec![worker(0, 20.0), worker(1, 5.0)];
        let mut diag = Diagnostics::new();
        let requests = build_requests(&perf(5.0), None, Some(&req), &force, &mut diag);
        assert_eq!(requests.len(), 2);
        assert!(requests.iter().all(|r| r.resource == ResourceKind::Labour));
        assert!(requests.iter().all(|r| r.limit.is_some()));
    }

    #[test]
    fn test_labour_apply_to_all_fans_out_per_individual() {
        let mut req = labour_req(LabourMeasure::Fixed);
        req.apply_to_all = true;
        let force = vec![worker(0, 20.0), worker(1, 20.0), worker(2, 0.0)];
        let mut diag = Diagnostics::new();
        let requests = build_requests(&perf(5.0), None, Some(&req), &force, &mut diag);
        // Worker 2 supplies nothing and does not match the group.
        assert_eq!(requests.len(), 2);
        // days = 10, capped at max_per_person = 3
        assert!(requests.iter().all(|r| (r.amount - 3.0).abs() < 1e-9));
    }

    #[test]
    fn test_group_without_matches_is_skipped() {
        let req = labour_req(LabourMeasure::Fixed);
        let force = vec![worker(0, 0.0)];
        let mut diag = Diagnostics::new();
        let requests = build_requests(&perf(5.0), None, Some(&req), &force, &mut diag);
        assert!(requests.is_empty());
    }
}

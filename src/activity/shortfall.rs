//! Shortfall allocator - distributes a pool's under-supply back onto the
//! activity's workload as a proportional skip count
//!
//! No attempt is made to conserve fractional head across timesteps; each
//! timestep renegotiates from scratch.

use crate::activity::metrics::MetricId;
use crate::activity::requests::ResourceRequest;
use ahash::AHashMap;
use serde::Serialize;

/// Per-request answer from the pool: how much was required and how much the
/// pool could actually supply
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PoolResponse {
    pub required: f64,
    pub available: f64,
}

/// Outcome of comparing required vs. available for one metric identifier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShortfallRecord {
    pub metric: MetricId,
    pub required: f64,
    pub available: f64,
    pub ratio: f64,
}

/// The skip counts an activity must honor this timestep
#[derive(Debug, Clone, Default)]
pub struct ShortfallPlan {
    skips: AHashMap<MetricId, usize>,
    records: Vec<ShortfallRecord>,
    /// Set when the primary action metric is fully skipped
    fully_short: bool,
}

impl ShortfallPlan {
    pub fn skip(&self, metric: MetricId) -> usize {
        self.skips.get(&metric).copied().unwrap_or(0)
    }

    pub fn records(&self) -> &[ShortfallRecord] {
        &self.records
    }

    /// True when the shortfall prevented any action this timestep; the
    /// activity's terminal status becomes Warning but execution still runs.
    pub fn fully_short(&self) -> bool {
        self.fully_short
    }

    pub fn message(&self) -> Option<String> {
        self.fully_short
            .then(|| "resource shortfall prevented any action".to_string())
    }
}

/// Round half away from zero
fn round_half_away(x: f64) -> f64 {
    // f64::round already rounds half away from zero
    x.round()
}

/// Derive skip counts from the pool's responses
///
/// Per metric identifier: ratio = available/required (1.0 when required is
/// zero), skip = round(eligible * (1 - ratio)), clamped to [0, eligible].
/// Only under-served metrics appear in the plan.
pub fn allocate(
    requests: &[ResourceRequest],
    responses: &[PoolResponse],
    eligible_count: usize,
) -> ShortfallPlan {
    let mut required: AHashMap<MetricId, f64> = AHashMap::new();
    let mut available: AHashMap<MetricId, f64> = AHashMap::new();

    for (request, response) in requests.iter().zip(responses) {
        *required.entry(request.metric).or_insert(0.0) += response.required;
        *available.entry(request.metric).or_insert(0.0) += response.available;
    }

    let mut plan = ShortfallPlan::default();

    for (&metric, &req) in &required {
        let avail = available.get(&metric).copied().unwrap_or(0.0);
        if avail >= req {
            continue;
        }
        let ratio = if req > 0.0 {
            (avail / req).clamp(0.0, 1.0)
        } else {
            1.0
        };
        let skip = round_half_away(eligible_count as f64 * (1.0 - ratio)) as usize;
        let skip = skip.min(eligible_count);

        plan.records.push(ShortfallRecord {
            metric,
            required: req,
            available: avail,
            ratio,
        });
        plan.skips.insert(metric, skip);

        if metric == MetricId::Performed && eligible_count > 0 && skip == eligible_count {
            plan.fully_short = true;
        }
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ResourceKind;

    fn labour_request(amount: f64) -> ResourceRequest {
        ResourceRequest {
            resource: ResourceKind::Labour,
            amount,
            category: "husbandry".into(),
            metric: MetricId::Performed,
            allow_substitution: false,
            limit: None,
        }
    }

    fn response(required: f64, available: f64) -> PoolResponse {
        PoolResponse {
            required,
            available,
        }
    }

    #[test]
    fn test_half_shortfall_scenario() {
        // eligible=10, required=10, available=5 => ratio 0.5 => skip 5
        let requests = vec![labour_request(10.0)];
        let responses = vec![response(10.0, 5.0)];
        let plan = allocate(&requests, &responses, 10);

        assert_eq!(plan.skip(MetricId::Performed), 5);
        assert!(!plan.fully_short());
        assert_eq!(plan.records().len(), 1);
        assert!((plan.records()[0].ratio - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_full_shortfall_flags_warning() {
        let requests = vec![labour_request(10.0)];
        let responses = vec![response(10.0, 0.0)];
        let plan = allocate(&requests, &responses, 10);

        assert_eq!(plan.skip(MetricId::Performed), 10);
        assert!(plan.fully_short());
        assert!(plan
            .message()
            .unwrap()
            .contains("shortfall prevented any action"));
    }

    #[test]
    fn test_fully_served_produces_no_record() {
        let requests = vec![labour_request(10.0)];
        let responses = vec![response(10.0, 10.0)];
        let plan = allocate(&requests, &responses, 10);

        assert_eq!(plan.skip(MetricId::Performed), 0);
        assert!(plan.records().is_empty());
        assert!(!plan.fully_short());
    }

    #[test]
    fn test_zero_required_no_skip() {
        let requests = vec![labour_request(0.0)];
        let responses = vec![response(0.0, -1.0)];
        let plan = allocate(&requests, &responses, 10);
        // ratio undefined -> treated as 1.0, no skip
        assert_eq!(plan.skip(MetricId::Performed), 0);
    }

    #[test]
    fn test_multiple_requests_same_metric_are_summed() {
        // Two labour groups, served unevenly: 5+3 of 5+5 required.
        let requests = vec![labour_request(5.0), labour_request(5.0)];
        let responses = vec![response(5.0, 5.0), response(5.0, 3.0)];
        let plan = allocate(&requests, &responses, 10);

        // 8/10 served => ratio 0.8 => skip round(10 * 0.2) = 2
        assert_eq!(plan.skip(MetricId::Performed), 2);
    }

    #[test]
    fn test_rounding_half_away_from_zero() {
        // eligible=5, ratio 0.5 => 2.5 rounds to 3
        let requests = vec![labour_request(10.0)];
        let responses = vec![response(10.0, 5.0)];
        let plan = allocate(&requests, &responses, 5);
        assert_eq!(plan.skip(MetricId::Performed), 3);
    }

    #[test]
    fn test_zero_eligible_never_fully_short() {
        let requests = vec![labour_request(10.0)];
        let responses = vec![response(10.0, 0.0)];
        let plan = allocate(&requests, &responses, 0);
        assert_eq!(plan.skip(MetricId::Performed), 0);
        assert!(!plan.fully_short());
    }
}

//! Limit calculator - per-person and per-group bounds for labour allocation
//!
//! Limits must be recomputed whenever the requested amount changes; a stale
//! limit set gates allocation incorrectly.

use crate::core::error::{MusterError, Result};
use serde::{Deserialize, Serialize};

/// How the configured bound parameters are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LimitPolicy {
    /// Normalize the amount into unit blocks, scale the bounds by that count
    AsDaysRequired,
    /// Bounds are absolute caps, independent of the amount requested
    AsTotalAllowed,
    /// Bounds are proportions multiplied by the amount requested
    ProportionOfDaysRequired,
}

impl LimitPolicy {
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "as-days-required" => Ok(LimitPolicy::AsDaysRequired),
            "as-total-allowed" => Ok(LimitPolicy::AsTotalAllowed),
            "proportion-of-days-required" => Ok(LimitPolicy::ProportionOfDaysRequired),
            other => Err(MusterError::UnknownLimitPolicy(other.to_string())),
        }
    }
}

/// Configured bound parameters
///
/// `max_per_person > min_per_person` is a configuration precondition, not
/// runtime-checked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LimitParams {
    pub max_per_person: f64,
    pub max_per_group: f64,
    pub min_per_person: f64,
}

/// Derived bounds for one labour request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LimitSet {
    pub max_days_per_person: f64,
    pub max_days_per_group: f64,
    pub min_days_per_person: f64,
}

/// Derive the limit set for a requested amount
///
/// `unit_size` and `rate` only participate under AsDaysRequired, where the
/// amount is normalized into units as `amount / unit_size / rate`.
pub fn limits(
    amount_requested: f64,
    policy: LimitPolicy,
    params: &LimitParams,
    unit_size: f64,
    rate: f64,
) -> LimitSet {
    let (max_person, max_group, min_person) = match policy {
        LimitPolicy::AsDaysRequired => {
            let divisor = unit_size * rate;
            let units = if divisor > 0.0 {
                amount_requested / unit_size / rate
            } else {
                0.0
            };
            (
                params.max_per_person * units,
                params.max_per_group * units,
                params.min_per_person * units,
            )
        }
        LimitPolicy::AsTotalAllowed => (
            params.max_per_person,
            params.max_per_group,
            params.min_per_person,
        ),
        LimitPolicy::ProportionOfDaysRequired => (
            params.max_per_person * amount_requested,
            params.max_per_group * amount_requested,
            params.min_per_person * amount_requested,
        ),
    };

    LimitSet {
        max_days_per_person: max_person.max(0.0),
        max_days_per_group: max_group.max(0.0),
        min_days_per_person: min_person.max(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARAMS: LimitParams = LimitParams {
        max_per_person: 3.0,
        max_per_group: 12.0,
        min_per_person: 0.5,
    };

    #[test]
    fn test_as_days_required_scenario() {
        // amount=100, unit_size=10, rate=2 => units = 100/10/2 = 5
        // max_days_per_person = 3 * 5 = 15
        let set = limits(100.0, LimitPolicy::AsDaysRequired, &PARAMS, 10.0, 2.0);
        assert!((set.max_days_per_person - 15.0).abs() < 1e-9);
        assert!((set.max_days_per_group - 60.0).abs() < 1e-9);
        assert!((set.min_days_per_person - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_as_total_allowed_ignores_amount() {
        let a = limits(100.0, LimitPolicy::AsTotalAllowed, &PARAMS, 10.0, 2.0);
        let b = limits(7.0, LimitPolicy::AsTotalAllowed, &PARAMS, 10.0, 2.0);
        assert_eq!(a, b);
        assert_eq!(a.max_days_per_person, 3.0);
        assert_eq!(a.max_days_per_group, 12.0);
    }

    #[test]
    fn test_proportion_of_days_required() {
        let set = limits(
            40.0,
            LimitPolicy::ProportionOfDaysRequired,
            &LimitParams {
                max_per_person: 0.25,
                max_per_group: 1.0,
                min_per_person: 0.05,
            },
            10.0,
            2.0,
        );
        assert!((set.max_days_per_person - 10.0).abs() < 1e-9);
        assert!((set.max_days_per_group - 40.0).abs() < 1e-9);
        assert!((set.min_days_per_person - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_limits_never_negative() {
        let set = limits(-50.0, LimitPolicy::ProportionOfDaysRequired, &PARAMS, 10.0, 2.0);
        assert_eq!(set.max_days_per_person, 0.0);
        assert_eq!(set.max_days_per_group, 0.0);
        assert_eq!(set.min_days_per_person, 0.0);
    }

    #[test]
    fn test_zero_unit_size_does_not_divide() {
        let set = limits(100.0, LimitPolicy::AsDaysRequired, &PARAMS, 0.0, 2.0);
        assert_eq!(set.max_days_per_person, 0.0);
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!(
            LimitPolicy::parse("as-days-required").unwrap(),
            LimitPolicy::AsDaysRequired
        );
        assert!(matches!(
            LimitPolicy::parse("per-diem").unwrap_err(),
            MusterError::UnknownLimitPolicy(_)
        ));
    }
}

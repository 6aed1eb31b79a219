//! Execution driver - applies the activity's effect to a bounded,
//! order-sensitive subset of the eligible population

use crate::core::types::MemberId;
use crate::herd::member::Member;
use crate::herd::population::Herd;
use serde::Serialize;

/// Terminal status of one activity for one timestep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ActivityStatus {
    /// Performed exactly the quota
    Success,
    /// Performed fewer actions than the quota
    Partial,
    /// A resource shortfall prevented any action
    Warning,
}

/// What the driver did this timestep
#[derive(Debug, Clone)]
pub struct ExecutionOutcome {
    pub performed: usize,
    pub status: ActivityStatus,
    /// Members acted upon, in processing order
    pub acted: Vec<MemberId>,
}

/// Walk the eligible population in fixed order and apply the effect
///
/// The trailing `skip` members are excluded; only the leading
/// `eligible - skip` are processed. The effect may decline a member (a
/// secondary predicate such as an age-or-weight threshold); declined members
/// do not count against the quota. Processing stops once `performed` reaches
/// `quota`.
///
/// `shortfall_warning` is set by the allocator when the skip consumed the
/// whole eligible population; it takes precedence over Success/Partial.
pub fn execute<F>(
    herd: &mut Herd,
    eligible: &[MemberId],
    skip: usize,
    quota: usize,
    shortfall_warning: bool,
    mut effect: F,
) -> ExecutionOutcome
where
    F: FnMut(&mut Member) -> bool,
{
    let process = eligible.len().saturating_sub(skip);
    let mut performed = 0usize;
    let mut acted = Vec::new();

    for &id in &eligible[..process] {
        if performed >= quota {
            break;
        }
        let Some(member) = herd.get_mut(id) else {
            continue;
        };
        if effect(member) {
            performed += 1;
            acted.push(id);
        }
    }

    let status = if shortfall_warning {
        ActivityStatus::Warning
    } else if performed == quota {
        ActivityStatus::Success
    } else {
        ActivityStatus::Partial
    };

    ExecutionOutcome {
        performed,
        status,
        acted,
    }
}

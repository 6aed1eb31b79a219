//! Events generated during a simulation step
//!
//! These are the reporting sink of the protocol: one event per completed
//! individual action, one per activity completion, one per shortfall record.

use crate::activity::driver::ActivityStatus;
use crate::activity::metrics::MetricId;
use crate::core::types::MemberId;
use serde::Serialize;

/// Events returned by `Simulation::run_step`
#[derive(Debug, Clone, Serialize)]
pub enum StepEvent {
    /// One individual was acted upon
    ActionPerformed {
        activity: String,
        member: MemberId,
        /// Label of the eligibility criterion that selected the member
        reason: String,
        year: u32,
        month: u32,
    },
    /// An activity finished its timestep
    ActivityFinished {
        activity: String,
        status: ActivityStatus,
        performed: usize,
        quota: usize,
        eligible: usize,
    },
    /// The pool under-served one companion metric
    ShortfallReported {
        activity: String,
        metric: MetricId,
        required: f64,
        available: f64,
        ratio: f64,
    },
}

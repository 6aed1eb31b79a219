//! The per-timestep resource negotiation protocol
//!
//! Per activity, each timestep runs six phases in order:
//! eligibility filter -> companion metrics -> request builder ->
//! (pool allocation) -> shortfall allocator -> execution driver.
//! The limit calculator is invoked by the request builder for labour.

pub mod driver;
pub mod filter;
pub mod limits;
pub mod metrics;
pub mod requests;
pub mod shortfall;

pub use driver::{execute, ActivityStatus, ExecutionOutcome};
pub use filter::{select, FilterGroup, Selection};
pub use limits::{limits, LimitParams, LimitPolicy, LimitSet};
pub use metrics::{MetricId, MetricTable, MetricUnit, MetricValues};
pub use requests::{
    build_requests, LabourMeasure, LabourRequirement, RequestConfig, ResourceRequest,
};
pub use shortfall::{allocate, PoolResponse, ShortfallPlan, ShortfallRecord};

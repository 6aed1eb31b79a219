//! Step system - orchestrates the per-timestep negotiation protocol
//!
//! Each step processes registered activities in fixed registration order:
//! eligibility filter -> companion metrics -> request builder -> pool
//! allocation -> shortfall allocator -> execution driver. Earlier activities
//! can exhaust the pool before later ones request; there is no fairness
//! guarantee across activities, only the proportional-skip rule within one.

use crate::activity::driver::{execute, ActivityStatus};
use crate::activity::filter::{select, Selection};
use crate::activity::metrics::{MetricId, MetricValues};
use crate::activity::requests::{build_requests, ResourceRequest};
use crate::activity::shortfall::{allocate, PoolResponse, ShortfallPlan};
use crate::config::loader::ActivityConfig;
use crate::core::calendar::Calendar;
use crate::core::diagnostics::{Diagnostic, Diagnostics};
use crate::core::types::ActivityId;
use crate::herd::member::Member;
use crate::herd::population::Herd;
use crate::pool::ResourcePool;
use crate::simulation::events::StepEvent;
use ahash::AHashSet;

/// The capability set every activity implements
///
/// Concrete activities compose these four phases; the step driver wires them
/// together with the pool and the execution driver.
pub trait Activity {
    fn name(&self) -> &str;

    /// Phase 1: select the eligible population
    fn select_eligible(&self, herd: &Herd, diagnostics: &mut Diagnostics) -> Selection;

    /// Phase 2: compute this timestep's companion metric values
    fn compute_metrics(&self, eligible_count: usize) -> MetricValues;

    /// Phase 3: translate metric values into pool requests
    fn build_requests(
        &self,
        metrics: &MetricValues,
        labour_force: &[Member],
        diagnostics: &mut Diagnostics,
    ) -> Vec<ResourceRequest>;

    /// Phase 5: derive skip counts from the pool's answers
    fn adjust_for_shortfall(
        &self,
        requests: &[ResourceRequest],
        responses: &[PoolResponse],
        eligible_count: usize,
    ) -> ShortfallPlan {
        allocate(requests, responses, eligible_count)
    }

    /// Phase 6 effect: act on one member; false means the member failed the
    /// activity's secondary predicate and does not count against the quota
    fn apply(&self, member: &mut Member) -> bool;
}

/// A data-driven activity built from a TOML definition
#[derive(Debug, Clone)]
pub struct HerdActivity {
    config: ActivityConfig,
}

impl HerdActivity {
    pub fn new(config: ActivityConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ActivityConfig {
        &self.config
    }
}

impl Activity for HerdActivity {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn select_eligible(&self, herd: &Herd, diagnostics: &mut Diagnostics) -> Selection {
        select(herd.members(), &self.config.filter_groups, diagnostics)
    }

    fn compute_metrics(&self, eligible_count: usize) -> MetricValues {
        let mut values = MetricValues::default();
        let raw = eligible_count as f64;
        for id in [MetricId::Inspected, MetricId::Performed] {
            if let Some(value) = self.config.metrics.compute(id, raw) {
                values.set(id, value);
            }
        }
        values
    }

    fn build_requests(
        &self,
        metrics: &MetricValues,
        labour_force: &[Member],
        diagnostics: &mut Diagnostics,
    ) -> Vec<ResourceRequest> {
        build_requests(
            metrics,
            self.config.request.as_ref(),
            self.config.labour.as_ref(),
            labour_force,
            diagnostics,
        )
    }

    fn apply(&self, member: &mut Member) -> bool {
        if let Some(condition) = &self.config.effect.condition {
            if !condition.matches(member) {
                return false;
            }
        }
        if let Some(status) = self.config.effect.set_status {
            member.status = status;
        }
        if let Some(paddock) = &self.config.effect.move_to {
            member.paddock = paddock.clone();
        }
        true
    }
}

/// Owns the herd, labour force, pool, calendar, and registered activities
///
/// Single-threaded and step-driven: each timestep runs to completion before
/// the next begins, and the request -> adjust -> execute ordering is
/// preserved per activity before the next activity is negotiated.
pub struct Simulation<P: ResourcePool> {
    pub herd: Herd,
    pub labour_force: Herd,
    pub pool: P,
    pub calendar: Calendar,
    activities: Vec<Box<dyn Activity>>,
    diagnostics: Diagnostics,
}

impl<P: ResourcePool> Simulation<P> {
    pub fn new(pool: P) -> Self {
        Self {
            herd: Herd::new(),
            labour_force: Herd::new(),
            pool,
            calendar: Calendar::default(),
            activities: Vec::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    /// Register an activity; registration order is negotiation order
    pub fn register(&mut self, activity: Box<dyn Activity>) -> ActivityId {
        self.activities.push(activity);
        ActivityId::new(self.activities.len() as u32 - 1)
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Run one full timestep and return the events it produced
    pub fn run_step(&mut self) -> Vec<StepEvent> {
        let mut events = Vec::new();
        // Move activities out so execution can mutate the herd.
        let activities = std::mem::take(&mut self.activities);

        for activity in &activities {
            self.run_activity(activity.as_ref(), &mut events);
        }

        self.activities = activities;
        self.calendar.advance();
        events
    }

    fn run_activity(&mut self, activity: &dyn Activity, events: &mut Vec<StepEvent>) {
        let selection = activity.select_eligible(&self.herd, &mut self.diagnostics);
        let metrics = activity.compute_metrics(selection.len());
        let requests =
            activity.build_requests(&metrics, self.labour_force.members(), &mut self.diagnostics);

        // An activity naming a resource kind the pool does not define is
        // inert this timestep.
        let kinds: AHashSet<_> = requests.iter().map(|r| r.resource).collect();
        let mut inert = false;
        for kind in kinds {
            if !self.pool.defines(kind) {
                self.diagnostics.push(Diagnostic::MissingResource {
                    activity: activity.name().to_string(),
                    kind,
                });
                inert = true;
            }
        }
        if inert {
            events.push(StepEvent::ActivityFinished {
                activity: activity.name().to_string(),
                status: ActivityStatus::Warning,
                performed: 0,
                quota: 0,
                eligible: selection.len(),
            });
            return;
        }

        let responses = self.pool.allocate(&requests);
        let plan = activity.adjust_for_shortfall(&requests, &responses, selection.len());

        for record in plan.records() {
            events.push(StepEvent::ShortfallReported {
                activity: activity.name().to_string(),
                metric: record.metric,
                required: record.required,
                available: record.available,
                ratio: record.ratio,
            });
        }
        if let Some(message) = plan.message() {
            tracing::warn!(activity = activity.name(), "{}", message);
        }

        let demand = metrics
            .get(MetricId::Performed)
            .unwrap_or(0.0)
            .round()
            .max(0.0) as usize;
        let skip = plan.skip(MetricId::Performed);
        let quota = demand.saturating_sub(skip);

        let outcome = execute(
            &mut self.herd,
            selection.ids(),
            skip,
            quota,
            plan.fully_short(),
            |member| activity.apply(member),
        );

        let year = self.calendar.current_year();
        let month = self.calendar.current_month();
        for &id in &outcome.acted {
            events.push(StepEvent::ActionPerformed {
                activity: activity.name().to_string(),
                member: id,
                reason: selection.reason(id).unwrap_or("").to_string(),
                year,
                month,
            });
        }

        tracing::debug!(
            activity = activity.name(),
            eligible = selection.len(),
            skip,
            quota,
            performed = outcome.performed,
            status = ?outcome.status,
            "activity step complete"
        );
        events.push(StepEvent::ActivityFinished {
            activity: activity.name().to_string(),
            status: outcome.status,
            performed: outcome.performed,
            quota,
            eligible: selection.len(),
        });
    }
}

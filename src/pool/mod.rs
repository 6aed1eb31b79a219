//! Shared resource pool
//!
//! The protocol treats pool policy as opaque: activities hand over requests
//! and get back per-request (required, available) pairs. `SharedPool` is the
//! reference implementation used by the simulation and tests; real
//! deployments can substitute anything implementing [`ResourcePool`].

use crate::activity::requests::ResourceRequest;
use crate::activity::shortfall::PoolResponse;
use crate::core::types::ResourceKind;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// The external shared supply an activity draws against
pub trait ResourcePool {
    /// Serve a list of requests, decrementing internal balances
    ///
    /// The response vec is index-aligned with the requests. Requests are
    /// served strictly in order: earlier requests can exhaust the pool
    /// before later ones are considered.
    fn allocate(&mut self, requests: &[ResourceRequest]) -> Vec<PoolResponse>;

    /// Whether the pool defines this resource kind at all
    ///
    /// Activities whose requests name an undefined kind are inert for the
    /// timestep, with a configuration warning.
    fn defines(&self, kind: ResourceKind) -> bool;
}

/// In-memory pool with per-kind balances
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SharedPool {
    balances: AHashMap<ResourceKind, f64>,
}

impl SharedPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a resource kind with an opening balance
    pub fn set_balance(&mut self, kind: ResourceKind, amount: f64) {
        self.balances.insert(kind, amount.max(0.0));
    }

    pub fn balance(&self, kind: ResourceKind) -> f64 {
        self.balances.get(&kind).copied().unwrap_or(0.0)
    }

    /// Replenish between timesteps (the protocol itself never produces)
    pub fn top_up(&mut self, kind: ResourceKind, amount: f64) {
        *self.balances.entry(kind).or_insert(0.0) += amount.max(0.0);
    }

    fn draw(&mut self, kind: ResourceKind, amount: f64) -> f64 {
        let Some(balance) = self.balances.get_mut(&kind) else {
            return 0.0;
        };
        let granted = amount.min(*balance).max(0.0);
        *balance -= granted;
        granted
    }
}

impl ResourcePool for SharedPool {
    fn allocate(&mut self, requests: &[ResourceRequest]) -> Vec<PoolResponse> {
        requests
            .iter()
            .map(|request| {
                let mut granted = self.draw(request.resource, request.amount);
                // Labour shortfalls may be made up with hired labour when the
                // request allows substitution.
                if request.allow_substitution
                    && request.resource == ResourceKind::Labour
                    && granted < request.amount
                {
                    granted += self.draw(ResourceKind::Money, request.amount - granted);
                }
                PoolResponse {
                    required: request.amount,
                    available: granted,
                }
            })
            .collect()
    }

    fn defines(&self, kind: ResourceKind) -> bool {
        self.balances.contains_key(&kind)
    }
}

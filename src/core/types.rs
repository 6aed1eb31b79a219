//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Unique identifier for population members (animals, workers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberId(pub u32);

impl MemberId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

/// Unique identifier for registered activities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActivityId(pub u32);

impl ActivityId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

/// Simulation timestep counter
pub type Timestep = u64;

/// The kinds of shared, finite resource an activity can draw against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// Labour-days supplied by the workforce
    Labour,
    /// Feed in kilograms
    Feed,
    /// Money in whole currency units
    Money,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::Labour => write!(f, "labour"),
            ResourceKind::Feed => write!(f, "feed"),
            ResourceKind::Money => write!(f, "money"),
        }
    }
}

impl ResourceKind {
    /// Parse a configuration string into a resource kind
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "labour" => Some(ResourceKind::Labour),
            "feed" => Some(ResourceKind::Feed),
            "money" => Some(ResourceKind::Money),
            _ => None,
        }
    }
}

//! Non-fatal configuration diagnostics
//!
//! Configuration warnings degrade behavior but never abort a timestep. Fatal
//! problems go through [`crate::core::error::MusterError`] instead.

use crate::core::types::ResourceKind;
use serde::Serialize;

/// A single non-fatal configuration warning
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Diagnostic {
    /// A filter group carried more than one level of nesting; only the first
    /// nested child was honored.
    ExcessFilterNesting { group: String },
    /// An activity requested a resource kind the simulation does not define;
    /// the activity is inert this timestep.
    MissingResource {
        activity: String,
        kind: ResourceKind,
    },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::ExcessFilterNesting { group } => {
                write!(
                    f,
                    "filter group '{}' nests beyond one level; only the first child is honored",
                    group
                )
            }
            Diagnostic::MissingResource { activity, kind } => {
                write!(
                    f,
                    "activity '{}' requires undefined resource '{}'; activity is inert",
                    activity, kind
                )
            }
        }
    }
}

/// Collects configuration warnings for the operator while also emitting them
/// to the tracing log.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        tracing::warn!("{}", diagnostic);
        self.warnings.push(diagnostic);
    }

    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn clear(&mut self) {
        self.warnings.clear();
    }
}

//! Eligibility filter - selects the ordered unique subset an activity works on
//!
//! Filter groups support one level of nesting: with a nested child, the
//! effective predicate is parent AND first child. Deeper nesting is tolerated
//! but ignored with a diagnostic, never an error.

use crate::core::diagnostics::{Diagnostic, Diagnostics};
use crate::core::types::MemberId;
use crate::herd::member::{Member, Predicate};
use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

/// A predicate group, possibly with nested child groups
///
/// Authored once at configuration time, immutable during simulation. Only the
/// first child is honored; validation keeps extra children so the selector
/// can report them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterGroup {
    pub label: String,
    pub predicate: Predicate,
    #[serde(default)]
    pub children: Vec<FilterGroup>,
}

impl FilterGroup {
    pub fn new(label: impl Into<String>, predicate: Predicate) -> Self {
        Self {
            label: label.into(),
            predicate,
            children: Vec::new(),
        }
    }

    pub fn with_child(mut self, child: FilterGroup) -> Self {
        self.children.push(child);
        self
    }

    /// Effective match: parent AND first child (if any)
    fn matches(&self, member: &Member) -> bool {
        if !self.predicate.matches(member) {
            return false;
        }
        match self.children.first() {
            Some(child) => child.predicate.matches(member),
            None => true,
        }
    }

    /// True if this group nests beyond the single honored level
    fn has_excess_nesting(&self) -> bool {
        self.children.len() > 1
            || self
                .children
                .first()
                .is_some_and(|c| !c.children.is_empty())
    }
}

/// The deduplicated, ordered subset selected by an activity's filter groups
#[derive(Debug, Clone, Default)]
pub struct Selection {
    ids: Vec<MemberId>,
    reasons: AHashMap<MemberId, String>,
}

impl Selection {
    /// Selected ids in population order
    pub fn ids(&self) -> &[MemberId] {
        &self.ids
    }

    /// Label of the first group that matched this member
    pub fn reason(&self, id: MemberId) -> Option<&str> {
        self.reasons.get(&id).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Apply filter groups to a population snapshot
///
/// Output preserves the population's order and is a set: members matched by
/// several groups appear once, attributed to the first matching group. An
/// empty group list yields an empty selection.
pub fn select(
    population: &[Member],
    groups: &[FilterGroup],
    diagnostics: &mut Diagnostics,
) -> Selection {
    for group in groups {
        if group.has_excess_nesting() {
            diagnostics.push(Diagnostic::ExcessFilterNesting {
                group: group.label.clone(),
            });
        }
    }

    let mut selection = Selection::default();
    let mut seen: AHashSet<MemberId> = AHashSet::new();

    for member in population {
        for group in groups {
            if group.matches(member) {
                if seen.insert(member.id) {
                    selection.ids.push(member.id);
                    selection.reasons.insert(member.id, group.label.clone());
                }
                break;
            }
        }
    }

    selection
}

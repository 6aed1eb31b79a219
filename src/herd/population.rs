//! Herd storage and the population-source seam
//!
//! The negotiation protocol only needs an ordered snapshot of members each
//! timestep; `Herd` is the in-memory store used by the simulation and tests,
//! and `PopulationSource` is the seam a real data source implements.

use crate::core::types::MemberId;
use crate::herd::member::Member;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Ordering requested from the population source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionStyle {
    /// Insertion order; the only order the execution driver ever uses
    NaturalOrder,
    OldestFirst,
    YoungestFirst,
}

/// Source of population members, queried fresh each timestep
pub trait PopulationSource {
    fn all_individuals(&self, style: SelectionStyle) -> Vec<MemberId>;
}

/// In-memory, insertion-ordered member store
#[derive(Debug, Clone, Default)]
pub struct Herd {
    members: Vec<Member>,
    index: AHashMap<MemberId, usize>,
    next_id: u32,
}

impl Herd {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a member, assigning the next id
    pub fn spawn(&mut self, age_months: f64, weight_kg: f64) -> MemberId {
        let id = MemberId(self.next_id);
        self.next_id += 1;
        self.index.insert(id, self.members.len());
        self.members.push(Member::new(id, age_months, weight_kg));
        id
    }

    /// Add a fully-built member, assigning the next id
    pub fn spawn_with(&mut self, build: impl FnOnce(Member) -> Member) -> MemberId {
        let id = MemberId(self.next_id);
        self.next_id += 1;
        self.index.insert(id, self.members.len());
        self.members
            .push(build(Member::new(id, 0.0, 0.0)));
        id
    }

    pub fn get(&self, id: MemberId) -> Option<&Member> {
        self.index.get(&id).map(|&i| &self.members[i])
    }

    pub fn get_mut(&mut self, id: MemberId) -> Option<&mut Member> {
        let i = *self.index.get(&id)?;
        Some(&mut self.members[i])
    }

    /// Members in insertion order
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl PopulationSource for Herd {
    fn all_individuals(&self, style: SelectionStyle) -> Vec<MemberId> {
        match style {
            SelectionStyle::NaturalOrder => self.members.iter().map(|m| m.id).collect(),
            SelectionStyle::OldestFirst => {
                let mut ordered: Vec<&Member> = self.members.iter().collect();
                ordered.sort_by(|a, b| {
                    b.age_months
                        .partial_cmp(&a.age_months)
                        .unwrap_or(std::cmp::Ordering::Equal)
                });
                ordered.iter().map(|m| m.id).collect()
            }
            SelectionStyle::YoungestFirst => {
                let mut ordered: Vec<&Member> = self.members.iter().collect();
                ordered.sort_by(|a, b| {
                    a.age_months
                        .partial_cmp(&b.age_months)
                        .unwrap_or(std::cmp::Ordering::Equal)
                });
                ordered.iter().map(|m| m.id).collect()
            }
        }
    }
}

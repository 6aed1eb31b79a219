//! Population members and the predicates that select them
//!
//! A member is one simulated agent: an animal in the herd or a worker in the
//! labour force. Predicates are a closed enumeration over the numeric
//! attributes the negotiation protocol understands; anything richer belongs
//! to the surrounding application.

use crate::core::error::{MusterError, Result};
use crate::core::types::MemberId;
use serde::{Deserialize, Serialize};

/// Mutable lifecycle status of a member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    /// Still growing with its dam / available for work
    Growing,
    /// Weaned off the dam
    Weaned,
    /// Removed from the herd
    Culled,
}

/// One simulated agent (animal or worker)
///
/// Created and destroyed by the population source; the execution driver is
/// the only part of the core that mutates `status` and `paddock`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub age_months: f64,
    pub weight_kg: f64,
    /// Quantity this member can provide per timestep (labour-days for
    /// workers, zero for animals)
    pub supplied_units: f64,
    pub status: MemberStatus,
    pub paddock: String,
}

impl Member {
    pub fn new(id: MemberId, age_months: f64, weight_kg: f64) -> Self {
        Self {
            id,
            age_months,
            weight_kg,
            supplied_units: 0.0,
            status: MemberStatus::Growing,
            paddock: String::new(),
        }
    }

    pub fn with_supplied(mut self, supplied_units: f64) -> Self {
        self.supplied_units = supplied_units;
        self
    }

    pub fn with_paddock(mut self, paddock: impl Into<String>) -> Self {
        self.paddock = paddock.into();
        self
    }
}

/// Numeric member attributes a predicate may test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeField {
    Age,
    Weight,
    Supplied,
}

impl AttributeField {
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "age" => Ok(AttributeField::Age),
            "weight" => Ok(AttributeField::Weight),
            "supplied" => Ok(AttributeField::Supplied),
            other => Err(MusterError::UnknownFilterField(other.to_string())),
        }
    }
}

/// Comparison operators for attribute predicates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareOp {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
}

impl CompareOp {
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "<" => Ok(CompareOp::Lt),
            "<=" => Ok(CompareOp::Le),
            ">" => Ok(CompareOp::Gt),
            ">=" => Ok(CompareOp::Ge),
            "==" => Ok(CompareOp::Eq),
            other => Err(MusterError::UnknownFilterComparison(other.to_string())),
        }
    }

    fn apply(self, lhs: f64, rhs: f64) -> bool {
        match self {
            CompareOp::Lt => lhs < rhs,
            CompareOp::Le => lhs <= rhs,
            CompareOp::Gt => lhs > rhs,
            CompareOp::Ge => lhs >= rhs,
            CompareOp::Eq => (lhs - rhs).abs() < f64::EPSILON,
        }
    }
}

/// A predicate over a single member
///
/// Closed enumeration: configuration strings are mapped onto these variants
/// at load time, so an unknown field or comparison fails before the first
/// timestep runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Predicate {
    /// Matches every member
    All,
    /// Compare a numeric attribute against a constant
    Attribute {
        field: AttributeField,
        op: CompareOp,
        value: f64,
    },
    /// Match a lifecycle status exactly
    Status { status: MemberStatus },
}

impl Predicate {
    pub fn matches(&self, member: &Member) -> bool {
        match self {
            Predicate::All => true,
            Predicate::Attribute { field, op, value } => {
                let lhs = match field {
                    AttributeField::Age => member.age_months,
                    AttributeField::Weight => member.weight_kg,
                    AttributeField::Supplied => member.supplied_units,
                };
                op.apply(lhs, *value)
            }
            Predicate::Status { status } => member.status == *status,
        }
    }
}

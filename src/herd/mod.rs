pub mod member;
pub mod population;

pub use member::{AttributeField, CompareOp, Member, MemberStatus, Predicate};
pub use population::{Herd, PopulationSource, SelectionStyle};
